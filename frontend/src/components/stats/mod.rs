pub mod bar_chart;
pub mod stats_page;

pub use stats_page::StatsPage;
