pub mod category_page;
pub mod category_tags_panel;
pub mod category_tree_view;

pub use category_page::CategoryPage;
