use super::bar_chart::BarChart;
use crate::components::fields::{input_value, select_value};
use crate::hooks::{use_category_tree, FetchGuard};
use crate::services::date_utils::today;
use crate::state::{report_error, use_api, use_app, use_config, Resource};
use chrono::{Datelike, NaiveDate};
use shared::date_range::{month_label, shift_month};
use shared::stats::{
    category_bars, compare_rows, year_monthly_series, ChartData, CompareRow, MonthlyRange, PeriodCompare,
    YearCategoryStats, YoYMonthlyStats, COMPARE_ROW_LIMIT,
};
use shared::{format_cents, CategoryType};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const CATEGORY_BAR_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsView {
    YearCategory,
    MonthlyRange,
    YearOverYear,
    MonthOverMonth,
}

impl StatsView {
    pub const ALL: [StatsView; 4] = [
        StatsView::YearCategory,
        StatsView::MonthlyRange,
        StatsView::YearOverYear,
        StatsView::MonthOverMonth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatsView::YearCategory => "Year by category",
            StatsView::MonthlyRange => "Monthly income & expense",
            StatsView::YearOverYear => "Year over year",
            StatsView::MonthOverMonth => "Month over month",
        }
    }
}

/// One of the four statistics endpoints with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsRequest {
    YearCategory { year: i32, category_type: CategoryType },
    MonthlyRange { start: String, end: String },
    YearOverYear { year: i32, category_type: CategoryType },
    MonthOverMonth { year: i32, month: u32, category_type: CategoryType },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsControls {
    pub view: StatsView,
    pub category_type: CategoryType,
    pub year: i32,
    /// 1-12; the compared month for month-over-month and the drill-down month for year-over-year
    pub month: u32,
    pub start_month: String,
    pub end_month: String,
}

impl StatsControls {
    /// Current year and month, with the range covering the last twelve months
    pub fn for_today(today: NaiveDate) -> Self {
        let (start_year, start_month) = shift_month(today.year(), today.month(), -11);
        Self {
            view: StatsView::YearCategory,
            category_type: CategoryType::Expense,
            year: today.year(),
            month: today.month(),
            start_month: month_label(start_year, start_month),
            end_month: month_label(today.year(), today.month()),
        }
    }

    /// Only the parameters the selected view sends
    pub fn request(&self) -> StatsRequest {
        match self.view {
            StatsView::YearCategory => StatsRequest::YearCategory {
                year: self.year,
                category_type: self.category_type,
            },
            StatsView::MonthlyRange => StatsRequest::MonthlyRange {
                start: self.start_month.clone(),
                end: self.end_month.clone(),
            },
            StatsView::YearOverYear => StatsRequest::YearOverYear {
                year: self.year,
                category_type: self.category_type,
            },
            StatsView::MonthOverMonth => StatsRequest::MonthOverMonth {
                year: self.year,
                month: self.month,
                category_type: self.category_type,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum StatsData {
    YearCategory(YearCategoryStats),
    MonthlyRange(MonthlyRange),
    YearOverYear(YoYMonthlyStats),
    MonthOverMonth(PeriodCompare),
}

fn render_compare_table(rows: &[CompareRow], current: &str, previous: &str, symbol: &str) -> Html {
    if rows.is_empty() {
        return html! { <div class="empty">{"No categories to compare"}</div> };
    }
    let money = |cents: i64| format!("{}{}", symbol, format_cents(cents));
    html! {
        <table class="data-table compare-table">
            <thead>
                <tr>
                    <th>{"Category"}</th>
                    <th>{current.to_string()}</th>
                    <th>{previous.to_string()}</th>
                    <th>{"Change"}</th>
                    <th>{"%"}</th>
                </tr>
            </thead>
            <tbody>
                {for rows.iter().map(|row| html! {
                    <tr>
                        <td title={row.path.clone()}>{row.label.clone()}</td>
                        <td class="amount">{money(row.current_cents)}</td>
                        <td class="amount">{money(row.previous_cents)}</td>
                        <td class={classes!("amount", if row.delta_cents() > 0 { "negative" } else { "positive" })}>
                            {money(row.delta_cents())}
                        </td>
                        <td>
                            {row.change_percent().map(|p| format!("{:+.1}%", p)).unwrap_or_else(|| "-".to_string())}
                        </td>
                    </tr>
                })}
            </tbody>
        </table>
    }
}

#[function_component(StatsPage)]
pub fn stats_page() -> Html {
    let app = use_app();
    let api = use_api();
    let config = use_config();
    let controls = use_state(|| StatsControls::for_today(today()));
    let data = use_state(|| None::<StatsData>);
    let loading = use_state(|| false);
    let tree = use_category_tree(controls.category_type);
    let generation = app.generation(Resource::Stats);

    use_effect_with((controls.request(), generation), {
        let app = app.clone();
        let data = data.clone();
        let loading = loading.clone();
        move |(request, _)| {
            let request = request.clone();
            let guard = FetchGuard::new();
            loading.set(true);
            data.set(None);
            let in_flight = guard.clone();
            spawn_local(async move {
                let result = match request {
                    StatsRequest::YearCategory { year, category_type } => api
                        .year_category_stats(year, category_type)
                        .await
                        .map(StatsData::YearCategory),
                    StatsRequest::MonthlyRange { start, end } => {
                        api.monthly_range(&start, &end).await.map(StatsData::MonthlyRange)
                    }
                    StatsRequest::YearOverYear { year, category_type } => api
                        .yoy_monthly(year, category_type)
                        .await
                        .map(StatsData::YearOverYear),
                    StatsRequest::MonthOverMonth {
                        year,
                        month,
                        category_type,
                    } => api
                        .month_over_month(year, month, category_type)
                        .await
                        .map(StatsData::MonthOverMonth),
                };
                if !in_flight.is_current() {
                    return;
                }
                match result {
                    Ok(result) => data.set(Some(result)),
                    Err(e) => report_error(&app, "stats_page", &e),
                }
                loading.set(false);
            });
            guard.canceller()
        }
    });

    let set = |apply: fn(&mut StatsControls, String)| {
        let controls = controls.clone();
        move |value: String| {
            let mut next = (*controls).clone();
            apply(&mut next, value);
            controls.set(next);
        }
    };
    let on_select = |apply: fn(&mut StatsControls, String)| {
        let set = set(apply);
        Callback::from(move |e: Event| set(select_value(&e)))
    };
    let on_input = |apply: fn(&mut StatsControls, String)| {
        let set = set(apply);
        Callback::from(move |e: InputEvent| set(input_value(&e)))
    };

    let choose_view = |view: StatsView| {
        let controls = controls.clone();
        Callback::from(move |_: MouseEvent| {
            controls.set(StatsControls {
                view,
                ..(*controls).clone()
            });
        })
    };

    let symbol = config.currency_symbol.clone();
    let paths = tree.forest.path_map();
    let type_label = controls.category_type.label();

    let body = match data.as_ref() {
        None => html! {
            <BarChart title={controls.view.label()} data={ChartData::default()} loading={*loading} currency_symbol={symbol.clone()} />
        },
        Some(StatsData::YearCategory(stats)) => {
            let bars = category_bars(&stats.breakdown, &paths, CATEGORY_BAR_LIMIT);
            let months = year_monthly_series(stats.year, &stats.monthly_totals);
            html! {
                <>
                    <div class="stats-summary">
                        {format!("{} {} total: {}{}", stats.year, type_label, symbol, format_cents(stats.total_cents))}
                    </div>
                    <BarChart
                        title={format!("{} by category", type_label)}
                        data={ChartData::from_bars(type_label, &bars)}
                        currency_symbol={symbol.clone()}
                    />
                    <BarChart
                        title={format!("{} by month", type_label)}
                        data={ChartData::from_months(type_label, &months)}
                        currency_symbol={symbol.clone()}
                    />
                </>
            }
        }
        Some(StatsData::MonthlyRange(range)) => html! {
            <BarChart
                title={format!("{} to {}", range.start_month, range.end_month)}
                data={ChartData::from_monthly_range(range)}
                currency_symbol={symbol.clone()}
            />
        },
        Some(StatsData::YearOverYear(stats)) => {
            let selected = month_label(controls.year, controls.month);
            let rows = stats
                .series
                .iter()
                .find(|p| p.month == selected)
                .map(|p| compare_rows(&p.items, &paths, COMPARE_ROW_LIMIT))
                .unwrap_or_default();
            html! {
                <>
                    <BarChart
                        title={format!("{}: {} vs {}", type_label, stats.current_label, stats.previous_label)}
                        data={ChartData::from_yoy(stats)}
                        currency_symbol={symbol.clone()}
                    />
                    <h3>{format!("Categories in {}", selected)}</h3>
                    {render_compare_table(&rows, &stats.current_label, &stats.previous_label, &symbol)}
                </>
            }
        }
        Some(StatsData::MonthOverMonth(compare)) => {
            let rows = compare_rows(&compare.items, &paths, COMPARE_ROW_LIMIT);
            html! {
                <>
                    <div class="stats-summary">
                        {format!(
                            "{}: {}{} vs {}: {}{}",
                            compare.current_label,
                            symbol,
                            format_cents(compare.current_total_cents),
                            compare.previous_label,
                            symbol,
                            format_cents(compare.previous_total_cents),
                        )}
                    </div>
                    <BarChart
                        title={format!("{} by category", type_label)}
                        data={ChartData::from_compare(&compare.current_label, &compare.previous_label, &rows)}
                        currency_symbol={symbol.clone()}
                    />
                    {render_compare_table(&rows, &compare.current_label, &compare.previous_label, &symbol)}
                </>
            }
        }
    };

    let view = controls.view;
    let uses_type = view != StatsView::MonthlyRange;
    let uses_month = matches!(view, StatsView::MonthOverMonth | StatsView::YearOverYear);

    html! {
        <div class="stats-page">
            <div class="stats-tabs">
                {for StatsView::ALL.into_iter().map(|v| html! {
                    <button
                        class={classes!("tab", (v == view).then_some("active"))}
                        onclick={choose_view(v)}
                    >
                        {v.label()}
                    </button>
                })}
            </div>
            <div class="filter-bar">
                {if uses_type {
                    html! {
                        <select onchange={on_select(|c, v| {
                            c.category_type = if v == "income" { CategoryType::Income } else { CategoryType::Expense };
                        })}>
                            {for [CategoryType::Expense, CategoryType::Income].into_iter().map(|t| html! {
                                <option value={t.as_str()} selected={controls.category_type == t}>{t.label()}</option>
                            })}
                        </select>
                    }
                } else { html! {} }}
                {if uses_type {
                    html! {
                        <input
                            type="number"
                            min="2000"
                            max="2100"
                            value={controls.year.to_string()}
                            oninput={on_input(|c, v| {
                                if let Ok(year) = v.trim().parse() {
                                    c.year = year;
                                }
                            })}
                        />
                    }
                } else { html! {} }}
                {if uses_month {
                    html! {
                        <select onchange={on_select(|c, v| {
                            if let Ok(month) = v.parse() {
                                c.month = month;
                            }
                        })}>
                            {for (1..=12u32).map(|m| html! {
                                <option value={m.to_string()} selected={controls.month == m}>{format!("{:02}", m)}</option>
                            })}
                        </select>
                    }
                } else { html! {} }}
                {if view == StatsView::MonthlyRange {
                    html! {
                        <>
                            <input type="month" value={controls.start_month.clone()} oninput={on_input(|c, v| c.start_month = v)} />
                            <span>{"to"}</span>
                            <input type="month" value={controls.end_month.clone()} oninput={on_input(|c, v| c.end_month = v)} />
                        </>
                    }
                } else { html! {} }}
            </div>
            {body}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_covers_twelve_months() {
        let controls = StatsControls::for_today(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(controls.start_month, "2023-04");
        assert_eq!(controls.end_month, "2024-03");
        assert_eq!(controls.year, 2024);
        assert_eq!(controls.month, 3);
    }

    #[test]
    fn test_request_ignores_unused_controls() {
        let mut controls = StatsControls::for_today(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let before = controls.request();
        controls.month = 7;
        assert_eq!(controls.request(), before);

        controls.view = StatsView::MonthOverMonth;
        assert_eq!(
            controls.request(),
            StatsRequest::MonthOverMonth {
                year: 2024,
                month: 7,
                category_type: CategoryType::Expense,
            }
        );
    }
}
