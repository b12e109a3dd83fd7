//! Statistics responses and the chart data prepared from them.

use crate::date_range::month_label;
use crate::CategoryType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rows kept in a comparison table
pub const COMPARE_ROW_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub category_id: i64,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthAmount {
    /// "YYYY-MM"
    pub month: String,
    pub amount_cents: i64,
}

/// `GET /stats/year-category`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCategoryStats {
    pub year: i32,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub total_cents: i64,
    #[serde(default)]
    pub breakdown: Vec<CategoryAmount>,
    #[serde(default)]
    pub monthly_totals: Vec<MonthAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub income_cents: i64,
    pub expense_cents: i64,
}

/// `GET /stats/monthly-range`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRange {
    pub start_month: String,
    pub end_month: String,
    #[serde(default)]
    pub series: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareItem {
    pub category_id: i64,
    pub current_cents: i64,
    pub previous_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoYMonthPoint {
    pub month: String,
    pub current_cents: i64,
    pub previous_cents: i64,
    #[serde(default)]
    pub items: Vec<CompareItem>,
}

/// `GET /stats/yoy-monthly`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YoYMonthlyStats {
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub current_label: String,
    pub previous_label: String,
    #[serde(default)]
    pub series: Vec<YoYMonthPoint>,
}

/// `GET /stats/mom`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCompare {
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub current_label: String,
    pub previous_label: String,
    pub current_total_cents: i64,
    pub previous_total_cents: i64,
    #[serde(default)]
    pub items: Vec<CompareItem>,
}

/// Last segment of an `"A/B/C"` path
pub fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn label_for(category_id: i64, path_map: &HashMap<i64, String>) -> (String, String) {
    match path_map.get(&category_id) {
        Some(path) => (leaf_name(path).to_string(), path.clone()),
        None => {
            let fallback = format!("#{}", category_id);
            (fallback.clone(), fallback)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub category_id: i64,
    pub label: String,
    pub path: String,
    pub amount_cents: i64,
}

/// Largest categories first, at most `limit` of them
pub fn category_bars(
    breakdown: &[CategoryAmount],
    path_map: &HashMap<i64, String>,
    limit: usize,
) -> Vec<CategoryBar> {
    let mut sorted: Vec<&CategoryAmount> = breakdown.iter().collect();
    sorted.sort_by(|a, b| {
        b.amount_cents
            .cmp(&a.amount_cents)
            .then(a.category_id.cmp(&b.category_id))
    });
    sorted
        .into_iter()
        .take(limit)
        .map(|item| {
            let (label, path) = label_for(item.category_id, path_map);
            CategoryBar {
                category_id: item.category_id,
                label,
                path,
                amount_cents: item.amount_cents,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompareRow {
    pub category_id: i64,
    pub label: String,
    pub path: String,
    pub current_cents: i64,
    pub previous_cents: i64,
}

impl CompareRow {
    pub fn delta_cents(&self) -> i64 {
        self.current_cents - self.previous_cents
    }

    pub fn change_percent(&self) -> Option<f64> {
        percent_change(self.current_cents, self.previous_cents)
    }
}

/// Relative change, `None` when there is nothing to compare against
pub fn percent_change(current_cents: i64, previous_cents: i64) -> Option<f64> {
    if previous_cents == 0 {
        return None;
    }
    Some((current_cents - previous_cents) as f64 / previous_cents.abs() as f64 * 100.0)
}

/// Comparison rows in server order with empty rows removed
pub fn compare_rows(items: &[CompareItem], path_map: &HashMap<i64, String>, limit: usize) -> Vec<CompareRow> {
    items
        .iter()
        .filter(|item| item.current_cents != 0 || item.previous_cents != 0)
        .take(limit)
        .map(|item| {
            let (label, path) = label_for(item.category_id, path_map);
            CompareRow {
                category_id: item.category_id,
                label,
                path,
                current_cents: item.current_cents,
                previous_cents: item.previous_cents,
            }
        })
        .collect()
}

/// Twelve `(month, cents)` points for `year`, months missing from the response are zero
pub fn year_monthly_series(year: i32, monthly_totals: &[MonthAmount]) -> Vec<(String, i64)> {
    let by_month: HashMap<&str, i64> = monthly_totals
        .iter()
        .map(|m| (m.month.as_str(), m.amount_cents))
        .collect();
    (1..=12)
        .map(|month| {
            let key = month_label(year, month);
            let cents = by_month.get(key.as_str()).copied().unwrap_or(0);
            (key, cents)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// One value per label, in cents
    pub values: Vec<i64>,
}

/// Grouped bar chart input: one group per label, one bar per series
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.series.iter().all(|s| s.values.iter().all(|v| *v == 0))
    }

    pub fn max_cents(&self) -> i64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .max()
            .unwrap_or(0)
            .max(0)
    }

    pub fn from_bars(name: &str, bars: &[CategoryBar]) -> Self {
        Self {
            labels: bars.iter().map(|b| b.label.clone()).collect(),
            series: vec![ChartSeries {
                name: name.to_string(),
                values: bars.iter().map(|b| b.amount_cents).collect(),
            }],
        }
    }

    pub fn from_months(name: &str, points: &[(String, i64)]) -> Self {
        Self {
            labels: points.iter().map(|(month, _)| month.clone()).collect(),
            series: vec![ChartSeries {
                name: name.to_string(),
                values: points.iter().map(|(_, cents)| *cents).collect(),
            }],
        }
    }

    pub fn from_monthly_range(range: &MonthlyRange) -> Self {
        Self {
            labels: range.series.iter().map(|p| p.month.clone()).collect(),
            series: vec![
                ChartSeries {
                    name: "Income".to_string(),
                    values: range.series.iter().map(|p| p.income_cents).collect(),
                },
                ChartSeries {
                    name: "Expense".to_string(),
                    values: range.series.iter().map(|p| p.expense_cents).collect(),
                },
            ],
        }
    }

    pub fn from_yoy(stats: &YoYMonthlyStats) -> Self {
        Self {
            labels: stats.series.iter().map(|p| p.month.clone()).collect(),
            series: vec![
                ChartSeries {
                    name: stats.current_label.clone(),
                    values: stats.series.iter().map(|p| p.current_cents).collect(),
                },
                ChartSeries {
                    name: stats.previous_label.clone(),
                    values: stats.series.iter().map(|p| p.previous_cents).collect(),
                },
            ],
        }
    }

    pub fn from_compare(current: &str, previous: &str, rows: &[CompareRow]) -> Self {
        Self {
            labels: rows.iter().map(|r| r.label.clone()).collect(),
            series: vec![
                ChartSeries {
                    name: current.to_string(),
                    values: rows.iter().map(|r| r.current_cents).collect(),
                },
                ChartSeries {
                    name: previous.to_string(),
                    values: rows.iter().map(|r| r.previous_cents).collect(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> HashMap<i64, String> {
        HashMap::from([
            (2, "Food/Groceries".to_string()),
            (4, "Food/Dining/Lunch".to_string()),
            (8, "Transport/Bus".to_string()),
        ])
    }

    fn amount(category_id: i64, amount_cents: i64) -> CategoryAmount {
        CategoryAmount {
            category_id,
            amount_cents,
        }
    }

    fn compare(category_id: i64, current_cents: i64, previous_cents: i64) -> CompareItem {
        CompareItem {
            category_id,
            current_cents,
            previous_cents,
        }
    }

    #[test]
    fn test_leaf_name() {
        assert_eq!(leaf_name("Food/Dining/Lunch"), "Lunch");
        assert_eq!(leaf_name("Food"), "Food");
        assert_eq!(leaf_name(""), "");
    }

    #[test]
    fn test_category_bars_sorted_and_limited() {
        let breakdown = vec![amount(8, 300), amount(2, 1200), amount(4, 800), amount(99, 50)];
        let bars = category_bars(&breakdown, &paths(), 3);

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].label, "Groceries");
        assert_eq!(bars[0].path, "Food/Groceries");
        assert_eq!(bars[1].label, "Lunch");
        assert_eq!(bars[2].amount_cents, 300);

        let all = category_bars(&breakdown, &paths(), 10);
        assert_eq!(all[3].label, "#99");
    }

    #[test]
    fn test_compare_rows_drop_empty_rows() {
        let items = vec![compare(2, 0, 0), compare(4, 500, 0), compare(8, 0, 200)];
        let rows = compare_rows(&items, &paths(), COMPARE_ROW_LIMIT);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Lunch");
        assert_eq!(rows[0].delta_cents(), 500);
        assert_eq!(rows[0].change_percent(), None);
        assert_eq!(rows[1].delta_cents(), -200);
        assert_eq!(rows[1].change_percent(), Some(-100.0));
    }

    #[test]
    fn test_compare_rows_limit() {
        let items: Vec<CompareItem> = (1..=40).map(|id| compare(id, id * 10, 0)).collect();
        assert_eq!(compare_rows(&items, &paths(), COMPARE_ROW_LIMIT).len(), 30);
    }

    #[test]
    fn test_year_series_fills_missing_months() {
        let totals = vec![
            MonthAmount {
                month: "2024-03".to_string(),
                amount_cents: 1500,
            },
            MonthAmount {
                month: "2024-12".to_string(),
                amount_cents: 99,
            },
        ];
        let series = year_monthly_series(2024, &totals);

        assert_eq!(series.len(), 12);
        assert_eq!(series[0], ("2024-01".to_string(), 0));
        assert_eq!(series[2], ("2024-03".to_string(), 1500));
        assert_eq!(series[11], ("2024-12".to_string(), 99));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(150, 100), Some(50.0));
        assert_eq!(percent_change(100, 0), None);
    }

    #[test]
    fn test_monthly_range_chart() {
        let json = r#"{"startMonth":"2024-01","endMonth":"2024-02","series":[
            {"month":"2024-01","incomeCents":1000,"expenseCents":400},
            {"month":"2024-02","incomeCents":0,"expenseCents":700}]}"#;
        let range: MonthlyRange = serde_json::from_str(json).unwrap();
        let chart = ChartData::from_monthly_range(&range);

        assert_eq!(chart.labels, vec!["2024-01", "2024-02"]);
        assert_eq!(chart.series[1].values, vec![400, 700]);
        assert_eq!(chart.max_cents(), 1000);
        assert!(!chart.is_empty());
    }

    #[test]
    fn test_empty_chart() {
        assert!(ChartData::default().is_empty());
        let chart = ChartData::from_months("Expense", &year_monthly_series(2023, &[]));
        assert!(chart.is_empty());
        assert_eq!(chart.max_cents(), 0);
    }

    #[test]
    fn test_year_category_stats_decode() {
        let json = r#"{"year":2024,"type":"expense","totalCents":2000,
            "breakdown":[{"categoryId":2,"amountCents":2000}],
            "monthlyTotals":[{"month":"2024-05","amountCents":2000}]}"#;
        let stats: YearCategoryStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.category_type, CategoryType::Expense);
        assert_eq!(stats.breakdown[0].category_id, 2);
        assert_eq!(stats.monthly_totals[0].month, "2024-05");
    }
}
