//! Date grouping and subtotals over one page of transactions.

use crate::{TransactionPage, TransactionRow, TransactionType};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;

/// Calendar day a row is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Date(NaiveDate),
    /// Rows whose `occurred_at` could not be parsed
    Unknown,
}

impl GroupKey {
    /// Stable key for list rendering
    pub fn key(&self) -> String {
        format!("date:{}", self)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            GroupKey::Unknown => f.write_str("Unknown date"),
        }
    }
}

/// Rows of one calendar day with their income and expense subtotals
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub key: GroupKey,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub rows: Vec<TransactionRow>,
}

impl GroupRow {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// Income and expense over a set of rows. Transfers and refunds count towards neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTotals {
    pub income_cents: i64,
    pub expense_cents: i64,
}

impl PageTotals {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a TransactionRow>) -> Self {
        rows.into_iter().fold(PageTotals::default(), |mut totals, row| {
            totals.add(row);
            totals
        })
    }

    pub fn from_groups(groups: &[GroupRow]) -> Self {
        groups.iter().fold(PageTotals::default(), |totals, group| PageTotals {
            income_cents: totals.income_cents + group.income_cents,
            expense_cents: totals.expense_cents + group.expense_cents,
        })
    }

    /// Summary the server computed over the whole filtered set
    pub fn from_page(page: &TransactionPage) -> Self {
        PageTotals {
            income_cents: page.income_cents,
            expense_cents: page.expense_cents,
        }
    }

    fn add(&mut self, row: &TransactionRow) {
        match row.transaction_type {
            TransactionType::Income => self.income_cents += row.amount_cents,
            TransactionType::Expense => self.expense_cents += row.amount_cents,
            TransactionType::Transfer | TransactionType::Refund => {}
        }
    }
}

impl TransactionPage {
    /// When the page holds every matching row, the client totals must equal the
    /// server summary. `None` when the page is only a slice of the result set.
    pub fn client_totals_agree(&self) -> Option<bool> {
        if self.total as usize != self.items.len() {
            return None;
        }
        Some(PageTotals::from_rows(&self.items) == PageTotals::from_page(self))
    }
}

/// Day of `occurred_at` in the viewer's offset
pub fn date_key(occurred_at: &str, offset: FixedOffset) -> GroupKey {
    let value = occurred_at.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return GroupKey::Date(dt.with_timezone(&offset).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return GroupKey::Date(naive.date());
        }
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => GroupKey::Date(date),
        Err(_) => GroupKey::Unknown,
    }
}

/// Group rows by day. Groups keep first-seen order and rows keep input order.
pub fn group_by_date(rows: &[TransactionRow], offset: FixedOffset) -> Vec<GroupRow> {
    let mut groups: Vec<GroupRow> = Vec::new();
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();

    for row in rows {
        let key = date_key(&row.occurred_at, offset);
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(GroupRow {
                key,
                income_cents: 0,
                expense_cents: 0,
                rows: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        match row.transaction_type {
            TransactionType::Income => group.income_cents += row.amount_cents,
            TransactionType::Expense => group.expense_cents += row.amount_cents,
            TransactionType::Transfer | TransactionType::Refund => {}
        }
        group.rows.push(row.clone());
    }

    groups
}

/// Refund rows recorded against `parent_id`, in server order
pub fn refunds_for(parent_id: i64, refund_items: &[TransactionRow]) -> Vec<&TransactionRow> {
    refund_items
        .iter()
        .filter(|r| r.refund_of_transaction_id == Some(parent_id))
        .collect()
}

/// What is left to refund on an expense
pub fn refundable_cents(row: &TransactionRow) -> i64 {
    if row.transaction_type != TransactionType::Expense {
        return 0;
    }
    (row.amount_cents - row.refunded_cents.unwrap_or(0)).max(0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{FundingSource, TransactionRow, TransactionType};

    pub fn row(id: i64, occurred_at: &str, transaction_type: TransactionType, amount_cents: i64) -> TransactionRow {
        TransactionRow {
            id,
            transaction_type,
            amount_cents,
            occurred_at: occurred_at.to_string(),
            created_at: occurred_at.to_string(),
            category_id: Some(1),
            funding_source: FundingSource::Bank,
            bank_account_id: Some(1),
            to_bank_account_id: None,
            refund_of_transaction_id: None,
            refunded_cents: None,
            note: None,
            tag_ids: Vec::new(),
            tag_names: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::row;
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(s: &str) -> GroupKey {
        GroupKey::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
    }

    #[test]
    fn test_groups_in_first_seen_order_with_subtotals() {
        let rows = vec![
            row(1, "2024-01-02", TransactionType::Expense, 500),
            row(2, "2024-01-01", TransactionType::Income, 1000),
            row(3, "2024-01-02", TransactionType::Income, 200),
        ];

        let groups = group_by_date(&rows, utc());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, day("2024-01-02"));
        assert_eq!(groups[0].income_cents, 200);
        assert_eq!(groups[0].expense_cents, 500);
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[1].key, day("2024-01-01"));
        assert_eq!(groups[1].income_cents, 1000);
        assert_eq!(groups[1].expense_cents, 0);
        assert_eq!(groups[1].count(), 1);
    }

    #[test]
    fn test_row_order_is_preserved_within_group() {
        let rows = vec![
            row(5, "2024-05-01T09:00:00Z", TransactionType::Expense, 1),
            row(3, "2024-05-02T09:00:00Z", TransactionType::Expense, 1),
            row(9, "2024-05-01T08:00:00Z", TransactionType::Expense, 1),
            row(1, "2024-05-01T23:00:00Z", TransactionType::Expense, 1),
        ];
        let groups = group_by_date(&rows, utc());
        let ids: Vec<i64> = groups[0].rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 9, 1]);
    }

    #[test]
    fn test_group_sums_match_input_sums() {
        let types = [
            TransactionType::Income,
            TransactionType::Expense,
            TransactionType::Transfer,
            TransactionType::Refund,
        ];
        let rows: Vec<TransactionRow> = (0..40)
            .map(|i| {
                let date = format!("2024-02-{:02}T10:00:00Z", (i * 7) % 28 + 1);
                row(i, &date, types[(i % 4) as usize], 100 + i * 13)
            })
            .collect();

        let groups = group_by_date(&rows, utc());
        let income: i64 = rows
            .iter()
            .filter(|r| r.transaction_type == TransactionType::Income)
            .map(|r| r.amount_cents)
            .sum();
        let expense: i64 = rows
            .iter()
            .filter(|r| r.transaction_type == TransactionType::Expense)
            .map(|r| r.amount_cents)
            .sum();

        let totals = PageTotals::from_groups(&groups);
        assert_eq!(totals.income_cents, income);
        assert_eq!(totals.expense_cents, expense);
        assert_eq!(totals, PageTotals::from_rows(&rows));
        assert_eq!(groups.iter().map(GroupRow::count).sum::<usize>(), rows.len());
    }

    #[test]
    fn test_transfers_and_refunds_do_not_count() {
        let rows = vec![
            row(1, "2024-01-01", TransactionType::Transfer, 700),
            row(2, "2024-01-01", TransactionType::Refund, 300),
        ];
        let groups = group_by_date(&rows, utc());
        assert_eq!(groups[0].income_cents, 0);
        assert_eq!(groups[0].expense_cents, 0);
        assert_eq!(groups[0].count(), 2);
    }

    #[test]
    fn test_unparsable_dates_share_one_group() {
        let rows = vec![
            row(1, "not a date", TransactionType::Expense, 100),
            row(2, "2024-01-01", TransactionType::Expense, 100),
            row(3, "", TransactionType::Income, 50),
        ];
        let groups = group_by_date(&rows, utc());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, GroupKey::Unknown);
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[0].key.to_string(), "Unknown date");
    }

    #[test]
    fn test_timestamps_are_bucketed_in_viewer_offset() {
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(date_key("2024-01-01T20:00:00Z", shanghai), day("2024-01-02"));
        assert_eq!(date_key("2024-01-01T20:00:00Z", utc()), day("2024-01-01"));
        assert_eq!(date_key("2024-01-01T20:00:00", shanghai), day("2024-01-01"));
        assert_eq!(date_key("2024-01-01T20:00:00.123456", utc()), day("2024-01-01"));
    }

    #[test]
    fn test_group_key_formats_as_iso_date() {
        assert_eq!(day("2024-03-09").to_string(), "2024-03-09");
        assert_eq!(day("2024-03-09").key(), "date:2024-03-09");
    }

    #[test]
    fn test_client_totals_agree_only_checked_for_full_pages() {
        let items = vec![
            row(1, "2024-01-01", TransactionType::Income, 1000),
            row(2, "2024-01-01", TransactionType::Expense, 400),
        ];
        let mut page = TransactionPage {
            items,
            refund_items: Vec::new(),
            total: 2,
            income_cents: 1000,
            expense_cents: 400,
        };
        assert_eq!(page.client_totals_agree(), Some(true));

        page.expense_cents = 401;
        assert_eq!(page.client_totals_agree(), Some(false));

        page.total = 10;
        assert_eq!(page.client_totals_agree(), None);
    }

    #[test]
    fn test_refunds_attach_to_parent_and_reduce_refundable() {
        let mut expense = row(1, "2024-01-01", TransactionType::Expense, 1000);
        expense.refunded_cents = Some(300);
        let mut refund = row(2, "2024-01-03", TransactionType::Refund, 300);
        refund.refund_of_transaction_id = Some(1);
        let mut other = row(3, "2024-01-03", TransactionType::Refund, 50);
        other.refund_of_transaction_id = Some(9);
        let refunds = vec![refund, other];

        let attached = refunds_for(1, &refunds);
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].id, 2);
        assert_eq!(refundable_cents(&expense), 700);
        assert!(expense.is_refundable());

        expense.refunded_cents = Some(1000);
        assert!(!expense.is_refundable());
        assert_eq!(refundable_cents(&row(4, "2024-01-01", TransactionType::Income, 10)), 0);
    }
}
