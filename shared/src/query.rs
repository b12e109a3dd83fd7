//! Query strings for the paged list endpoints.

use crate::date_range::DateRange;
use crate::{AuditAction, TransactionType};
use chrono::FixedOffset;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Expense,
    Income,
    Transfer,
    Refund,
}

impl TypeFilter {
    pub const ALL: [TypeFilter; 5] = [
        TypeFilter::All,
        TypeFilter::Expense,
        TypeFilter::Income,
        TypeFilter::Transfer,
        TypeFilter::Refund,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Expense => "expense",
            TypeFilter::Income => "income",
            TypeFilter::Transfer => "transfer",
            TypeFilter::Refund => "refund",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "All types",
            TypeFilter::Expense => "Expense",
            TypeFilter::Income => "Income",
            TypeFilter::Transfer => "Transfer",
            TypeFilter::Refund => "Refund",
        }
    }

    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingFilter {
    #[default]
    All,
    Cash,
    Bank,
}

impl FundingFilter {
    pub const ALL: [FundingFilter; 3] = [FundingFilter::All, FundingFilter::Cash, FundingFilter::Bank];

    pub fn key(&self) -> &'static str {
        match self {
            FundingFilter::All => "all",
            FundingFilter::Cash => "cash",
            FundingFilter::Bank => "bank",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FundingFilter::All => "All sources",
            FundingFilter::Cash => "Cash",
            FundingFilter::Bank => "Bank",
        }
    }

    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key)
            .unwrap_or_default()
    }
}

/// Filters and paging for `GET /ledger/transactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    #[serde(rename = "type")]
    pub type_filter: TypeFilter,
    pub funding_source: FundingFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

impl TransactionListQuery {
    pub fn new(page_size: u64) -> Self {
        Self {
            type_filter: TypeFilter::All,
            funding_source: FundingFilter::All,
            bank_account_id: None,
            start: None,
            end: None,
            keyword: None,
            page: 1,
            page_size,
        }
    }

    pub fn with_range(mut self, range: Option<DateRange>, offset: FixedOffset) -> Self {
        match range {
            Some(range) => {
                let (start, end) = range.to_query_bounds(offset);
                self.start = Some(start);
                self.end = Some(end);
            }
            None => {
                self.start = None;
                self.end = None;
            }
        }
        self
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        let keyword = keyword.trim();
        self.keyword = (!keyword.is_empty()).then(|| keyword.to_string());
        self
    }

    /// Bank account filter only applies when filtering on bank funding
    pub fn effective(&self) -> Self {
        let mut query = self.clone();
        if query.funding_source != FundingFilter::Bank {
            query.bank_account_id = None;
        }
        query
    }

    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self.effective())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

/// Filters and paging for `GET /admin/transaction-audit-logs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogQuery {
    pub page: u64,
    pub page_size: u64,
    pub order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<TransactionType>,
}

impl AuditLogQuery {
    pub fn new(page_size: u64) -> Self {
        Self {
            page: 1,
            page_size,
            order: SortOrder::Desc,
            action: None,
            transaction_id: None,
            tx_type: None,
        }
    }

    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }
}
