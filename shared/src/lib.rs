use serde::{Deserialize, Serialize};
use std::fmt;

pub mod category_tree;
pub mod config;
pub mod date_range;
pub mod error;
pub mod grouping;
pub mod money;
pub mod move_planner;
pub mod pagination;
pub mod query;
pub mod stats;

pub use category_tree::{CategoryEntry, CategoryForest, CategoryOption, TreeError};
pub use config::ClientConfig;
pub use date_range::{DatePreset, DateRange};
pub use error::ApiError;
pub use grouping::{GroupKey, GroupRow, PageTotals};
pub use money::{format_cents, parse_amount_to_cents, AmountError};
pub use move_planner::{DropGesture, DropTarget, GapSide, MoveIntent, MoveRejection};
pub use query::{AuditLogQuery, TransactionListQuery};

/// Namespace a category forest belongs to. Expense and income forests are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryType::Income => "Income",
            CategoryType::Expense => "Expense",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the nested category tree as returned by `GET /config/categories/tree`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    pub id: i64,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub name: String,
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub sort_order: i64,
    pub is_active: bool,
    pub is_leaf: bool,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

/// Request for creating a category node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub name: String,
    pub parent_id: Option<i64>,
    /// Only honoured for root nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    pub is_active: bool,
}

/// Partial update of a category node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body of `PATCH /config/categories/{id}/move`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCategoryRequest {
    pub parent_id: Option<i64>,
    pub index: usize,
}

/// Tag attached to a top-level expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTag {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryTagRequest {
    pub name: String,
    pub is_active: bool,
}

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
    Refund,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
            TransactionType::Refund => "refund",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::Transfer => "Transfer",
            TransactionType::Refund => "Refund",
        }
    }

    /// Category namespace used by this kind of entry, if any
    pub fn category_type(&self) -> Option<CategoryType> {
        match self {
            TransactionType::Income => Some(CategoryType::Income),
            TransactionType::Expense | TransactionType::Refund => Some(CategoryType::Expense),
            TransactionType::Transfer => None,
        }
    }
}

/// Where the money of a single-account entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundingSource {
    Cash,
    Bank,
}

impl FundingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingSource::Cash => "cash",
            FundingSource::Bank => "bank",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FundingSource::Cash => "Cash",
            FundingSource::Bank => "Bank / credit card",
        }
    }
}

/// One posted ledger entry as rendered in the transaction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub id: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount_cents: i64,
    /// Business time, editable (RFC 3339 as sent by the API)
    pub occurred_at: String,
    /// Record time, immutable
    pub created_at: String,
    pub category_id: Option<i64>,
    pub funding_source: FundingSource,
    pub bank_account_id: Option<i64>,
    #[serde(default)]
    pub to_bank_account_id: Option<i64>,
    #[serde(default)]
    pub refund_of_transaction_id: Option<i64>,
    #[serde(default)]
    pub refunded_cents: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

impl TransactionRow {
    /// Only time, category, tags and note can change after creation, and never on transfers
    pub fn is_editable(&self) -> bool {
        matches!(
            self.transaction_type,
            TransactionType::Income | TransactionType::Expense
        )
    }

    /// Refunds are recorded against bank-funded expenses
    pub fn is_refundable(&self) -> bool {
        self.transaction_type == TransactionType::Expense
            && self.funding_source == FundingSource::Bank
            && grouping::refundable_cents(self) > 0
    }
}

/// Server-paged, server-filtered transaction list (`GET /ledger/transactions`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<TransactionRow>,
    /// Refund rows whose parent expense is on this page
    #[serde(default)]
    pub refund_items: Vec<TransactionRow>,
    /// Number of rows matching the filter across all pages
    pub total: u64,
    /// Income over the whole filtered set
    pub income_cents: i64,
    /// Expense over the whole filtered set
    pub expense_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount_cents: i64,
    pub occurred_at: String,
    pub category_id: i64,
    pub funding_source: FundingSource,
    pub bank_account_id: Option<i64>,
    pub tag_ids: Vec<i64>,
    pub note: Option<String>,
}

/// Partial update: amount, type and accounts are immutable after creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<i64>>,
    /// An empty string clears the note server-side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub from_bank_account_id: i64,
    pub to_bank_account_id: i64,
    pub amount_cents: i64,
    pub occurred_at: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefundMode {
    Full,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRefundRequest {
    pub mode: RefundMode,
    /// Required for partial refunds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankAccountKind {
    Debit,
    Credit,
}

impl BankAccountKind {
    pub fn label(&self) -> &'static str {
        match self {
            BankAccountKind::Debit => "Debit",
            BankAccountKind::Credit => "Credit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: i64,
    pub bank_name: String,
    pub alias: String,
    pub last4: Option<String>,
    pub kind: BankAccountKind,
    pub balance_cents: i64,
    #[serde(default)]
    pub billing_day: Option<u8>,
    #[serde(default)]
    pub repayment_day: Option<u8>,
    pub is_active: bool,
}

impl BankAccount {
    /// "Bank-alias(1234)"
    pub fn display_name(&self) -> String {
        match &self.last4 {
            Some(last4) => format!("{}-{}({})", self.bank_name, self.alias, last4),
            None => format!("{}-{}", self.bank_name, self.alias),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankAccountRequest {
    pub bank_name: String,
    pub alias: String,
    pub last4: Option<String>,
    pub kind: BankAccountKind,
    pub balance_cents: i64,
    pub billing_day: Option<u8>,
    pub repayment_day: Option<u8>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBankAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<BankAccountKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repayment_day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::User => "User",
        }
    }
}

/// The signed-in user as reported by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Account managed from the user administration screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub is_active: bool,
    pub time_zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

/// One entry of the server-side transaction audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: i64,
    pub action: AuditAction,
    pub actor_user_id: i64,
    pub target_user_id: i64,
    pub transaction_id: Option<i64>,
    pub tx_type: Option<TransactionType>,
    pub created_at: String,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLogPage {
    #[serde(default)]
    pub items: Vec<AuditLogEntry>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_node_deserializes_nested_camel_case() {
        let json = r#"[{
            "id": 1, "type": "expense", "name": "Food", "parentId": null,
            "sortOrder": 0, "isActive": true, "isLeaf": false,
            "children": [{
                "id": 2, "type": "expense", "name": "Groceries", "parentId": 1,
                "sortOrder": 0, "isActive": false, "isLeaf": true, "children": []
            }]
        }]"#;

        let forest: Vec<CategoryNode> = serde_json::from_str(json).unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].category_type, CategoryType::Expense);
        assert_eq!(forest[0].children[0].parent_id, Some(1));
        assert!(!forest[0].children[0].is_active);
    }

    #[test]
    fn test_transaction_row_tolerates_missing_optional_fields() {
        let json = r#"{
            "id": 7, "type": "transfer", "amountCents": 1500,
            "occurredAt": "2024-03-01T08:00:00Z", "createdAt": "2024-03-01T08:00:01Z",
            "categoryId": null, "fundingSource": "bank", "bankAccountId": 3
        }"#;

        let row: TransactionRow = serde_json::from_str(json).unwrap();

        assert_eq!(row.transaction_type, TransactionType::Transfer);
        assert!(row.tag_ids.is_empty());
        assert_eq!(row.to_bank_account_id, None);
        assert!(!row.is_editable());
    }

    #[test]
    fn test_move_request_serializes_parent_and_index() {
        let body = MoveCategoryRequest { parent_id: None, index: 2 };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "parentId": null, "index": 2 }));
    }

    #[test]
    fn test_update_transaction_skips_absent_fields() {
        let body = UpdateTransactionRequest {
            category_id: Some(4),
            ..Default::default()
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "categoryId": 4 }));
    }

    #[test]
    fn test_auth_user_role_defaults_to_user() {
        let user: AuthUser = serde_json::from_str(r#"{"id": 1, "username": "amy"}"#).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_admin());
    }

    #[test]
    fn test_bank_account_display_name() {
        let mut account = BankAccount {
            id: 1,
            bank_name: "CMB".to_string(),
            alias: "Salary".to_string(),
            last4: Some("1234".to_string()),
            kind: BankAccountKind::Debit,
            balance_cents: 0,
            billing_day: None,
            repayment_day: None,
            is_active: true,
        };
        assert_eq!(account.display_name(), "CMB-Salary(1234)");
        account.last4 = None;
        assert_eq!(account.display_name(), "CMB-Salary");
    }
}
