use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::query::{AuditLogQuery, TransactionListQuery};
use shared::stats::{MonthlyRange, PeriodCompare, YearCategoryStats, YoYMonthlyStats};
use shared::{
    ApiError, AuditLogPage, AuthUser, BankAccount, CategoryNode, CategoryTag, CategoryType,
    CreateBankAccountRequest, CreateCategoryRequest, CreateCategoryTagRequest, CreateRefundRequest,
    CreateTransactionRequest, CreateTransferRequest, CreateUserRequest, LoginRequest,
    MoveCategoryRequest, TokenResponse, TransactionPage, TransactionRow, UpdateBankAccountRequest,
    UpdateCategoryRequest, UpdateTransactionRequest, UpdateUserRequest, User,
};
use web_sys::RequestCredentials;

/// Response body of create endpoints that only echo the new id
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Created {
    pub id: i64,
}

/// API client for the bookkeeping REST service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .credentials(RequestCredentials::Include)
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send(request: Result<Request, gloo::net::Error>) -> Result<Response, ApiError> {
        let request = request.map_err(|e| ApiError::Network(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if response.ok() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Self::send(self.prepare(Request::get(&self.url(path))).build()).await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let response = Self::send(self.prepare(Request::post(&self.url(path))).json(body)).await?;
        Self::decode(response).await
    }

    async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let response = Self::send(self.prepare(Request::patch(&self.url(path))).json(body)).await?;
        Self::decode(response).await
    }

    /// PATCH whose response body is not needed
    async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        Self::send(self.prepare(Request::patch(&self.url(path))).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        Self::send(self.prepare(Request::delete(&self.url(path))).build()).await?;
        Ok(())
    }

    fn encode(query: Result<String, serde_urlencoded::ser::Error>) -> Result<String, ApiError> {
        query.map_err(|e| ApiError::Decode(format!("could not encode query: {}", e)))
    }

    // Session

    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.post("/auth/login", request).await
    }

    pub async fn me(&self) -> Result<AuthUser, ApiError> {
        self.get("/auth/me").await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        Self::send(self.prepare(Request::post(&self.url("/auth/logout"))).build()).await?;
        Ok(())
    }

    // Categories

    pub async fn category_tree(&self, category_type: CategoryType) -> Result<Vec<CategoryNode>, ApiError> {
        self.get(&format!("/config/categories/tree?type={}", category_type.as_str()))
            .await
    }

    pub async fn create_category(&self, request: &CreateCategoryRequest) -> Result<Created, ApiError> {
        self.post("/config/categories", request).await
    }

    pub async fn update_category(&self, id: i64, request: &UpdateCategoryRequest) -> Result<(), ApiError> {
        self.patch_unit(&format!("/config/categories/{}", id), request).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/config/categories/{}", id)).await
    }

    pub async fn move_category(&self, id: i64, request: &MoveCategoryRequest) -> Result<(), ApiError> {
        self.patch_unit(&format!("/config/categories/{}/move", id), request)
            .await
    }

    pub async fn category_tags(&self, category_id: i64) -> Result<Vec<CategoryTag>, ApiError> {
        self.get(&format!("/config/categories/{}/tags?activeOnly=false", category_id))
            .await
    }

    pub async fn create_category_tag(
        &self,
        category_id: i64,
        request: &CreateCategoryTagRequest,
    ) -> Result<CategoryTag, ApiError> {
        self.post(&format!("/config/categories/{}/tags", category_id), request)
            .await
    }

    pub async fn delete_category_tag(&self, category_id: i64, tag_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/config/categories/{}/tags/{}", category_id, tag_id))
            .await
    }

    // Ledger

    pub async fn transactions(&self, query: &TransactionListQuery) -> Result<TransactionPage, ApiError> {
        let query = Self::encode(query.to_query_string())?;
        self.get(&format!("/ledger/transactions?{}", query)).await
    }

    pub async fn create_transaction(&self, request: &CreateTransactionRequest) -> Result<TransactionRow, ApiError> {
        self.post("/ledger/transactions", request).await
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        request: &UpdateTransactionRequest,
    ) -> Result<TransactionRow, ApiError> {
        self.patch(&format!("/ledger/transactions/{}", id), request).await
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/ledger/transactions/{}", id)).await
    }

    pub async fn refund_transaction(&self, id: i64, request: &CreateRefundRequest) -> Result<TransactionRow, ApiError> {
        self.post(&format!("/ledger/transactions/{}/refund", id), request)
            .await
    }

    pub async fn create_transfer(&self, request: &CreateTransferRequest) -> Result<TransactionRow, ApiError> {
        self.post("/ledger/transfers", request).await
    }

    // Bank accounts

    pub async fn bank_accounts(&self) -> Result<Vec<BankAccount>, ApiError> {
        self.get("/config/bank-accounts?orderBy=usage").await
    }

    pub async fn create_bank_account(&self, request: &CreateBankAccountRequest) -> Result<BankAccount, ApiError> {
        self.post("/config/bank-accounts", request).await
    }

    pub async fn update_bank_account(
        &self,
        id: i64,
        request: &UpdateBankAccountRequest,
    ) -> Result<BankAccount, ApiError> {
        self.patch(&format!("/config/bank-accounts/{}", id), request).await
    }

    // Users

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/config/users").await
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        self.post("/config/users", request).await
    }

    pub async fn update_user(&self, id: i64, request: &UpdateUserRequest) -> Result<User, ApiError> {
        self.patch(&format!("/config/users/{}", id), request).await
    }

    // Audit log

    pub async fn audit_logs(&self, query: &AuditLogQuery) -> Result<AuditLogPage, ApiError> {
        let query = Self::encode(query.to_query_string())?;
        self.get(&format!("/admin/transaction-audit-logs?{}", query)).await
    }

    // Statistics

    pub async fn year_category_stats(
        &self,
        year: i32,
        category_type: CategoryType,
    ) -> Result<YearCategoryStats, ApiError> {
        self.get(&format!(
            "/stats/year-category?year={}&type={}",
            year,
            category_type.as_str()
        ))
        .await
    }

    pub async fn monthly_range(&self, start_month: &str, end_month: &str) -> Result<MonthlyRange, ApiError> {
        self.get(&format!(
            "/stats/monthly-range?startMonth={}&endMonth={}",
            start_month, end_month
        ))
        .await
    }

    pub async fn yoy_monthly(&self, year: i32, category_type: CategoryType) -> Result<YoYMonthlyStats, ApiError> {
        self.get(&format!(
            "/stats/yoy-monthly?year={}&type={}",
            year,
            category_type.as_str()
        ))
        .await
    }

    pub async fn month_over_month(
        &self,
        year: i32,
        month: u32,
        category_type: CategoryType,
    ) -> Result<PeriodCompare, ApiError> {
        self.get(&format!(
            "/stats/mom?year={}&month={}&type={}",
            year,
            month,
            category_type.as_str()
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("https://books.example/api/", None);
        assert_eq!(client.url("/auth/me"), "https://books.example/api/auth/me");
    }

    #[test]
    fn test_clients_compare_by_token() {
        let a = ApiClient::new("/api", Some("t1".to_string()));
        let b = ApiClient::new("/api", Some("t2".to_string()));
        assert_ne!(a, b);
        assert_eq!(a, ApiClient::new("/api/", Some("t1".to_string())));
    }
}
