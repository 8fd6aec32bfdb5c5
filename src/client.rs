//! JSON REST client for the expense API.
//!
//! Requests are issued relative to a base URL (for example
//! `http://127.0.0.1:8080/api`). Resource-specific calls are grouped behind
//! [`ApiClient::expenses`], [`ApiClient::budgets`] and
//! [`ApiClient::categories`].

use crate::errors::ClientError;
use crate::models::{
    AlertQuery, AlertsResponse, Budget, BudgetPayload, BudgetQuery, BudgetStatusResponse,
    Category, CategoryPayload, CategorySummary, Expense, ExpensePayload, ExpenseQuery,
    ExpenseUpdate, InitializeResponse, Message, MonthlySummary, Mutation, PeriodQuery,
    StatusQuery, UsageResponse,
};
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::error;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn request<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|err| {
                error!("API request failed: {err}");
                ClientError::from(err)
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            error!("API request failed: {err}");
            ClientError::from(err)
        })?;

        if !status.is_success() {
            let message = error_detail(&bytes)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            error!("API request failed: {message}");
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            error!("API request failed: {err}");
            ClientError::from(err)
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(self.http.get(self.url(endpoint))).await
    }

    pub async fn get_with<T, Q>(&self, endpoint: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(self.http.get(self.url(endpoint)).query(query))
            .await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(self.http.post(self.url(endpoint)).json(body))
            .await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(self.http.put(self.url(endpoint)).json(body))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(self.http.delete(self.url(endpoint))).await
    }

    pub fn expenses(&self) -> ExpensesApi<'_> {
        ExpensesApi { client: self }
    }

    pub fn budgets(&self) -> BudgetsApi<'_> {
        BudgetsApi { client: self }
    }

    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi { client: self }
    }
}

/// Pulls a string `detail` out of an error body, if there is one.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

pub struct ExpensesApi<'a> {
    client: &'a ApiClient,
}

impl ExpensesApi<'_> {
    pub async fn list(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, ClientError> {
        self.client.get_with("/expenses", query).await
    }

    pub async fn create(&self, payload: &ExpensePayload) -> Result<Mutation<Expense>, ClientError> {
        self.client.post("/expenses", payload).await
    }

    pub async fn update(
        &self,
        id: &str,
        update: &ExpenseUpdate,
    ) -> Result<Mutation<Expense>, ClientError> {
        self.client.put(&format!("/expenses/{id}"), update).await
    }

    pub async fn delete(&self, id: &str) -> Result<Message, ClientError> {
        self.client.delete(&format!("/expenses/{id}")).await
    }

    pub async fn category_summary(
        &self,
        query: &PeriodQuery,
    ) -> Result<Vec<CategorySummary>, ClientError> {
        self.client
            .get_with("/expenses/summary/category", query)
            .await
    }

    pub async fn monthly_summary(
        &self,
        year: Option<i32>,
    ) -> Result<Vec<MonthlySummary>, ClientError> {
        let query = PeriodQuery { year, month: None };
        self.client
            .get_with("/expenses/summary/monthly", &query)
            .await
    }
}

pub struct BudgetsApi<'a> {
    client: &'a ApiClient,
}

impl BudgetsApi<'_> {
    pub async fn list(&self, query: &BudgetQuery) -> Result<Vec<Budget>, ClientError> {
        self.client.get_with("/budgets", query).await
    }

    pub async fn create(&self, payload: &BudgetPayload) -> Result<Mutation<Budget>, ClientError> {
        self.client.post("/budgets", payload).await
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &BudgetPayload,
    ) -> Result<Mutation<Budget>, ClientError> {
        self.client.put(&format!("/budgets/{id}"), payload).await
    }

    pub async fn delete(&self, id: &str) -> Result<Message, ClientError> {
        self.client.delete(&format!("/budgets/{id}")).await
    }

    pub async fn status(&self, query: &StatusQuery) -> Result<BudgetStatusResponse, ClientError> {
        self.client.get_with("/budgets/status", query).await
    }

    pub async fn alerts(&self, query: &AlertQuery) -> Result<AlertsResponse, ClientError> {
        self.client.get_with("/budgets/alerts", query).await
    }
}

pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl CategoriesApi<'_> {
    pub async fn list(&self) -> Result<Vec<Category>, ClientError> {
        self.client.get("/categories").await
    }

    pub async fn create(
        &self,
        payload: &CategoryPayload,
    ) -> Result<Mutation<Category>, ClientError> {
        self.client.post("/categories", payload).await
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &CategoryPayload,
    ) -> Result<Mutation<Category>, ClientError> {
        self.client.put(&format!("/categories/{id}"), payload).await
    }

    pub async fn delete(&self, id: &str) -> Result<Message, ClientError> {
        self.client.delete(&format!("/categories/{id}")).await
    }

    pub async fn usage(&self, query: &PeriodQuery) -> Result<UsageResponse, ClientError> {
        self.client.get_with("/categories/usage", query).await
    }

    pub async fn initialize(&self) -> Result<InitializeResponse, ClientError> {
        self.client
            .post("/categories/initialize", &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/expenses"), "http://localhost:8000/api/expenses");
    }

    #[test]
    fn detail_is_read_from_error_body() {
        let body = br#"{"detail":"Category is in use"}"#;
        assert_eq!(error_detail(body).as_deref(), Some("Category is in use"));
    }

    #[test]
    fn missing_detail_yields_none() {
        assert_eq!(error_detail(b"Internal Server Error"), None);
        assert_eq!(error_detail(br#"{"error":"x"}"#), None);
        assert_eq!(error_detail(br#"{"detail":null}"#), None);
    }
}
