//! HTTP client for the Money Tracker API (wallets, transfers, adjustments, read-only views).
use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{ClientError, Result};
use crate::ids::{TransactionId, WalletId};
use crate::models::{
    BalanceAdjustment, BalanceAdjustmentRequest, Categories, CategorySpending, DashboardData,
    NewUser, Token, Transaction, TransactionDraft, TransactionQuery, TransactionUpdate,
    TransferRequest, User, Wallet, WalletDraft, WalletTransfer,
};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// The wallet endpoints the store and workflows depend on.
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// GET /wallets
    async fn list_wallets(&self) -> Result<Vec<Wallet>>;
    /// POST /wallets
    async fn create_wallet(&self, draft: &WalletDraft) -> Result<Wallet>;
    /// PUT /wallets/{id} with the full wallet
    async fn update_wallet(&self, wallet: &Wallet) -> Result<Wallet>;
    /// DELETE /wallets/{id}
    async fn delete_wallet(&self, id: WalletId) -> Result<()>;
    /// POST /wallets/transfer
    async fn transfer(&self, request: &TransferRequest) -> Result<()>;
    /// POST /wallets/{id}/adjust
    async fn adjust_balance(&self, request: &BalanceAdjustmentRequest) -> Result<()>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

/// `detail` field of an error body, when it is a plain string.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    json.get("detail").and_then(|v| v.as_str()).map(String::from)
}

impl ApiClient {
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.credentials.token()?.ok_or(ClientError::NotLoggedIn)?;
        tracing::debug!(%method, path, "api request");
        Ok(self
            .http
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("Bearer {}", token)))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(%status, body = %body, "api error response");
        Err(ClientError::Api {
            status,
            detail: error_detail(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let text = self.send(request).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// POST /token (OAuth2 password form). Does not need an existing session.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token> {
        tracing::debug!(username, "api login");
        let request = self
            .http
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)]);
        self.send_json(request).await
    }

    /// GET /dashboard
    pub async fn dashboard(&self) -> Result<DashboardData> {
        self.send_json(self.authorized(Method::GET, "/dashboard")?).await
    }

    /// GET /analytics/category-spending
    pub async fn category_spending(&self) -> Result<CategorySpending> {
        self.send_json(self.authorized(Method::GET, "/analytics/category-spending")?)
            .await
    }

    /// GET /wallets/transfers, newest first.
    pub async fn list_transfers(&self, skip: u32, limit: u32) -> Result<Vec<WalletTransfer>> {
        let request = self
            .authorized(Method::GET, "/wallets/transfers")?
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json(request).await
    }

    /// GET /wallets/{id}/adjustments, newest first.
    pub async fn list_adjustments(
        &self,
        wallet_id: WalletId,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<BalanceAdjustment>> {
        let path = format!("/wallets/{}/adjustments", wallet_id);
        let request = self
            .authorized(Method::GET, &path)?
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json(request).await
    }

    /// POST /register. Like login, needs no session.
    pub async fn register(&self, user: &NewUser) -> Result<User> {
        tracing::debug!(username = %user.username, "api register");
        self.send_json(self.http.post(self.url("/register")).json(user))
            .await
    }

    /// GET /me
    pub async fn me(&self) -> Result<User> {
        self.send_json(self.authorized(Method::GET, "/me")?).await
    }

    /// GET /transactions, optionally narrowed to one category.
    pub async fn list_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let mut request = self
            .authorized(Method::GET, "/transactions")?
            .query(&[("skip", query.skip), ("limit", query.limit)]);
        if let Some(category) = &query.category {
            request = request.query(&[("category", category)]);
        }
        self.send_json(request).await
    }

    /// GET /transactions/{id}
    pub async fn transaction(&self, id: TransactionId) -> Result<Transaction> {
        let path = format!("/transactions/{}", id);
        self.send_json(self.authorized(Method::GET, &path)?).await
    }

    /// POST /transactions
    pub async fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction> {
        let request = self.authorized(Method::POST, "/transactions")?.json(draft);
        let created: Transaction = self.send_json(request).await?;
        tracing::info!(transaction_id = %created.id, "transaction created");
        Ok(created)
    }

    /// PUT /transactions/{id} with only the changed fields.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        update: &TransactionUpdate,
    ) -> Result<Transaction> {
        let path = format!("/transactions/{}", id);
        let request = self.authorized(Method::PUT, &path)?.json(update);
        self.send_json(request).await
    }

    /// DELETE /transactions/{id}
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<()> {
        let path = format!("/transactions/{}", id);
        self.send(self.authorized(Method::DELETE, &path)?).await?;
        tracing::info!(transaction_id = %id, "transaction deleted");
        Ok(())
    }

    /// GET /categories. The list is public, so no bearer is attached.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let body: Categories = self.send_json(self.http.get(self.url("/categories"))).await?;
        Ok(body.categories)
    }
}

#[async_trait]
impl WalletApi for ApiClient {
    async fn list_wallets(&self) -> Result<Vec<Wallet>> {
        self.send_json(self.authorized(Method::GET, "/wallets")?).await
    }

    async fn create_wallet(&self, draft: &WalletDraft) -> Result<Wallet> {
        let request = self.authorized(Method::POST, "/wallets")?.json(draft);
        self.send_json(request).await
    }

    async fn update_wallet(&self, wallet: &Wallet) -> Result<Wallet> {
        let path = format!("/wallets/{}", wallet.id);
        let request = self.authorized(Method::PUT, &path)?.json(wallet);
        self.send_json(request).await
    }

    async fn delete_wallet(&self, id: WalletId) -> Result<()> {
        let path = format!("/wallets/{}", id);
        self.send(self.authorized(Method::DELETE, &path)?).await?;
        Ok(())
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<()> {
        let builder = self.authorized(Method::POST, "/wallets/transfer")?.json(request);
        self.send(builder).await?;
        Ok(())
    }

    async fn adjust_balance(&self, request: &BalanceAdjustmentRequest) -> Result<()> {
        let path = format!("/wallets/{}/adjust", request.wallet_id);
        let builder = self.authorized(Method::POST, &path)?.json(request);
        self.send(builder).await?;
        Ok(())
    }
}
