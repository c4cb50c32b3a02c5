use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::domain::errors::CheckoutError;
use crate::domain::order::{OrderDraft, PlacedOrder};
use crate::domain::ports::OrderGateway;
use crate::errors::AppError;

/// `OrderGateway` over the storefront REST backend.
pub struct HttpOrderGateway {
    client: Client,
    base_url: String,
}

impl HttpOrderGateway {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network(e: reqwest::Error) -> CheckoutError {
    CheckoutError::Network(e.to_string())
}

/// Pulls `detail` out of an error body when it is a plain string. FastAPI
/// validation errors carry a list there, which is not fit for display.
fn rejection_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

async fn rejection(resp: Response) -> CheckoutError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    CheckoutError::Rejected {
        status,
        detail: rejection_detail(&body),
    }
}

impl OrderGateway for HttpOrderGateway {
    async fn create_order(&self, draft: &OrderDraft) -> Result<PlacedOrder, CheckoutError> {
        let resp = self
            .client
            .post(self.url("/orders"))
            .json(draft)
            .send()
            .await
            .map_err(network)?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        resp.json::<PlacedOrder>()
            .await
            .map_err(|e| CheckoutError::InvalidResponse(e.to_string()))
    }

    async fn list_orders(&self, today_only: bool) -> Result<Vec<PlacedOrder>, CheckoutError> {
        let resp = self
            .client
            .get(self.url("/orders"))
            .query(&[("today_only", today_only)])
            .send()
            .await
            .map_err(network)?;

        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| CheckoutError::InvalidResponse(e.to_string()))
    }

    async fn get_order(&self, id: i64) -> Result<Option<PlacedOrder>, CheckoutError> {
        let resp = self
            .client
            .get(self.url(&format!("/orders/{}", id)))
            .send()
            .await
            .map_err(network)?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => resp
                .json()
                .await
                .map(Some)
                .map_err(|e| CheckoutError::InvalidResponse(e.to_string())),
            _ => Err(rejection(resp).await),
        }
    }
}
