//! reqwest-backed [`Gateway`] talking to the DevBills REST API.

use std::time::Duration;

use async_trait::async_trait;
use devbills_core::{
    Category, CreateTransaction, MonthlyItem, Period, Transaction, TransactionFilter,
    TransactionSummary,
};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

#[derive(Serialize)]
struct PeriodQuery {
    month: u32,
    year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    months: Option<u32>,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Session,
    ) -> Result<Self, GatewayError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| GatewayError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/{collection}/{id}` with `id` encoded as a single path segment.
    fn item_url(&self, collection: &str, id: &str) -> Result<Url, GatewayError> {
        let invalid = || GatewayError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(collection)
            .push(id);
        Ok(url)
    }

    /// Attach the session's bearer token, send, and map failures.
    ///
    /// A 401 clears the session so every subscriber sees the sign-out.
    async fn send(
        &self,
        method: &'static str,
        path: &str,
        req: RequestBuilder,
    ) -> Result<Response, GatewayError> {
        let token = self.session.token().ok_or(GatewayError::NotSignedIn)?;

        tracing::debug!(method, path, "api request");
        let resp = req.bearer_auth(token).send().await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(method, path, "api rejected credentials; signing out");
            self.session.sign_out();
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let resp = self.send(method, path, req).await?;
        resp.json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(format!("{path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &impl Serialize,
    ) -> Result<T, GatewayError> {
        let req = self.client.get(self.url(path)).query(query);
        self.fetch_json("GET", path, req).await
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, GatewayError> {
        Period::new(filter.month, filter.year)?;
        self.get_json("/transactions", filter).await
    }

    async fn get_summary(&self, period: Period) -> Result<TransactionSummary, GatewayError> {
        let query = PeriodQuery {
            month: period.month(),
            year: period.year(),
            months: None,
        };
        let raw: Value = self.get_json("/transactions/summary", &query).await?;
        normalize_summary(raw)
    }

    async fn get_monthly_history(
        &self,
        period: Period,
        months: u32,
    ) -> Result<Vec<MonthlyItem>, GatewayError> {
        let query = PeriodQuery {
            month: period.month(),
            year: period.year(),
            months: Some(months),
        };
        let raw: Value = self.get_json("/transactions/historical", &query).await?;
        Ok(normalize_history(&raw))
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.item_url("transactions", id)?;
        let path = url.path().to_string();
        let req = self.client.delete(url);
        self.send("DELETE", &path, req).await?;
        Ok(())
    }

    async fn create_transaction(
        &self,
        payload: &CreateTransaction,
    ) -> Result<Transaction, GatewayError> {
        let path = "/transactions";
        let req = self.client.post(self.url(path)).json(payload);
        self.fetch_json("POST", path, req).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        let path = "/categories";
        let req = self.client.get(self.url(path));
        self.fetch_json("GET", path, req).await
    }
}

/// The summary endpoint has answered both with an object and with a
/// one-element array; `null` or `[]` mean "nothing this month".
pub fn normalize_summary(raw: Value) -> Result<TransactionSummary, GatewayError> {
    let value = match raw {
        Value::Null => return Ok(TransactionSummary::empty()),
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => first,
            None => return Ok(TransactionSummary::empty()),
        },
        other => other,
    };
    serde_json::from_value(value).map_err(|e| GatewayError::Decode(format!("summary: {e}")))
}

/// `{ "history": [...] }` where items may carry `month` instead of `name`
/// and may omit amounts.
pub fn normalize_history(raw: &Value) -> Vec<MonthlyItem> {
    let Some(items) = raw.get("history").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let name = item
                .get("name")
                .or_else(|| item.get("month"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            MonthlyItem {
                name,
                income: amount_or_zero(item.get("income")),
                expense: amount_or_zero(item.get("expense")),
            }
        })
        .collect()
}

fn amount_or_zero(v: Option<&Value>) -> Decimal {
    v.and_then(Value::as_f64)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}
