//! Hosted store backend
//!
//! Talks to a PostgREST-compatible endpoint (`{store_url}/rest/v1/{table}`),
//! authenticating every request with the configured access key.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Filter, Row, SelectQuery, Store, Table};
use crate::{Error, Result};

const REST_PATH: &str = "rest/v1";
const USER_AGENT: &str = concat!("nicheboard/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Persistence gateway over a hosted PostgREST-compatible store
#[derive(Debug, Clone)]
pub struct RestStore {
    http_client: reqwest::Client,
    base_url: String,
}

impl RestStore {
    pub fn new(store_url: &str, access_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(access_key)
            .map_err(|_| Error::Config("Access key contains invalid characters".to_string()))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", access_key))
            .map_err(|_| Error::Config("Access key contains invalid characters".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: store_url.trim().trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table.name())
    }

    async fn fetch_rows(&self, table: Table, params: &[(String, String)]) -> Result<Vec<Row>> {
        let response = self
            .http_client
            .get(self.table_url(table))
            .query(params)
            .send()
            .await?;

        let rows: Vec<Row> = checked(response).await?.json().await?;
        Ok(rows)
    }
}

#[async_trait]
impl Store for RestStore {
    fn backend(&self) -> &'static str {
        "rest"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>> {
        let rows = self.fetch_rows(table, &select_params(query)).await?;
        debug!(table = table.name(), rows = rows.len(), "select");
        Ok(rows)
    }

    async fn fetch_by_id(&self, table: Table, id: &str) -> Result<Option<Row>> {
        let query = SelectQuery::new().filter("id", id);
        let rows = self.fetch_rows(table, &select_params(&query)).await?;
        Ok(rows.into_iter().next())
    }

    async fn count(&self, table: Table, filters: &[Filter]) -> Result<i64> {
        let response = self
            .http_client
            .head(self.table_url(table))
            .header("Prefer", "count=exact")
            .query(&filter_params(filters))
            .send()
            .await?;

        let response = checked(response).await?;
        let header = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::Store(format!("No Content-Range in {} count", table.name())))?;

        parse_content_range_total(header).ok_or_else(|| {
            Error::Store(format!(
                "Malformed Content-Range '{}' in {} count",
                header,
                table.name()
            ))
        })
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row> {
        let response = self
            .http_client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&Value::Object(row))
            .send()
            .await?;

        let rows: Vec<Row> = checked(response).await?.json().await?;
        debug!(table = table.name(), "insert");

        rows.into_iter().next().ok_or_else(|| {
            Error::Store(format!("Store returned no row for {} insert", table.label()))
        })
    }

    async fn update(&self, table: Table, id: &str, mut row: Row) -> Result<Row> {
        row.remove("id");

        let response = self
            .http_client
            .patch(self.table_url(table))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .json(&Value::Object(row))
            .send()
            .await?;

        let rows: Vec<Row> = checked(response).await?.json().await?;
        debug!(table = table.name(), id = %id, "update");

        rows.into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("{} {}", table.label(), id)))
    }

    async fn delete(&self, table: Table, id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        checked(response).await?;
        debug!(table = table.name(), id = %id, "delete");
        Ok(())
    }
}

/// Turn a non-success status into `Error::Store` carrying the response body
async fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Store(describe_failure(status, &body)))
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {}", status.as_u16(), message)
    }
}

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.to_string(), format!("eq.{}", f.value)))
        .collect()
}

fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(filter_params(&query.filters));

    if let Some(order) = query.order {
        let direction = if order.descending { "desc" } else { "asc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }

    params
}

/// Total from a `Content-Range` header: `0-24/3573` or `*/0`
fn parse_content_range_total(header: &str) -> Option<i64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}
