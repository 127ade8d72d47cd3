//! REST client for a PostgREST-style table service (Supabase)
//!
//! Tables are addressed as `{base_url}/rest/v1/{table}` with filters and
//! ordering passed as query parameters.

use axum::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{PumpCommand, ResolvedWindow, SensorReading};

use super::{ReadingStore, StoreAck};
use crate::error::{AppError, AppResult};

/// Columns selected for every reading query
const READING_COLUMNS: &str = "created_at,temperature,soil_moisture,soil_ph";

/// Reading store backed by a REST table service
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    /// Create a new RestStore for a project URL
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| AppError::StoreUnavailable(format!("Store request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::StoreUnavailable(format!(
                "Store error: {} - {}",
                status, body
            )));
        }

        Ok(response)
    }

    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<Vec<T>> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to parse store response: {}", e))
            })
    }
}

fn timestamp_param(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl ReadingStore for RestStore {
    async fn query_latest(&self, table: &str) -> AppResult<Option<SensorReading>> {
        let request = self.client.get(self.table_url(table)).query(&[
            ("select", READING_COLUMNS),
            ("order", "created_at.desc"),
            ("limit", "1"),
        ]);

        let rows: Vec<SensorReading> = self.rows(request).await?;
        Ok(rows.into_iter().next())
    }

    async fn query_range(
        &self,
        table: &str,
        window: &ResolvedWindow,
    ) -> AppResult<Vec<SensorReading>> {
        let from = format!("gte.{}", timestamp_param(&window.from));
        let to = format!("lte.{}", timestamp_param(&window.to));
        let request = self.client.get(self.table_url(table)).query(&[
            ("select", READING_COLUMNS),
            ("created_at", from.as_str()),
            ("created_at", to.as_str()),
            ("order", "created_at.asc"),
        ]);

        self.rows(request).await
    }

    async fn insert_command(&self, table: &str, command: &PumpCommand) -> AppResult<StoreAck> {
        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(command);

        let rows: Vec<serde_json::Value> = self.rows(request).await?;
        if rows.is_empty() {
            return Err(AppError::StoreUnavailable(
                "Store acknowledged the insert without returning a row".to_string(),
            ));
        }

        Ok(StoreAck {
            inserted: rows.len(),
        })
    }
}
