use anyhow::Result;
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::StoreError;
use crate::store::{Collection, Filter, RecordStore, StoreResult};

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.store_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        })
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.anon_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         body: Option<Value>, extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                409 => anyhow::Error::new(StoreError::Constraint(error_text)),
                code => anyhow::Error::new(StoreError::Status { status: code, body: error_text }),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

/// Renders a filter as a PostgREST query string, e.g.
/// `?doctor_id=eq.<uuid>&start_time=lt.<ts>&order=start_time.asc`.
pub fn to_query_string(filter: &Filter) -> String {
    let mut parts: Vec<String> = filter
        .conditions()
        .iter()
        .map(|condition| {
            let raw = match &condition.value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "{}={}.{}",
                condition.field,
                condition.op.keyword(),
                urlencoding::encode(&raw)
            )
        })
        .collect();

    if let Some(field) = filter.sort_field() {
        parts.push(format!("order={}.asc", field));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}

fn into_store_error(err: anyhow::Error) -> StoreError {
    let err = match err.downcast::<StoreError>() {
        Ok(store_error) => return store_error,
        Err(err) => err,
    };

    match err.downcast_ref::<reqwest::Error>() {
        Some(e) if e.is_timeout() => StoreError::Timeout,
        Some(e) if e.is_decode() => StoreError::Request(format!("malformed store response: {}", e)),
        _ => StoreError::Request(err.to_string()),
    }
}

fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

/// Record store backed by a Supabase (PostgREST) database.
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            supabase: SupabaseClient::new(config)?,
        })
    }

    fn table_path(collection: Collection) -> String {
        format!("/rest/v1/{}", collection.table_name())
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn insert(&self, collection: Collection, record: Value) -> StoreResult<Value> {
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            &Self::table_path(collection),
            Some(record),
            Some(return_representation()),
        ).await.map_err(into_store_error)?;

        result.into_iter().next()
            .ok_or_else(|| StoreError::Request(format!("insert into {} returned no record", collection)))
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Value>> {
        let path = format!("{}?id=eq.{}", Self::table_path(collection), id);
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            None,
        ).await.map_err(into_store_error)?;

        Ok(result.into_iter().next())
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Value>> {
        let path = format!("{}{}", Self::table_path(collection), to_query_string(filter));
        self.supabase.request(
            Method::GET,
            &path,
            None,
        ).await.map_err(into_store_error)
    }

    async fn update(&self, collection: Collection, id: Uuid, patch: Value) -> StoreResult<Option<Value>> {
        let path = format!("{}?id=eq.{}", Self::table_path(collection), id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(patch),
            Some(return_representation()),
        ).await.map_err(into_store_error)?;

        Ok(result.into_iter().next())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<bool> {
        let path = format!("{}?id=eq.{}", Self::table_path(collection), id);
        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            None,
            Some(return_representation()),
        ).await.map_err(into_store_error)?;

        Ok(!result.is_empty())
    }
}
