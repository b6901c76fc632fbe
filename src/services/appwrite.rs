use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite database query builders (JSON query syntax)
pub struct Query;

impl Query {
    pub fn equal(attribute: &str, value: impl Into<Value>) -> String {
        json!({ "method": "equal", "attribute": attribute, "values": [value.into()] }).to_string()
    }

    pub fn not_equal(attribute: &str, value: impl Into<Value>) -> String {
        json!({ "method": "notEqual", "attribute": attribute, "values": [value.into()] }).to_string()
    }

    pub fn order_desc(attribute: &str) -> String {
        json!({ "method": "orderDesc", "attribute": attribute }).to_string()
    }

    pub fn limit(limit: usize) -> String {
        json!({ "method": "limit", "values": [limit] }).to_string()
    }

    pub fn offset(offset: usize) -> String {
        json!({ "method": "offset", "values": [offset] }).to_string()
    }
}

/// A page of documents
#[derive(Debug, Clone)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<T>,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub profiles: String,
}

/// Appwrite database client
///
/// Thin document-store wrapper: get, list-by-query, create, update and
/// delete. Documents are decoded leniently; Appwrite system fields (`$id`,
/// `$createdAt`, ...) are ignored by the target types.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        }
    }

    pub fn collections(&self) -> &AppwriteCollections {
        &self.collections
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    /// Map non-success statuses onto error variants
    async fn check(response: Response, what: &str) -> Result<Response, AppwriteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Appwrite {} failed: {} - {}", what, status, body);

        Err(match status {
            StatusCode::NOT_FOUND => AppwriteError::NotFound(what.to_string()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppwriteError::Unauthorized,
            StatusCode::CONFLICT => AppwriteError::Conflict(what.to_string()),
            _ => AppwriteError::ApiError(format!("Failed to {}: {}", what, status)),
        })
    }

    fn decode<T: DeserializeOwned>(doc: &Value, what: &str) -> Result<T, AppwriteError> {
        let data = doc.get("data").unwrap_or(doc);
        serde_json::from_value(data.clone())
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    /// Fetch a single document by id
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<T, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(collection), urlencoding::encode(document_id));

        tracing::debug!("Fetching document {} from {}", document_id, collection);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, &format!("get document {}", document_id)).await?;
        let json: Value = response.json().await?;

        Self::decode(&json, "document")
    }

    /// List documents matching the given queries
    ///
    /// Documents that fail to decode are skipped.
    pub async fn list_documents<T: DeserializeOwned>(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<DocumentList<T>, AppwriteError> {
        let mut url = self.documents_url(collection);
        if !queries.is_empty() {
            let params = queries
                .iter()
                .map(|q| format!("queries[]={}", urlencoding::encode(q)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{}?{}", url, params);
        }

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check(response, "list documents").await?;
        let json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

        let decoded: Vec<T> = documents
            .iter()
            .filter_map(|doc| match Self::decode(doc, "document") {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Skipping undecodable document in {}: {}", collection, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Listed {} documents from {} (total: {})", decoded.len(), collection, total);

        Ok(DocumentList {
            total,
            documents: decoded,
        })
    }

    /// Create a document with an explicit id
    pub async fn create_document<D: Serialize, T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
        data: &D,
    ) -> Result<T, AppwriteError> {
        let payload = json!({
            "documentId": document_id,
            "data": serde_json::to_value(data)
                .map_err(|e| AppwriteError::InvalidResponse(e.to_string()))?,
        });

        let response = self
            .authorized(self.client.post(self.documents_url(collection)))
            .json(&payload)
            .send()
            .await?;
        let response = Self::check(response, &format!("create document {}", document_id)).await?;
        let json: Value = response.json().await?;

        tracing::debug!("Created document {} in {}", document_id, collection);

        Self::decode(&json, "document")
    }

    /// Partially update a document
    pub async fn update_document<D: Serialize, T: DeserializeOwned>(
        &self,
        collection: &str,
        document_id: &str,
        data: &D,
    ) -> Result<T, AppwriteError> {
        let url = format!("{}/{}", self.documents_url(collection), urlencoding::encode(document_id));
        let payload = json!({
            "data": serde_json::to_value(data)
                .map_err(|e| AppwriteError::InvalidResponse(e.to_string()))?,
        });

        let response = self
            .authorized(self.client.patch(&url))
            .json(&payload)
            .send()
            .await?;
        let response = Self::check(response, &format!("update document {}", document_id)).await?;
        let json: Value = response.json().await?;

        Self::decode(&json, "document")
    }

    /// Delete a document
    pub async fn delete_document(&self, collection: &str, document_id: &str) -> Result<(), AppwriteError> {
        let url = format!("{}/{}", self.documents_url(collection), urlencoding::encode(document_id));

        let response = self.authorized(self.client.delete(&url)).send().await?;
        Self::check(response, &format!("delete document {}", document_id)).await?;

        tracing::debug!("Deleted document {} from {}", document_id, collection);
        Ok(())
    }
}
