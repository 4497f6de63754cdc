//! Wire types and the client for the scoring server.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub quiz_file: String,
    pub question_id: String,
    pub answer: String,
}

/// Body of a successful save. Any 2xx counts as saved, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub saved_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitRequest {
    pub quiz_file: String,
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub results: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionResult {
    #[serde(default)]
    pub id: Option<String>,
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_answer: Option<String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Choice,
    #[serde(other)]
    Open,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub quizzes: Vec<CatalogSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogSection {
    pub phase: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogItem {
    pub file: String,
    pub title: String,
    #[serde(default)]
    pub count: Option<u32>,
}

#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn save_answer(&self, request: &SaveRequest) -> Result<SaveReceipt, BackendError>;

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError>;

    /// Answers the server already holds for `quiz_file`.
    async fn saved_answers(&self, quiz_file: &str) -> Result<HashMap<String, String>, BackendError>;

    async fn catalog(&self) -> Result<Catalog, BackendError>;
}

/// Upper bound for one request, so a stalled server ends as a failure the
/// user can retry from.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Page the browser client would navigate to for the quiz listing.
    pub fn quiz_list_url(&self) -> String {
        self.url("/quizzes")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl QuizBackend for HttpBackend {
    async fn save_answer(&self, request: &SaveRequest) -> Result<SaveReceipt, BackendError> {
        let response = self
            .client
            .post(self.url("/api/save"))
            .json(request)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, BackendError> {
        let response = self
            .client
            .post(self.url("/api/submit"))
            .json(request)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn saved_answers(&self, quiz_file: &str) -> Result<HashMap<String, String>, BackendError> {
        let url = self.url(&format!("/api/answers/{}", quiz_file.trim_start_matches('/')));
        let response = self.client.get(url).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn catalog(&self) -> Result<Catalog, BackendError> {
        let response = self.client.get(self.url("/api/navigation")).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
