//! HTTP client for the word API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use study_core::error::FetchError;
use study_core::source::WordSource;
use study_core::types::{Unit, WordItem};

// === API Response Types ===

#[derive(Debug, Deserialize)]
struct UnitMastersResponse {
    unit_masters: Vec<ApiUnit>,
}

#[derive(Debug, Deserialize)]
struct ApiUnit {
    id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct WordMastersResponse {
    word_masters: Vec<ApiWord>,
}

#[derive(Debug, Deserialize)]
struct ApiWord {
    id: i64,
    japanese: String,
    #[serde(default)]
    furigana: String,
    #[serde(default)]
    vietnamese: String,
}

impl From<ApiWord> for WordItem {
    fn from(w: ApiWord) -> Self {
        Self {
            id: w.id,
            text: w.japanese,
            reading: w.furigana,
            translation: w.vietnamese,
        }
    }
}

impl From<ApiUnit> for Unit {
    fn from(u: ApiUnit) -> Self {
        Self {
            id: u.id,
            title: u.title,
        }
    }
}

/// Word source backed by the remote API.
#[derive(Clone)]
pub struct HttpWordSource {
    client: Client,
    base_url: String,
}

impl HttpWordSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List the units available to study.
    pub async fn fetch_units(&self, auth_token: &str) -> Result<Vec<Unit>, FetchError> {
        let url = format!("{}/api/unit_masters", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(auth_token)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let response: UnitMastersResponse = parse_response(resp).await?;
        Ok(response.unit_masters.into_iter().map(Unit::from).collect())
    }
}

#[async_trait]
impl WordSource for HttpWordSource {
    async fn fetch(&self, auth_token: &str, unit_id: i64) -> Result<Vec<WordItem>, FetchError> {
        let url = format!("{}/api/word_masters", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(auth_token)
            .query(&[("unit_master_id", unit_id)])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let response: WordMastersResponse = parse_response(resp).await?;
        Ok(response.word_masters.into_iter().map(WordItem::from).collect())
    }
}

async fn parse_response<T: DeserializeOwned>(resp: Response) -> Result<T, FetchError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(FetchError::Unauthorized);
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(FetchError::Backend {
            status: status.as_u16(),
            message,
        });
    }

    let body = resp
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    decode(&body)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))
}
