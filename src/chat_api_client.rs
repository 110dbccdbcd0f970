use std::env;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{eyre, Result};
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use crate::error::ApiError;

const SERVICE: &str = "badgerchat";
const DEFAULT_BADGER_API_URL: &str = "https://cs571api.cs.wisc.edu/rest/s25/hw10/";
const IDENTITY_HEADER: &str = "X-CS571-ID";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A post in a chatroom, as returned by the message-listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub chatroom: String,
}

/// Normalized backend outcome: either rows in backend order, or nothing.
///
/// A null body, a missing field, and a zero-length list all collapse to
/// `Empty`, so callers only distinguish "rows" from "no rows".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Rows(Vec<T>),
    Empty,
}

impl<T> Fetched<T> {
    fn from_rows(rows: Option<Vec<T>>) -> Self {
        match rows {
            Some(rows) if !rows.is_empty() => Fetched::Rows(rows),
            _ => Fetched::Empty,
        }
    }
}

/// Read-only queries against the chatroom/message backend.
#[async_trait]
pub trait ChatApi {
    async fn list_chatrooms(&self) -> Result<Fetched<String>, ApiError>;
    async fn list_messages(
        &self,
        chat_room: &str,
        num_posts: u32,
    ) -> Result<Fetched<Post>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Option<Vec<Post>>,
}

pub struct BadgerApiClient {
    badger_id: String,
    chatrooms_url: Url,
    messages_url: Url,
    client: reqwest::Client,
}

impl BadgerApiClient {
    pub fn new() -> Result<Self> {
        let badger_id =
            env::var("BADGER_ID").map_err(|_| eyre!("BADGER_ID environment variable not set"))?;

        let mut base =
            env::var("BADGER_API_URL").unwrap_or_else(|_| DEFAULT_BADGER_API_URL.to_string());
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)?;
        let chatrooms_url = base.join("chatrooms")?;
        let messages_url = base.join("messages")?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            badger_id,
            chatrooms_url,
            messages_url,
            client,
        })
    }

    async fn get(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .header(IDENTITY_HEADER, &self.badger_id)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                service: SERVICE,
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("badgerchat request failed with status {}: {}", status, body);
            return Err(ApiError::Status {
                service: SERVICE,
                status,
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatApi for BadgerApiClient {
    async fn list_chatrooms(&self) -> Result<Fetched<String>, ApiError> {
        debug!("Fetching chatroom list");

        let response = self.get(self.client.get(self.chatrooms_url.clone())).await?;
        let rooms: Option<Vec<String>> =
            response.json().await.map_err(|e| ApiError::Malformed {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        Ok(Fetched::from_rows(rooms))
    }

    async fn list_messages(
        &self,
        chat_room: &str,
        num_posts: u32,
    ) -> Result<Fetched<Post>, ApiError> {
        debug!(
            "Fetching up to {} posts from chatroom '{}'",
            num_posts, chat_room
        );

        let request = self.client.get(self.messages_url.clone()).query(&[
            ("chatroom", chat_room.to_string()),
            ("num", num_posts.to_string()),
        ]);
        let response = self.get(request).await?;
        let payload: MessagesResponse =
            response.json().await.map_err(|e| ApiError::Malformed {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        Ok(Fetched::from_rows(payload.messages))
    }
}
