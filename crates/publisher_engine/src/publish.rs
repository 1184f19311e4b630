use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{PublishError, PublishFailure, PublishStatus};

/// Production endpoint of the publish API.
pub const MEDIUM_API_BASE: &str = "https://api.medium.com/v1";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// One post ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub publish_status: PublishStatus,
    pub notify_followers: bool,
}

#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Submit one post. Single attempt, no retry; returns the
    /// remote-assigned post id.
    async fn publish(&self, submission: &Submission) -> Result<String, PublishError>;
}

/// Authenticated account details, as reported by the user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub name: String,
    pub url: String,
}

#[derive(Deserialize)]
struct UserInfoEnvelope {
    data: UserInfo,
}

#[derive(Debug, Clone)]
pub struct MediumClient {
    base_url: String,
    access_token: String,
    author_id: String,
    settings: ClientSettings,
}

impl MediumClient {
    pub fn new(
        base_url: &str,
        access_token: &str,
        author_id: &str,
        settings: ClientSettings,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            author_id: author_id.to_string(),
            settings,
        }
    }

    fn build_client(&self) -> Result<reqwest::Client, PublishError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| PublishError::new(PublishFailure::Network, err.to_string()))
    }

    /// Fetch the authenticated account's details from `GET /me`.
    ///
    /// Not part of the publishing path; used to discover configuration
    /// values such as the author id.
    pub async fn user_info(&self) -> Result<UserInfo, PublishError> {
        let url = parse_endpoint(&format!("{}/me", self.base_url))?;
        let client = self.build_client()?;

        let response = client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::new(
                PublishFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let envelope: UserInfoEnvelope = response
            .json()
            .await
            .map_err(|err| PublishError::new(PublishFailure::InvalidResponse, err.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl Publisher for MediumClient {
    async fn publish(&self, submission: &Submission) -> Result<String, PublishError> {
        let url = parse_endpoint(&format!(
            "{}/users/{}/posts",
            self.base_url, self.author_id
        ))?;
        let body = json!({
            "title": submission.title,
            "contentFormat": "markdown",
            "content": submission.content,
            "tags": submission.tags,
            "publishStatus": submission.publish_status.as_str(),
            "notifyFollowers": submission.notify_followers,
        });

        let client = self.build_client()?;
        let response = client
            .post(url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::new(
                PublishFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| PublishError::new(PublishFailure::InvalidResponse, err.to_string()))?;
        payload
            .get("data")
            .and_then(|data| data.get("id"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                PublishError::new(PublishFailure::InvalidResponse, "response missing data.id")
            })
    }
}

fn parse_endpoint(raw: &str) -> Result<reqwest::Url, PublishError> {
    reqwest::Url::parse(raw)
        .map_err(|err| PublishError::new(PublishFailure::InvalidUrl, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> PublishError {
    if err.is_timeout() {
        return PublishError::new(PublishFailure::Timeout, err.to_string());
    }
    PublishError::new(PublishFailure::Network, err.to_string())
}
