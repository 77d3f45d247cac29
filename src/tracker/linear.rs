//! Linear GraphQL client.

use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{IssueTracker, TrackerError};
use crate::data::IssueRecord;
use crate::http::{build_http_client, error_text};

/// Linear's public GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.linear.app/graphql";

const ISSUE_QUERY: &str = "query ReleaseNotesIssue($id: String!) {
  issue(id: $id) {
    identifier
    title
    url
    description
    labels { nodes { name } }
  }
}";

/// GraphQL request body.
#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

/// GraphQL response envelope.
#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct IssueData {
    issue: Option<RawIssue>,
}

/// Issue exactly as Linear returns it.
#[derive(Deserialize)]
struct RawIssue {
    identifier: Option<String>,
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    labels: Option<LabelConnection>,
}

#[derive(Deserialize)]
struct LabelConnection {
    #[serde(default)]
    nodes: Vec<LabelNode>,
}

#[derive(Deserialize)]
struct LabelNode {
    name: String,
}

impl RawIssue {
    /// Validates the payload and maps it onto an [`IssueRecord`].
    fn into_record(self) -> Result<IssueRecord, TrackerError> {
        let identifier = self
            .identifier
            .filter(|id| !id.is_empty())
            .ok_or_else(|| TrackerError::InvalidResponseFormat("issue has no identifier".into()))?;
        let url = self.url.filter(|url| !url.is_empty()).ok_or_else(|| {
            TrackerError::InvalidResponseFormat(format!("issue {identifier} has no URL"))
        })?;

        Ok(IssueRecord {
            title: self.title.unwrap_or_default(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            labels: self
                .labels
                .map(|connection| connection.nodes.into_iter().map(|n| n.name).collect())
                .unwrap_or_default(),
            identifier,
            url,
        })
    }
}

/// Linear API client.
pub struct LinearClient {
    /// HTTP client for API requests.
    client: Client,
    /// Personal API key, sent verbatim in the `Authorization` header.
    api_key: String,
    /// GraphQL endpoint.
    api_url: String,
}

impl LinearClient {
    /// Creates a new Linear client.
    pub fn new(api_key: String, api_url: String) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            api_key,
            api_url,
        })
    }

    /// Fetches one issue by its identifier.
    pub async fn issue(&self, identifier: &str) -> Result<IssueRecord> {
        debug!(identifier, api_url = %self.api_url, "Querying Linear issue");

        let request = GraphqlRequest {
            query: ISSUE_QUERY,
            variables: json!({ "id": identifier }),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TrackerError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = error_text(response).await;
            return Err(TrackerError::ApiRequestFailed(format!("HTTP {status}: {body}")).into());
        }

        let envelope: GraphqlResponse<IssueData> = response
            .json()
            .await
            .map_err(|e| TrackerError::InvalidResponseFormat(e.to_string()))?;

        if !envelope.errors.is_empty() {
            let messages: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(TrackerError::QueryFailed(messages.join("; ")).into());
        }

        let raw = envelope
            .data
            .and_then(|data| data.issue)
            .ok_or_else(|| TrackerError::IssueNotFound(identifier.to_string()))?;

        let record = raw.into_record()?;
        debug!(
            identifier = %record.identifier,
            labels = record.labels.len(),
            has_description = record.description.is_some(),
            "Received Linear issue"
        );

        Ok(record)
    }
}

impl IssueTracker for LinearClient {
    fn fetch_issue<'a>(
        &'a self,
        identifier: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IssueRecord>> + Send + 'a>> {
        Box::pin(self.issue(identifier))
    }
}
