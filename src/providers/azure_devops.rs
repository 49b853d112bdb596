use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::Provider;
use crate::model::patch::TransitionRequest;
use crate::model::work_item::WorkItem;

const READ_API_VERSION: &str = "5.0";
const WRITE_API_VERSION: &str = "5.1";
const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

const TITLE_FIELD: &str = "System.Title";
const BOARD_COLUMN_FIELD: &str = "System.BoardColumn";
const BOARD_COLUMN_DONE_FIELD: &str = "System.BoardColumnDone";

pub struct AzureDevOpsProvider {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl AzureDevOpsProvider {
    /// `base_url` is the organization root, e.g. `https://dev.azure.com/contoso`.
    pub fn new(base_url: String, personal_access_token: &str) -> Self {
        // PATs go in the password slot; the user name is left empty.
        let creds = format!(":{personal_access_token}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        Self {
            base_url,
            auth_header: format!("Basic {encoded}"),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/_apis/{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Azure DevOps request to {url} failed"))?;

        let resp = ensure_success(resp).await?;
        resp.json()
            .await
            .with_context(|| format!("Failed to parse Azure DevOps response from {url}"))
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    bail!("Azure DevOps API returned {status}: {body}")
}

#[derive(Deserialize)]
struct ListResponse<T> {
    #[serde(default)]
    value: Vec<T>,
}

#[derive(Deserialize, Default)]
struct ResourceRef {
    id: Value,
}

#[derive(Deserialize)]
struct RawWorkItem {
    id: u64,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl ResourceRef {
    // The pull request work item links carry ids as strings.
    fn work_item_id(&self) -> Result<u64> {
        let id = match &self.id {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        };
        id.with_context(|| format!("Unexpected work item id {}", self.id))
    }
}

impl From<RawWorkItem> for WorkItem {
    fn from(raw: RawWorkItem) -> Self {
        WorkItem {
            id: raw.id,
            title: raw
                .fields
                .get(TITLE_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            board_column: raw
                .fields
                .get(BOARD_COLUMN_FIELD)
                .and_then(Value::as_str)
                .map(String::from),
            board_column_done: raw.fields.get(BOARD_COLUMN_DONE_FIELD).and_then(flag_text),
        }
    }
}

/// Boolean fields come back as JSON booleans; normalise them to "True"/"False".
fn flag_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some("True".into()),
        Value::Bool(false) => Some("False".into()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

#[async_trait]
impl Provider for AzureDevOpsProvider {
    fn name(&self) -> &str {
        "Azure DevOps"
    }

    async fn linked_work_item_ids(
        &self,
        repository_id: &str,
        pull_request_id: u64,
    ) -> Result<Vec<u64>> {
        let url = self.api_url(&format!(
            "git/repositories/{}/pullRequests/{pull_request_id}/workitems",
            urlencoding::encode(repository_id)
        ));
        let links: ListResponse<ResourceRef> = self.get_json(&url, &[]).await?;
        links.value.iter().map(ResourceRef::work_item_id).collect()
    }

    async fn fetch_work_item(&self, id: u64) -> Result<WorkItem> {
        let url = self.api_url(&format!("wit/workitems/{id}"));
        let raw: RawWorkItem = self
            .get_json(&url, &[("api-version", READ_API_VERSION)])
            .await?;
        Ok(raw.into())
    }

    async fn move_to_done(&self, request: &TransitionRequest) -> Result<()> {
        let url = self.api_url(&format!("wit/workitems/{}", request.work_item_id));
        let body = serde_json::to_vec(&request.patch_document())
            .context("Failed to encode work item patch")?;

        let resp = self
            .client
            .patch(&url)
            .query(&[("api-version", WRITE_API_VERSION)])
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .header("Content-Type", JSON_PATCH_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to patch work item {}", request.work_item_id))?;

        ensure_success(resp).await?;
        Ok(())
    }
}
