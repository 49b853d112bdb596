use serde::Deserialize;

const COMPLETED: &str = "completed";
const SUCCEEDED: &str = "succeeded";

/// The parts of a `git.pullrequest.updated` service hook that drive a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub repository_id: String,
    pub pull_request_id: u64,
    pub status: Option<String>,
    pub merge_status: Option<String>,
}

#[derive(Deserialize)]
struct Payload {
    resource: Resource,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Resource {
    repository: Repository,
    pull_request_id: u64,
    status: Option<String>,
    merge_status: Option<String>,
}

#[derive(Deserialize)]
struct Repository {
    id: String,
}

impl PullRequestEvent {
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        let payload: Payload = serde_json::from_slice(body)?;
        let resource = payload.resource;
        Ok(Self {
            repository_id: resource.repository.id,
            pull_request_id: resource.pull_request_id,
            status: resource.status,
            merge_status: resource.merge_status,
        })
    }

    /// Only completed pull requests whose merge succeeded are acted on.
    pub fn is_merged_and_completed(&self) -> bool {
        self.status.as_deref() == Some(COMPLETED)
            && self.merge_status.as_deref() == Some(SUCCEEDED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(status: &str, merge_status: &str) -> String {
        format!(
            r#"{{
              "eventType": "git.pullrequest.updated",
              "resource": {{
                "repository": {{ "id": "R1", "name": "web" }},
                "pullRequestId": 42,
                "status": "{status}",
                "mergeStatus": "{merge_status}"
              }}
            }}"#
        )
    }

    #[test]
    fn parses_service_hook_payload() {
        let event = PullRequestEvent::parse(payload("completed", "succeeded").as_bytes()).unwrap();
        assert_eq!(event.repository_id, "R1");
        assert_eq!(event.pull_request_id, 42);
        assert!(event.is_merged_and_completed());
    }

    #[test]
    fn active_merge_is_not_actionable() {
        let event = PullRequestEvent::parse(payload("completed", "active").as_bytes()).unwrap();
        assert!(!event.is_merged_and_completed());
    }

    #[test]
    fn abandoned_pull_request_is_not_actionable() {
        let event = PullRequestEvent::parse(payload("abandoned", "succeeded").as_bytes()).unwrap();
        assert!(!event.is_merged_and_completed());
    }

    #[test]
    fn missing_merge_status_is_not_actionable() {
        let body = r#"{"resource":{"repository":{"id":"R1"},"pullRequestId":7,"status":"completed"}}"#;
        let event = PullRequestEvent::parse(body.as_bytes()).unwrap();
        assert_eq!(event.merge_status, None);
        assert!(!event.is_merged_and_completed());
    }

    #[test]
    fn status_comparison_is_case_sensitive() {
        let event = PullRequestEvent::parse(payload("Completed", "Succeeded").as_bytes()).unwrap();
        assert!(!event.is_merged_and_completed());
    }

    #[test]
    fn missing_repository_is_malformed() {
        let body = r#"{"resource":{"pullRequestId":7,"status":"completed","mergeStatus":"succeeded"}}"#;
        assert!(PullRequestEvent::parse(body.as_bytes()).is_err());
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(PullRequestEvent::parse(b"not json").is_err());
    }
}
