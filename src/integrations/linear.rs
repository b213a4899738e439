//! Linear work source.
//!
//! Work bucket URIs look like:
//! - `team/<teamName>/cycle/<cycleName>`
//! - `team/<teamName>/project/<projectName>[/milestone/<milestoneName>]`
//!
//! Issues are fetched through the GraphQL API, 100 per page.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{check_status, WorkSource};
use crate::employee::Employee;
use crate::error::{Error, Result};
use crate::task::{Task, WorkBucket};

pub const DEFAULT_ENDPOINT: &str = "https://api.linear.app/graphql";
const PAGE_SIZE: u32 = 100;
const SERVICE: &str = "Linear";

static WORK_BUCKET_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^team/(?P<team>[^/]+)(?:/cycle/(?P<cycle>[^/]+))?(?:/project/(?P<project>[^/]+)(?:/milestone/(?P<milestone>[^/]+))?)?$",
    )
    .expect("work bucket URI pattern is valid")
});

const ISSUES_QUERY: &str = r#"
query Issues($filter: IssueFilter, $first: Int, $after: String) {
  issues(filter: $filter, first: $first, after: $after) {
    nodes {
      id
      title
      estimate
      createdAt
      startedAt
      completedAt
      assignee { id name email }
    }
    pageInfo { hasNextPage endCursor }
  }
}
"#;

/// What a work bucket URI selects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkBucketFilter {
    pub team_name: String,
    pub cycle_name: Option<String>,
    pub project_name: Option<String>,
    pub project_milestone_name: Option<String>,
    pub started_from: Option<DateTime<Utc>>,
    pub completed_to: Option<DateTime<Utc>>,
}

impl WorkBucketFilter {
    pub fn parse(work_bucket_uri: &str) -> Result<Self> {
        let caps = WORK_BUCKET_URI
            .captures(work_bucket_uri.trim())
            .ok_or_else(|| Error::invalid_input("Invalid 'workBucketURI' provided"))?;
        let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

        Ok(WorkBucketFilter {
            team_name: group("team").unwrap_or_default(),
            cycle_name: group("cycle"),
            project_name: group("project"),
            project_milestone_name: group("milestone"),
            started_from: None,
            completed_to: None,
        })
    }

    /// Linear `IssueFilter` input object.
    pub fn to_issue_filter(&self) -> Value {
        let mut filter = json!({
            "team": { "name": { "eqIgnoreCase": self.team_name } }
        });

        if let Some(project) = &self.project_name {
            filter["project"] = json!({ "name": { "eq": project } });
            if let Some(milestone) = &self.project_milestone_name {
                filter["projectMilestone"] = json!({ "name": { "eq": milestone } });
            }
        }
        if let Some(cycle) = &self.cycle_name {
            filter["cycle"] = json!({ "name": { "eq": cycle } });
        }
        if let Some(from) = self.started_from {
            filter["startedAt"] = json!({ "gte": from.to_rfc3339() });
        }
        if let Some(to) = self.completed_to {
            filter["completedAt"] = json!({ "lte": to.to_rfc3339() });
        }
        filter
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct IssuesData {
    issues: Connection<IssueNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    nodes: Vec<T>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    id: String,
    title: String,
    estimate: Option<f64>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    assignee: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    id: String,
    name: Option<String>,
    #[serde(default)]
    email: String,
}

impl From<IssueNode> for Task {
    fn from(node: IssueNode) -> Self {
        Task {
            id: node.id,
            title: node.title,
            estimation: node.estimate,
            created_at: node.created_at,
            started_at: node.started_at,
            done_at: node.completed_at,
            assigned_to: node.assignee.map(|u| Employee {
                name: u.name,
                ..Employee::new(u.id, u.email)
            }),
        }
    }
}

pub struct Linear {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl Linear {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Linear {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    async fn issues_page(&self, filter: &Value, after: Option<&str>) -> Result<Connection<IssueNode>> {
        let body = json!({
            "query": ISSUES_QUERY,
            "variables": { "filter": filter, "first": PAGE_SIZE, "after": after },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        let payload: GraphQlResponse<IssuesData> = response.json().await?;

        if !payload.errors.is_empty() {
            let messages: Vec<_> = payload.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::UnexpectedResponse {
                service: SERVICE,
                message: messages.join("; "),
            });
        }
        payload.data.map(|d| d.issues).ok_or_else(|| Error::UnexpectedResponse {
            service: SERVICE,
            message: "response carries neither data nor errors".into(),
        })
    }
}

#[async_trait]
impl WorkSource for Linear {
    async fn get_work_bucket(
        &self,
        work_bucket_uri: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<WorkBucket> {
        if work_bucket_uri.trim().is_empty() {
            return Err(Error::invalid_input("Argument 'workBucketURI' is mandatory"));
        }

        let mut filter = WorkBucketFilter::parse(work_bucket_uri)?;
        filter.started_from = start;
        filter.completed_to = end;
        let issue_filter = filter.to_issue_filter();

        let mut bucket = WorkBucket {
            id: uuid::Uuid::new_v4().to_string(),
            name: work_bucket_uri.to_string(),
            tasks: Vec::new(),
        };

        let mut cursor: Option<String> = None;
        let mut pages = 0;
        loop {
            let page = self.issues_page(&issue_filter, cursor.as_deref()).await?;
            pages += 1;
            bucket.tasks.extend(page.nodes.into_iter().map(Task::from));

            match (page.page_info.has_next_page, page.page_info.end_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!(tasks = bucket.tasks.len(), pages, "fetched Linear issues");
        Ok(bucket)
    }
}
