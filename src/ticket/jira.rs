use log::debug;
use serde_json::Value;

use crate::error::TicketError;
use crate::ticket::story::{Story, TicketSource, criteria_section, split_criteria};

// ============================================================================
// Jira REST client (blocking)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JiraSettings {
    pub base_url: String,
    pub user: Option<String>,
    pub token: Option<String>,

    /// Custom field holding acceptance criteria, e.g. "customfield_10020"
    pub acceptance_criteria_field: Option<String>,
}

pub struct JiraClient {
    settings: JiraSettings,
    client: reqwest::blocking::Client,
}

impl JiraClient {
    pub fn new(settings: JiraSettings) -> Result<Self, TicketError> {
        if settings.base_url.trim().is_empty() {
            return Err(TicketError::MissingCredentials("jira base_url".to_string()));
        }
        Ok(Self {
            settings,
            client: reqwest::blocking::Client::new(),
        })
    }

    pub fn issue_url(&self, key: &str) -> String {
        let mut fields = vec!["summary", "description", "issuetype", "status", "priority"];
        if let Some(field) = self.settings.acceptance_criteria_field.as_deref() {
            fields.push(field);
        }
        format!(
            "{}/rest/api/2/issue/{}?fields={}",
            self.settings.base_url.trim_end_matches('/'),
            key,
            fields.join(",")
        )
    }
}

impl TicketSource for JiraClient {
    fn fetch(&self, key: &str) -> Result<Story, TicketError> {
        let url = self.issue_url(key);
        debug!("GET {}", url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        request = match (&self.settings.user, &self.settings.token) {
            (Some(user), token) => request.basic_auth(user, token.clone()),
            (None, Some(token)) => request.bearer_auth(token),
            (None, None) => request,
        };

        let response = request.send()?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TicketError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TicketError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let issue: Value = response.json()?;
        story_from_issue(&issue, self.settings.acceptance_criteria_field.as_deref())
    }
}

/// Map a Jira v2 issue payload onto a `Story`.
pub fn story_from_issue(issue: &Value, criteria_field: Option<&str>) -> Result<Story, TicketError> {
    let key = issue["key"]
        .as_str()
        .ok_or_else(|| TicketError::Malformed("issue has no 'key'".to_string()))?
        .to_string();
    let fields = issue
        .get("fields")
        .ok_or_else(|| TicketError::Malformed(format!("issue {} has no 'fields'", key)))?;

    let summary = fields["summary"].as_str().unwrap_or_default().to_string();
    let description = fields["description"].as_str().unwrap_or_default().to_string();

    let mut acceptance_criteria = criteria_field
        .map(|f| criteria_from_field(&fields[f]))
        .unwrap_or_default();
    if acceptance_criteria.is_empty() {
        acceptance_criteria = criteria_section(&description)
            .map(|s| split_criteria(&s))
            .unwrap_or_default();
    }

    Ok(Story {
        key,
        summary,
        description,
        issue_type: name_of(&fields["issuetype"]).unwrap_or_else(|| "Story".to_string()),
        status: name_of(&fields["status"]).unwrap_or_default(),
        priority: name_of(&fields["priority"]).unwrap_or_default(),
        acceptance_criteria,
    })
}

fn name_of(value: &Value) -> Option<String> {
    value["name"].as_str().map(str::to_string)
}

/// A criteria custom field may be plain text, a list of strings, or a list
/// of option objects with a "value".
fn criteria_from_field(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => split_criteria(text),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Object(_) => item["value"].as_str().map(|s| s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}
