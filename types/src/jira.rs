//! JIRA records as relayed by the backend. Fields the dashboard never reads
//! are left out; everything else defaults when missing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarUrls {
    #[serde(rename = "48x48", default)]
    pub large: Option<String>,
    #[serde(rename = "32x32", default)]
    pub medium: Option<String>,
    #[serde(rename = "24x24", default)]
    pub small: Option<String>,
    #[serde(rename = "16x16", default)]
    pub xsmall: Option<String>,
}

/// Worklog authors come with either a single avatar URL or the usual size map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvatarRef {
    Url(String),
    Sizes(AvatarUrls),
}

impl AvatarRef {
    pub fn into_urls(self) -> AvatarUrls {
        match self {
            AvatarRef::Url(url) => AvatarUrls {
                large: Some(url.clone()),
                medium: Some(url.clone()),
                small: Some(url.clone()),
                xsmall: Some(url),
            },
            AvatarRef::Sizes(urls) => urls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLead {
    pub account_id: String,
    pub display_name: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub subtask: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lead: Option<ProjectLead>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub avatar_urls: AvatarUrls,
    #[serde(default)]
    pub project_category: Option<ProjectCategory>,
    #[serde(default)]
    pub project_type_key: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub issue_types: Vec<IssueType>,
}

impl Project {
    pub fn category_name(&self) -> Option<&str> {
        self.project_category.as_ref().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    pub account_id: String,
    pub display_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub avatar_urls: AvatarUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCategory {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub color_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status_category: StatusCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogAuthor {
    pub account_id: String,
    pub display_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub avatar_urls: Option<AvatarRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogEntry {
    pub author: WorklogAuthor,
    #[serde(default)]
    pub time_spent_seconds: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorklogPage {
    #[serde(default)]
    pub worklogs: Vec<WorklogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    pub summary: String,
    pub status: Status,
    #[serde(default)]
    pub assignee: Option<JiraUser>,
    #[serde(default)]
    pub reporter: Option<JiraUser>,
    #[serde(default)]
    pub priority: Option<Priority>,
    pub issuetype: IssueType,
    pub created: String,
    #[serde(default)]
    pub updated: String,
    /// Plain text on older instances, a rich-text document on newer ones.
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub worklog: Option<WorklogPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub fields: IssueFields,
}

impl Issue {
    pub fn worklogs(&self) -> &[WorklogEntry] {
        self.fields
            .worklog
            .as_ref()
            .map(|w| w.worklogs.as_slice())
            .unwrap_or_default()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.fields.description.as_ref()?.as_str()
    }
}

/// One page of a project's issues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePage {
    #[serde(default)]
    pub project_key: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub max_results: u64,
    #[serde(default)]
    pub start_at: u64,
    #[serde(rename = "data", default)]
    pub issues: Vec<Issue>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn jira_user(id: &str, name: &str) -> JiraUser {
        JiraUser {
            account_id: id.into(),
            display_name: name.into(),
            email_address: None,
            active: true,
            avatar_urls: AvatarUrls::default(),
        }
    }

    pub(crate) fn worklog(author_id: &str, name: &str, seconds: u64) -> WorklogEntry {
        WorklogEntry {
            author: WorklogAuthor {
                account_id: author_id.into(),
                display_name: name.into(),
                email_address: None,
                avatar_urls: None,
            },
            time_spent_seconds: seconds,
        }
    }

    pub(crate) fn issue(
        key: &str,
        assignee: Option<JiraUser>,
        reporter: Option<JiraUser>,
        worklogs: Vec<WorklogEntry>,
    ) -> Issue {
        Issue {
            id: key.into(),
            key: key.into(),
            fields: IssueFields {
                summary: format!("Work on {key}"),
                status: Status {
                    id: "1".into(),
                    name: "In Progress".into(),
                    description: String::new(),
                    status_category: StatusCategory {
                        id: 4,
                        key: "indeterminate".into(),
                        color_name: "yellow".into(),
                        name: "In Progress".into(),
                    },
                },
                assignee,
                reporter,
                priority: None,
                issuetype: IssueType {
                    id: "10001".into(),
                    name: "Task".into(),
                    description: String::new(),
                    icon_url: String::new(),
                    subtask: false,
                },
                created: "2025-01-05T10:00:00.000+0000".into(),
                updated: String::new(),
                description: None,
                labels: Vec::new(),
                components: Vec::new(),
                worklog: Some(WorklogPage { worklogs }),
            },
        }
    }

    #[test]
    fn decodes_issue_page() {
        let page: IssuePage = serde_json::from_value(serde_json::json!({
            "success": true,
            "projectKey": "ACME",
            "total": 1,
            "maxResults": 50,
            "startAt": 0,
            "data": [{
                "id": "10010",
                "key": "ACME-1",
                "fields": {
                    "summary": "Set up CI",
                    "status": {
                        "id": "3",
                        "name": "Done",
                        "statusCategory": { "id": 3, "key": "done", "colorName": "green", "name": "Done" }
                    },
                    "reporter": { "accountId": "r1", "displayName": "Ravi" },
                    "issuetype": { "id": "1", "name": "Task" },
                    "created": "2025-01-05T10:00:00.000+0000",
                    "labels": ["infra", "ci", "q1"],
                    "description": { "type": "doc", "content": [] },
                    "worklog": {
                        "worklogs": [
                            { "author": { "accountId": "r1", "displayName": "Ravi", "avatarUrls": "https://a/r1.png" }, "timeSpentSeconds": 5400 },
                            { "author": { "accountId": "m2", "displayName": "Mina", "avatarUrls": { "24x24": "https://a/m2.png" } }, "timeSpentSeconds": 1800 }
                        ]
                    }
                }
            }]
        }))
        .unwrap();

        assert_eq!(page.project_key, "ACME");
        let issue = &page.issues[0];
        assert!(issue.fields.assignee.is_none());
        assert_eq!(issue.description_text(), None);
        assert_eq!(issue.worklogs().len(), 2);

        let single = issue.worklogs()[0].author.avatar_urls.clone().unwrap();
        assert_eq!(single.into_urls().small.as_deref(), Some("https://a/r1.png"));
        let sized = issue.worklogs()[1].author.avatar_urls.clone().unwrap();
        assert_eq!(sized.into_urls().small.as_deref(), Some("https://a/m2.png"));
    }

    #[test]
    fn issue_without_worklog_has_none() {
        let mut issue = issue("ACME-2", None, None, Vec::new());
        issue.fields.worklog = None;
        assert!(issue.worklogs().is_empty());
    }

    #[test]
    fn project_with_minimal_fields() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": "10000",
            "key": "ACME",
            "name": "Acme Portal",
            "projectTypeKey": "software",
            "projectCategory": { "id": "1", "name": "Paid" }
        }))
        .unwrap();

        assert_eq!(project.category_name(), Some("Paid"));
        assert!(project.lead.is_none());
        assert!(project.issue_types.is_empty());
    }
}
