use std::collections::HashMap;

use anyhow::Context;
use futures::future::join_all;
use reqwest::{Client, Method, RequestBuilder, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned, de::IgnoredAny};
use serde_json::json;
use types::{
    CostOverview, Error, NewUser, Result, User, UserUpdate, err,
    jira::{Issue, IssuePage, Project},
    points::PointsAward,
    user::CostOverviewResponse,
    worklog::{ProjectRow, project_rows},
};

use crate::Session;

pub(crate) trait ReqwestExt {
    /// Send and decode the body. `failure` is the message used when the
    /// backend fails without saying why.
    async fn try_send<T: DeserializeOwned>(self, failure: &str) -> Result<T>;
}

impl ReqwestExt for RequestBuilder {
    async fn try_send<T: DeserializeOwned>(self, failure: &str) -> Result<T> {
        let response = self.send().await.with_context(|| failure.to_string())?;
        let status = response.status();
        let body = response.bytes().await.with_context(|| failure.to_string())?;

        if !status.is_success() {
            let message = backend_message(&body).unwrap_or_else(|| failure.to_string());
            tracing::warn!(%status, %message, "backend request failed");
            return Err(Error::new(message).with_status(status.as_u16()));
        }

        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        match serde_json::from_slice(body) {
            Ok(r) => Ok(r),
            Err(error) => {
                tracing::debug!(%error, "failed to parse backend response");
                Err(anyhow::Error::new(error).context(failure.to_string()).into())
            }
        }
    }
}

/// The message in a backend error body, `{ "error": .. }` or `{ "message": .. }`.
pub fn backend_message(body: &[u8]) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        message: Option<String>,
    }

    let body: ErrorBody = serde_json::from_slice(body).ok()?;
    body.error
        .or(body.message)
        .filter(|message| !message.trim().is_empty())
}

fn succeeded() -> bool {
    true
}

/// The `{ success, data }` wrapper used by the project endpoints.
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default = "succeeded")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self, failure: &str) -> Result<T> {
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err(Error::new(self.message.unwrap_or_else(|| failure.to_string()))),
        }
    }
}

#[derive(Deserialize)]
struct IssuesResponse {
    #[serde(default = "succeeded")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    page: IssuePage,
}

#[derive(Deserialize)]
pub struct AuthGrant {
    pub token: SecretString,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// `segments` are appended to the base path, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| err!("backend url cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.url(segments)?))
    }

    pub async fn authenticate(&self, email: &str, password: &SecretString) -> Result<AuthGrant> {
        self.request(Method::POST, &["users", "auth"])?
            .json(&json!({ "email": email, "password": password.expose_secret() }))
            .try_send("Authentication failed")
            .await
    }

    /// Calls made on behalf of a signed-in user.
    pub fn as_user<'a>(&'a self, session: &'a Session) -> UserClient<'a> {
        UserClient {
            backend: self,
            token: session.token(),
        }
    }
}

pub struct UserClient<'a> {
    backend: &'a BackendClient,
    token: &'a SecretString,
}

impl UserClient<'_> {
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self
            .backend
            .request(method, segments)?
            .bearer_auth(self.token.expose_secret()))
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder> {
        self.request(Method::GET, segments)
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder> {
        self.request(Method::POST, segments)
    }

    fn put(&self, segments: &[&str]) -> Result<RequestBuilder> {
        self.request(Method::PUT, segments)
    }

    fn delete(&self, segments: &[&str]) -> Result<RequestBuilder> {
        self.request(Method::DELETE, segments)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get(&["users"])?.try_send("Failed to fetch users").await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<()> {
        self.post(&["users", "create"])?
            .json(user)
            .try_send::<IgnoredAny>("Failed to create user")
            .await?;
        Ok(())
    }

    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<()> {
        self.put(&["users", user_id])?
            .json(update)
            .try_send::<IgnoredAny>("Failed to update user")
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.delete(&["users", user_id])?
            .try_send::<IgnoredAny>("Failed to delete user")
            .await?;
        Ok(())
    }

    pub async fn change_password(
        &self,
        current_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<()> {
        self.put(&["users", "change-password"])?
            .json(&json!({
                "currentPassword": current_password.expose_secret(),
                "newPassword": new_password.expose_secret(),
            }))
            .try_send::<IgnoredAny>("Failed to change password")
            .await?;
        Ok(())
    }

    pub async fn cost_overview(&self) -> Result<CostOverview> {
        self.get(&["users", "cost-summary"])?
            .try_send::<CostOverviewResponse>("Failed to fetch cost summary")
            .await
            .map(CostOverview::from)
    }

    pub async fn add_points(&self, award: &PointsAward) -> Result<()> {
        self.post(&["points", "add"])?
            .json(award)
            .try_send::<IgnoredAny>("Failed to add points")
            .await?;
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        const FAILURE: &str = "Failed to fetch projects";
        self.get(&["projects"])?
            .try_send::<Envelope<Vec<Project>>>(FAILURE)
            .await?
            .into_data(FAILURE)
    }

    pub async fn get_project(&self, key: &str) -> Result<Project> {
        const FAILURE: &str = "Failed to fetch project details";
        self.get(&["projects", key])?
            .try_send::<Envelope<Project>>(FAILURE)
            .await?
            .into_data(FAILURE)
    }

    pub async fn project_issues(&self, key: &str) -> Result<IssuePage> {
        const FAILURE: &str = "Failed to fetch project issues";
        let response: IssuesResponse = self
            .get(&["projects", key, "issues"])?
            .try_send(FAILURE)
            .await?;

        if !response.success {
            return Err(Error::new(
                response.message.unwrap_or_else(|| FAILURE.to_string()),
            ));
        }
        Ok(response.page)
    }

    /// Recorded cost per project key.
    pub async fn project_costs(&self) -> Result<HashMap<String, f64>> {
        const FAILURE: &str = "Failed to fetch project costs";
        self.get(&["project-cost", "project-costs"])?
            .try_send::<Envelope<HashMap<String, f64>>>(FAILURE)
            .await?
            .into_data(FAILURE)
    }

    pub async fn add_project_cost(&self, project_key: &str, cost: f64) -> Result<()> {
        self.post(&["project-cost", "project-cost"])?
            .json(&json!({ "projectKey": project_key, "cost": cost }))
            .try_send::<IgnoredAny>("Failed to add project cost")
            .await?;
        Ok(())
    }

    /// Every project with its cost and logged hours. Issues are fetched for
    /// all projects at once; a project whose issues fail to load counts as
    /// having none, and missing costs count as zero.
    pub async fn project_overview(&self, hourly_rate: f64) -> Result<Vec<ProjectRow>> {
        let projects = self.list_projects().await?;
        let costs = self.project_costs().await.unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to fetch project costs");
            HashMap::new()
        });

        let pages = join_all(projects.iter().map(|p| self.project_issues(&p.key))).await;

        let issues: HashMap<String, Vec<Issue>> = projects
            .iter()
            .zip(pages)
            .map(|(project, page)| {
                let issues = match page {
                    Ok(page) => page.issues,
                    Err(error) => {
                        tracing::warn!(project = %project.key, %error, "failed to fetch issues");
                        Vec::new()
                    }
                };
                (project.key.clone(), issues)
            })
            .collect();

        Ok(project_rows(projects, &issues, &costs, hourly_rate))
    }
}
