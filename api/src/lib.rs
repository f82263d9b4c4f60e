use dioxus::prelude::*;
use types::{
    CostOverview, CurrentUser, NewUser, User, UserUpdate,
    jira::{IssuePage, Project},
    points::PointsAward,
    worklog::ProjectRow,
};

#[post("/api/current-user")]
pub async fn get_current_user() -> ServerFnResult<Option<CurrentUser>> {
    Ok(server::current_user().await?)
}

#[post("/api/users")]
pub async fn list_users() -> ServerFnResult<Vec<User>> {
    let session = server::require_session().await?;
    Ok(server::backend()?.as_user(&session).list_users().await?)
}

#[post("/api/users/create")]
pub async fn create_user(user: NewUser) -> ServerFnResult<()> {
    let session = server::require_admin_session().await?;
    server::backend()?.as_user(&session).create_user(&user).await?;
    Ok(())
}

#[post("/api/users/update")]
pub async fn update_user(user_id: String, update: UserUpdate) -> ServerFnResult<()> {
    let session = server::require_admin_session().await?;
    if update.is_empty() {
        return Ok(());
    }

    server::backend()?
        .as_user(&session)
        .update_user(&user_id, &update)
        .await?;
    Ok(())
}

#[post("/api/users/delete")]
pub async fn delete_user(user_id: String) -> ServerFnResult<()> {
    let session = server::require_admin_session().await?;
    server::backend()?
        .as_user(&session)
        .delete_user(&user_id)
        .await?;
    Ok(())
}

#[post("/api/users/change-password")]
pub async fn change_password(current_password: String, new_password: String) -> ServerFnResult<()> {
    use types::forms::PasswordChange;

    let session = server::require_session().await?;

    let change = PasswordChange {
        current_password,
        new_password,
    };
    if let Some((_, message)) = change.validate().iter().next() {
        return Err(types::Error::new(message).with_status(400).into());
    }

    let new_password = server::SecretString::from(change.new_password);
    if server::config()?.is_default_password(&new_password) {
        return Err(
            types::Error::new("New password cannot be the same as the default password")
                .with_status(400)
                .into(),
        );
    }

    server::backend()?
        .as_user(&session)
        .change_password(&server::SecretString::from(change.current_password), &new_password)
        .await?;
    Ok(())
}

#[post("/api/users/cost-overview")]
pub async fn cost_overview() -> ServerFnResult<CostOverview> {
    let session = server::require_admin_session().await?;
    Ok(server::backend()?.as_user(&session).cost_overview().await?)
}

#[post("/api/points/add")]
pub async fn add_points(award: PointsAward) -> ServerFnResult<()> {
    let session = server::require_admin_session().await?;
    server::backend()?.as_user(&session).add_points(&award).await?;
    Ok(())
}

#[post("/api/projects")]
pub async fn list_projects() -> ServerFnResult<Vec<Project>> {
    let session = server::require_session().await?;
    Ok(server::backend()?.as_user(&session).list_projects().await?)
}

#[post("/api/projects/get")]
pub async fn get_project(key: String) -> ServerFnResult<Project> {
    let session = server::require_session().await?;
    Ok(server::backend()?.as_user(&session).get_project(&key).await?)
}

#[post("/api/projects/issues")]
pub async fn project_issues(key: String) -> ServerFnResult<IssuePage> {
    let session = server::require_session().await?;
    Ok(server::backend()?
        .as_user(&session)
        .project_issues(&key)
        .await?)
}

#[post("/api/projects/overview")]
pub async fn project_overview() -> ServerFnResult<Vec<ProjectRow>> {
    let session = server::require_admin_session().await?;
    let hourly_rate = server::config()?.hourly_rate;
    Ok(server::backend()?
        .as_user(&session)
        .project_overview(hourly_rate)
        .await?)
}

#[post("/api/projects/cost")]
pub async fn add_project_cost(project_key: String, cost: f64) -> ServerFnResult<()> {
    let session = server::require_admin_session().await?;
    if !cost.is_finite() || cost < 0.0 {
        return Err(types::Error::new("Cost must be a positive number")
            .with_status(400)
            .into());
    }

    server::backend()?
        .as_user(&session)
        .add_project_cost(&project_key, cost)
        .await?;
    Ok(())
}
