use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    admin::dto::{Dashboard, JobModerationResponse, ModerationResponse},
    auth::{
        jwt::AdminIdentity,
        repo::{Role, User},
    },
    error::ApiError,
    jobs::{dto::JobForm, repo::Job},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/jobs/:id", put(edit_job).delete(delete_job))
        .route("/admin/users/:id/ban", post(ban_user))
        .route("/admin/users/:id/unban", post(unban_user))
        .route("/admin/users/:id/promote", post(promote_user))
}

/// Role transitions available to administrators. `Unban` always resets to
/// `user`: a prior admin role is not restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moderation {
    Ban,
    Unban,
    Promote,
}

impl Moderation {
    pub fn target_role(self) -> Role {
        match self {
            Moderation::Ban => Role::Banned,
            Moderation::Unban => Role::User,
            Moderation::Promote => Role::Admin,
        }
    }

    fn notice(self) -> &'static str {
        match self {
            Moderation::Ban => "Ban successfully initiated!",
            Moderation::Unban => "User has been unbanned successfully!",
            Moderation::Promote => "You promoted a user to admin!",
        }
    }
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
) -> Result<Json<Dashboard>, ApiError> {
    let jobs = Job::list(&state.db, None).await?;
    let users = User::list_all(&state.db).await?;
    info!(admin_id = %identity.user_id, "admin dashboard viewed");
    Ok(Json(Dashboard { jobs, users }))
}

#[instrument(skip(state, payload))]
pub async fn edit_job(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(job_id): Path<i64>,
    Json(payload): Json<JobForm>,
) -> Result<Json<JobModerationResponse>, ApiError> {
    payload.validate()?;

    let job = Job::update(&state.db, job_id, payload.as_fields())
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".into()))?;

    info!(job_id = %job.id, admin_id = %identity.user_id, "job edited");
    Ok(Json(JobModerationResponse {
        message: "Job successfully edited!".into(),
        job: Some(job),
    }))
}

/// Maps the delete outcome. Once a listing is gone its id no longer exists,
/// so deleting it again reports not-found, never success.
fn deletion_result(deleted: bool) -> Result<(), ApiError> {
    if deleted {
        Ok(())
    } else {
        Err(ApiError::NotFound("Job not found".into()))
    }
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    AdminIdentity(identity): AdminIdentity,
    Path(job_id): Path<i64>,
) -> Result<Json<JobModerationResponse>, ApiError> {
    if let Err(e) = deletion_result(Job::delete(&state.db, job_id).await?) {
        warn!(%job_id, "delete of missing job");
        return Err(e);
    }
    info!(%job_id, admin_id = %identity.user_id, "job deleted");
    Ok(Json(JobModerationResponse {
        message: "Job deleted successfully!".into(),
        job: None,
    }))
}

async fn moderate(
    state: &AppState,
    admin: &AdminIdentity,
    user_id: i64,
    action: Moderation,
) -> Result<Json<ModerationResponse>, ApiError> {
    let user = User::set_role(&state.db, user_id, action.target_role())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(
        target_id = %user.id,
        role = ?user.role,
        admin_id = %admin.0.user_id,
        "user role changed"
    );
    Ok(Json(ModerationResponse {
        message: action.notice().into(),
        user,
    }))
}

#[instrument(skip(state))]
pub async fn ban_user(
    State(state): State<AppState>,
    admin: AdminIdentity,
    Path(user_id): Path<i64>,
) -> Result<Json<ModerationResponse>, ApiError> {
    moderate(&state, &admin, user_id, Moderation::Ban).await
}

#[instrument(skip(state))]
pub async fn unban_user(
    State(state): State<AppState>,
    admin: AdminIdentity,
    Path(user_id): Path<i64>,
) -> Result<Json<ModerationResponse>, ApiError> {
    moderate(&state, &admin, user_id, Moderation::Unban).await
}

#[instrument(skip(state))]
pub async fn promote_user(
    State(state): State<AppState>,
    admin: AdminIdentity,
    Path(user_id): Path<i64>,
) -> Result<Json<ModerationResponse>, ApiError> {
    moderate(&state, &admin, user_id, Moderation::Promote).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ban_targets_banned() {
        assert_eq!(Moderation::Ban.target_role(), Role::Banned);
    }

    #[test]
    fn promote_targets_admin() {
        assert_eq!(Moderation::Promote.target_role(), Role::Admin);
    }

    #[test]
    fn unban_always_resets_to_user() {
        // The transition is lossy: it does not depend on the role held
        // before the ban, so an unbanned ex-admin lands on `user`.
        assert_eq!(Moderation::Unban.target_role(), Role::User);
    }

    #[test]
    fn repeated_delete_reports_not_found() {
        // First delete removes a row; the second finds nothing to remove
        assert!(deletion_result(true).is_ok());
        assert!(matches!(
            deletion_result(false),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn promote_then_ban_then_unban_ends_at_user() {
        let mut role = Role::User;
        for action in [Moderation::Promote, Moderation::Ban, Moderation::Unban] {
            role = action.target_role();
        }
        assert_eq!(role, Role::User);
    }
}
