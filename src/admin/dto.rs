use serde::Serialize;

use crate::auth::repo::User;
use crate::jobs::repo::Job;

/// Dashboard payload: every listing and every account.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub jobs: Vec<Job>,
    pub users: Vec<User>,
}

/// Result of a role transition on one account.
#[derive(Debug, Serialize)]
pub struct ModerationResponse {
    pub message: String,
    pub user: User,
}

/// Result of a listing mutation.
#[derive(Debug, Serialize)]
pub struct JobModerationResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}
