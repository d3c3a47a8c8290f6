use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::Identity,
    error::ApiError,
    jobs::{
        dto::{CategoryQuery, JobForm},
        repo::{Job, JobFields},
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/jobs", get(list_jobs))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(post_job))
        .route("/me/jobs", get(my_jobs))
}

impl JobForm {
    pub(crate) fn as_fields(&self) -> JobFields<'_> {
        JobFields {
            title: &self.title,
            description: &self.description,
            location: &self.location,
            pay: &self.pay,
            category: &self.category,
            poster_name: &self.poster_name,
            poster_contact: &self.poster_contact,
        }
    }
}

/// Browsing requires no identity. An exact category string narrows the list.
#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = Job::list(&state.db, query.category.as_deref()).await?;
    Ok(Json(jobs))
}

/// Posting requires a present identity, any role. There is no role check
/// here beyond that: the cached role in the session token is trusted as-is.
#[instrument(skip(state, payload))]
pub async fn post_job(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<JobForm>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    payload.validate()?;

    let job = Job::create(&state.db, payload.as_fields(), Some(identity.user_id)).await?;
    info!(job_id = %job.id, user_id = %identity.user_id, "job posted");
    Ok((StatusCode::CREATED, Json(job)))
}

/// Listings owned by the calling account.
#[instrument(skip(state))]
pub async fn my_jobs(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = Job::list_by_owner(&state.db, identity.user_id).await?;
    Ok(Json(jobs))
}
