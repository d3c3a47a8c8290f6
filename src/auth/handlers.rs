use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, NoticeResponse, RefreshRequest, RegisterRequest},
        jwt::{Identity, JwtKeys},
        password::{hash_password, verify_password},
        repo::{Role, User},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Input shape checks on registration, applied before any business rule.
fn validate_register(payload: &RegisterRequest) -> Result<(), ApiError> {
    if payload.fullname.trim().is_empty() || payload.username.trim().is_empty() {
        return Err(ApiError::Validation("All fields are required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.phone.trim().len() < 10 {
        return Err(ApiError::Validation("Phone number too short".into()));
    }
    if payload.password.len() < 6 {
        return Err(ApiError::Validation("Password too short".into()));
    }
    Ok(())
}

/// Combined uniqueness rule: a hit on either username or email rejects the
/// whole registration with one notice, not field-specific errors.
fn ensure_no_conflict(existing: Option<&User>) -> Result<(), ApiError> {
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Username or email already exists. Try another.".into(),
        ));
    }
    Ok(())
}

/// Post-verification gate: the persisted role decides whether a session may
/// be established. Runs after the password match, so a banned account with
/// correct credentials still gets the distinct banned notice.
fn gate_login(role: Role) -> Result<(), ApiError> {
    if role == Role::Banned {
        return Err(ApiError::Authentication(
            "Your account has been banned. Contact support.".into(),
        ));
    }
    Ok(())
}

fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(&user)?;
    let refresh_token = keys.sign_refresh(&user)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    validate_register(&payload)?;

    let existing =
        User::find_by_username_or_email(&state.db, &payload.username, &payload.email).await?;
    if let Err(e) = ensure_no_conflict(existing.as_ref()) {
        warn!(username = %payload.username, "registration conflict");
        return Err(e);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        payload.fullname.trim(),
        &payload.email,
        payload.phone.trim(),
        &payload.username,
        &hash,
    )
    .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::Authentication(
                "Invalid username or password".into(),
            ));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Authentication(
            "Invalid username or password".into(),
        ));
    }

    if let Err(e) = gate_login(user.role) {
        warn!(user_id = %user.id, "login attempt by banned account");
        return Err(e);
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Authentication("Invalid or expired session".into()))?;

    // Refresh is the one point where the persisted role is re-read; a ban
    // since issuance ends the session here.
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Authentication("Invalid or expired session".into()))?;

    if user.role == Role::Banned {
        warn!(user_id = %user.id, "refresh attempt by banned account");
        return Err(ApiError::Authentication(
            "Your account has been banned. Contact support.".into(),
        ));
    }

    info!(user_id = %user.id, "session refreshed");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(identity))]
pub async fn logout(identity: Identity) -> Json<NoticeResponse> {
    // Tokens are stateless; the client discards them on this acknowledgement.
    info!(user_id = %identity.user_id, username = %identity.username, "user logged out");
    Json(NoticeResponse {
        message: "You have been logged out.".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn existing_user() -> User {
        User {
            id: 7,
            fullname: "Bob Example".into(),
            email: "bob@x.com".into(),
            phone: "07009876543".into(),
            username: "bob".into(),
            password_hash: "$argon2id$fake".into(),
            role: Role::User,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn valid_payload() -> RegisterRequest {
        RegisterRequest {
            fullname: "Alice Example".into(),
            email: "alice@x.com".into(),
            phone: "07001234567".into(),
            username: "alice".into(),
            password: "s3cret".into(),
        }
    }

    #[test]
    fn accepts_a_well_formed_registration() {
        assert!(validate_register(&valid_payload()).is_ok());
    }

    #[test]
    fn rejects_short_password() {
        let mut payload = valid_payload();
        payload.password = "12345".into();
        let err = validate_register(&payload).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_short_phone() {
        let mut payload = valid_payload();
        payload.phone = "12345".into();
        assert!(validate_register(&payload).is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        for bad in ["not-an-email", "a@b", "a b@c.com", ""] {
            let mut payload = valid_payload();
            payload.email = bad.into();
            assert!(validate_register(&payload).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn any_existing_user_is_a_combined_conflict() {
        // One notice for a hit on either field, not field-specific errors
        let existing = existing_user();
        match ensure_no_conflict(Some(&existing)) {
            Err(ApiError::Conflict(msg)) => {
                assert_eq!(msg, "Username or email already exists. Try another.");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn no_existing_user_passes_the_conflict_check() {
        assert!(ensure_no_conflict(None).is_ok());
    }

    #[test]
    fn banned_role_blocks_login_even_after_password_match() {
        // gate_login runs only once the password has verified; the banned
        // account still gets its distinct notice rather than bad-credentials
        match gate_login(Role::Banned) {
            Err(ApiError::Authentication(msg)) => {
                assert_eq!(msg, "Your account has been banned. Contact support.");
            }
            other => panic!("expected authentication failure, got {other:?}"),
        }
    }

    #[test]
    fn user_and_admin_roles_may_establish_sessions() {
        assert!(gate_login(Role::User).is_ok());
        assert!(gate_login(Role::Admin).is_ok());
    }

    #[test]
    fn rejects_empty_required_fields() {
        let mut payload = valid_payload();
        payload.fullname = "  ".into();
        assert!(validate_register(&payload).is_err());

        let mut payload = valid_payload();
        payload.username = "".into();
        assert!(validate_register(&payload).is_err());
    }
}
