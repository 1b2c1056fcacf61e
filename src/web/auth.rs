use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use chrono::{Duration as ChronoDuration, Utc};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use sqlx::{AnyConnection, AnyPool};
use tracing::{error, info};
use uuid::Uuid;

use crate::web::{
    AppState,
    data::{fetch_user_by_id, fetch_user_by_username},
    models::{UserRow, UserView, format_timestamp, timestamp_now},
    responses::{ApiError, ApiResult, json_body, optional, required},
};

pub const SESSION_COOKIE: &str = "session";
pub const SESSION_TTL_DAYS: i64 = 1;

/// Capability attached to every account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "employee" => Some(Role::Employee),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether an account holding `self` may act where `required` is demanded.
    pub fn grants(&self, required: Role) -> bool {
        match required {
            Role::Employee => true,
            Role::Admin => *self == Role::Admin,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, SignedCookieJar, Json<UserView>)> {
    let request = json_body(payload)?;

    let username = required(request.username, "username")?;
    let full_name = required(request.full_name, "fullName")?;
    let email = required(request.email, "email")?;
    let department = required(request.department, "department")?;
    let title = required(request.title, "title")?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("password is required"))?;
    let role = match optional(request.role) {
        Some(raw) => {
            Role::parse(&raw).ok_or_else(|| ApiError::validation(format!("Invalid role: {raw}")))?
        }
        None => Role::Employee,
    };

    if fetch_user_by_username(state.pool_ref(), &username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    let password_hash = hash_password(state.password_hasher(), &password).map_err(|err| {
        error!(?err, "failed to hash password during registration");
        ApiError::Internal(anyhow::anyhow!("password hashing failed"))
    })?;

    let mut tx = state.begin().await?;

    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, password_hash, full_name, email, department, title, role)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(&username)
    .bind(&password_hash)
    .bind(&full_name)
    .bind(&email)
    .bind(&department)
    .bind(&title)
    .bind(role.as_str())
    .fetch_one(&mut *tx)
    .await;

    let user_id = match inserted {
        Ok(id) => id,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::Conflict("Username already exists".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    let token = create_session(&mut tx, user_id).await?;
    tx.commit().await?;

    info!(user_id, username = %username, "registered new user");

    let view = UserView {
        id: user_id,
        username,
        full_name,
        email,
        department,
        title,
        role: role.as_str().to_string(),
    };

    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token)),
        Json(view),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(SignedCookieJar, Json<UserView>)> {
    let request = json_body(payload)?;
    let username = required(request.username, "username")?;
    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("password is required"))?;

    let user = match fetch_user_by_username(state.pool_ref(), &username).await? {
        Some(user) if verify_password(&password, &user.password_hash) => user,
        _ => return Err(invalid_credentials()),
    };

    let mut conn = state.pool_ref().acquire().await?;
    let token = create_session(&mut conn, user.id).await?;

    Ok((jar.add(session_cookie(token)), Json(UserView::from(user))))
}

pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> (SignedCookieJar, StatusCode) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            if let Err(err) = sqlx::query("DELETE FROM sessions WHERE token = $1")
                .bind(token.to_string())
                .execute(state.pool_ref())
                .await
            {
                error!(?err, "failed to remove session during logout");
            }
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));

    (jar.remove(removal), StatusCode::NO_CONTENT)
}

pub async fn current_user(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<UserView>> {
    let user = authorize(&state, &jar, Role::Employee).await?;
    Ok(Json(UserView::from(user)))
}

/// The single authorization gate for protected handlers.
///
/// Callers without a session are `Unauthenticated` where a plain session is
/// enough, and `Forbidden` wherever the admin capability is demanded.
pub async fn authorize(state: &AppState, jar: &SignedCookieJar, required: Role) -> ApiResult<UserRow> {
    let user = session_user(state.pool_ref(), jar).await?;

    match (user, required) {
        (Some(user), required) if user.role().grants(required) => Ok(user),
        (Some(_), _) => Err(ApiError::Forbidden("Admin access required".to_string())),
        (None, Role::Admin) => Err(ApiError::Forbidden("Admin access required".to_string())),
        (None, Role::Employee) => Err(ApiError::Unauthenticated(
            "Authentication required".to_string(),
        )),
    }
}

/// Resolve the signed session cookie to its user, if the session is live.
pub async fn session_user(pool: &AnyPool, jar: &SignedCookieJar) -> sqlx::Result<Option<UserRow>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let Ok(token) = Uuid::parse_str(cookie.value()) else {
        return Ok(None);
    };

    let user_id: Option<i64> = sqlx::query_scalar(
        "SELECT user_id FROM sessions WHERE token = $1 AND expires_at > $2",
    )
    .bind(token.to_string())
    .bind(timestamp_now())
    .fetch_optional(pool)
    .await?;

    match user_id {
        Some(id) => fetch_user_by_id(pool, id).await,
        None => Ok(None),
    }
}

/// Store a fresh session for `user_id`, clearing out expired ones first.
pub async fn create_session(conn: &mut AnyConnection, user_id: i64) -> sqlx::Result<Uuid> {
    let now = Utc::now();

    sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
        .bind(format_timestamp(now))
        .execute(&mut *conn)
        .await?;

    let token = Uuid::new_v4();
    let expires_at = now + ChronoDuration::days(SESSION_TTL_DAYS);

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token.to_string())
        .bind(user_id)
        .bind(format_timestamp(expires_at))
        .execute(&mut *conn)
        .await?;

    Ok(token)
}

fn session_cookie(token: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::days(SESSION_TTL_DAYS));
    cookie
}

pub fn hash_password(
    hasher: &Argon2<'_>,
    password: &str,
) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    hasher
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthenticated("Invalid username or password".to_string())
}
