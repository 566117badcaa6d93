//! Handlers for sign-in, token refresh, logout, the current profile and
//! staff registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use staydesk_core::error::CoreError;
use staydesk_core::fields::{self, FieldErrors};
use staydesk_core::roles::DEFAULT_ROLE;
use staydesk_core::types::DbId;
use staydesk_db::models::session::NewSession;
use staydesk_db::models::user::{NewUser, User, UserResponse};
use staydesk_db::repositories::{RoleRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{issue_access_token, RefreshToken};
use crate::auth::password::{generate_temporary_password, hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::form::FormData;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::notify::IssuedCredentials;
use crate::response::ApiResponse;
use crate::rules;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Tokens plus the signed-in user, returned by login, refresh and register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Registration result. `temporary_password` is shown exactly once.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    #[serde(flatten)]
    pub auth: AuthResponse,
    pub temporary_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Body: `{ login | email | phone, password }`. An identifier that parses as
/// an e-mail address is matched on `email`, anything else on the
/// whitespace-stripped `phone`.
pub async fn login(
    State(state): State<AppState>,
    form: FormData,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    const LOGIN_KEYS: [&str; 3] = ["login", "email", "phone"];
    let mut errors = FieldErrors::new();
    let login = LOGIN_KEYS
        .into_iter()
        .find_map(|key| form.text(key, &mut errors).filter(|v| !v.is_empty()));
    let password = form.raw_text("password", &mut errors).filter(|p| !p.is_empty());

    if login.is_none() && !LOGIN_KEYS.iter().any(|key| errors.contains(key)) {
        errors.add("login", "Email or phone is required.");
    }
    if password.is_none() && !errors.contains("password") {
        errors.add("password", "Password is required.");
    }
    fields::check_max_chars(&mut errors, "login", login.as_deref(), 255);

    let (Some(login), Some(password)) = (login, password) else {
        return Err(AppError::Core(CoreError::Validation(errors)));
    };
    errors.into_result()?;

    let user = if rules::looks_like_email(&login) {
        UserRepo::find_by_email(&state.pool, &login).await?
    } else {
        let phone: String = login.split_whitespace().collect();
        UserRepo::find_by_phone(&state.pool, &phone).await?
    };
    let user = user.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
    })?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    UserRepo::touch_last_login(&state.pool, user.id).await?;
    let response = create_auth_response(&state, &user).await?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(Json(ApiResponse::with_message(
        "User login successfully.",
        response,
    )))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new token pair. The presented session is
/// spent, so replaying the same refresh token fails.
pub async fn refresh(
    State(state): State<AppState>,
    form: FormData,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let mut errors = FieldErrors::new();
    let refresh_token = form.raw_text("refresh_token", &mut errors).filter(|t| !t.is_empty());
    if !errors.contains("refresh_token") {
        fields::check_required(&mut errors, "refresh_token", refresh_token.as_deref());
    }
    errors.into_result()?;
    let refresh_token = refresh_token.unwrap_or_default();

    let session = SessionRepo::consume(&state.pool, &RefreshToken::hash(&refresh_token))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(ApiResponse::data(response)))
}

/// POST /api/v1/auth/logout
///
/// Revoke every session of the caller.
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<ApiResponse<()>>> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.user_id).await?;
    tracing::info!(user_id = user.user_id, revoked, "User logged out");
    Ok(Json(ApiResponse::ack("Logged out successfully.")))
}

/// GET /api/v1/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    Ok(Json(ApiResponse::data(UserResponse::from(user))))
}

/// POST /api/v1/auth/register
///
/// Admin only. Creates a staff account with a generated password, hands the
/// credentials to the notifier and returns them once.
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    form: FormData,
) -> AppResult<(StatusCode, Json<ApiResponse<RegisterResponse>>)> {
    let mut errors = FieldErrors::new();

    let name = form.text("name", &mut errors).filter(|v| !v.is_empty());
    if name.is_none() && !errors.contains("name") {
        errors.add("name", "Name is required.");
    }
    fields::check_max_chars(&mut errors, "name", name.as_deref(), 255);

    let email = form.text("email", &mut errors).filter(|v| !v.is_empty());
    match email.as_deref() {
        None if errors.contains("email") => {}
        None => errors.add("email", "Email is required."),
        Some(e) if !rules::looks_like_email(e) => errors.add("email", "Email format is invalid."),
        Some(e) => {
            if UserRepo::email_taken(&state.pool, e).await? {
                errors.add("email", "This email is already used.");
            }
        }
    }

    let phone = rules::optional_text(&form, &mut errors, "phone", 30)
        .map(|p| p.split_whitespace().collect::<String>());

    let role_name = rules::optional_text(&form, &mut errors, "role", 50)
        .unwrap_or_else(|| DEFAULT_ROLE.to_string());
    let role_id = RoleRepo::id_for_name(&state.pool, &role_name).await?;
    if role_id.is_none() {
        errors.add("role", fields::invalid_selection("role"));
    }

    let (Some(name), Some(email), Some(role_id)) = (name, email, role_id) else {
        return Err(AppError::Core(CoreError::Validation(errors)));
    };
    errors.into_result()?;

    let temporary_password = generate_temporary_password();
    let password_hash = hash_password(&temporary_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &NewUser {
            name,
            email,
            phone,
            password_hash,
            role_id,
        },
    )
    .await?;

    let credentials = IssuedCredentials {
        name: user.name.clone(),
        email: user.email.clone(),
        temporary_password: temporary_password.clone(),
    };
    if let Err(e) = state.notifier.send_credentials(&credentials).await {
        tracing::warn!(user_id = user.id, error = %e, "Credential delivery failed");
    }

    let auth = create_auth_response(&state, &user).await?;
    tracing::info!(
        user_id = user.id,
        role = %user.role,
        registered_by = admin.user_id,
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully. Credentials emailed.",
            RegisterResponse {
                auth,
                temporary_password,
            },
        )),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open a session: persist a refresh token, sign a bearer token and build
/// the response.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let refresh = RefreshToken::issue(&state.config.jwt);
    SessionRepo::open(
        &state.pool,
        &NewSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at: refresh.expires_at,
        },
    )
    .await?;

    let access = issue_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(AuthResponse {
        token: access.token,
        token_type: "Bearer",
        refresh_token: refresh.plaintext,
        expires_in: access.expires_in,
        user: UserInfo {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            phone: user.phone.clone(),
        },
    })
}
