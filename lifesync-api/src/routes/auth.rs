/// Account endpoints
///
/// Owners register themselves; member accounts are provisioned by an owner
/// and share the owner's family scope.
///
/// # Endpoints
///
/// Public:
/// - `POST /api/auth/register` - Register a household owner
/// - `POST /api/auth/login` - Exchange credentials for a token
///
/// Authenticated:
/// - `GET /api/auth/me`, `PUT /api/auth/me` - Own profile
/// - `PUT /api/auth/change-password`
/// - `POST /api/auth/logout`
/// - `POST|GET /api/auth/family-members` - Member accounts
/// - `PUT|DELETE /api/auth/family-members/:id`
/// - `PUT /api/auth/family-members/:id/reset-password`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use lifesync_shared::{
    auth::{
        authorization::{
            require_account_manager, require_deletable, require_family_member, require_owner,
            require_same_family,
        },
        jwt,
        middleware::AuthContext,
        password::{self, password_policy},
    },
    models::user::{CreateUser, UpdateMember, UpdateProfile, User, UserRole},
    validation::{normalize_email, not_blank, trimmed},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "password_policy"))]
    pub password: String,

    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(custom(function = "password_policy"))]
    pub new_password: String,
}

/// Body for provisioning a member account
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: String,

    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "password_policy"))]
    pub password: String,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(length(max = 100))]
    pub relation: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberResponse {
    pub message: String,
    pub family_member: User,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(length(max = 100))]
    pub relation: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "password_policy"))]
    pub new_password: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

fn member_not_found() -> ApiError {
    ApiError::not_found("Family member")
}

async fn ensure_email_available(state: &AppState, email: &str) -> ApiResult<()> {
    if User::email_exists(&state.db, email).await? {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }
    Ok(())
}

/// Register a household owner
///
/// ```text
/// POST /api/auth/register
/// { "name": "Alex", "email": "alex@example.com", "password": "secret1" }
/// ```
///
/// Returns 201 with the user and a token. The new owner's family scope is
/// their own id.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or email already registered
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let email = normalize_email(&req.email);
    ensure_email_available(&state, &email).await?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser::owner(req.name.trim().to_string(), email, password_hash, req.phone),
    )
    .await?;

    let token = jwt::issue_for_user(user.id, state.jwt_secret(), state.config.jwt.expiration_days)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            user,
            token,
        }),
    ))
}

/// Log in with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email, wrong password, or inactive account
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = normalize_email(&req.email);

    let mut user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(invalid_credentials());
    }

    if !user.is_active {
        return Err(ApiError::Unauthorized("Account is inactive".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;
    user.last_login = Some(Utc::now());

    let token = jwt::issue_for_user(user.id, state.jwt_secret(), state.config.jwt.expiration_days)?;

    tracing::info!(user_id = %user.id, family_id = %user.family_scope(), "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user,
        token,
    }))
}

/// Current user
pub async fn me(Extension(ctx): Extension<AuthContext>) -> Json<User> {
    Json(ctx.user)
}

/// Update own name, phone or avatar
pub async fn update_me(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let user = User::update_profile(
        &state.db,
        ctx.user_id,
        UpdateProfile {
            name: req.name.map(|n| n.trim().to_string()),
            phone: req.phone,
            avatar: req.avatar,
        },
    )
    .await?
    .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(user))
}

/// Change own password
///
/// # Errors
///
/// - `401 Unauthorized`: current password is incorrect
pub async fn change_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if !password::verify_password(&req.current_password, &ctx.user.password_hash)? {
        return Err(ApiError::Unauthorized("Current password is incorrect".to_string()));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    User::update_password(&state.db, ctx.user_id, &password_hash).await?;

    tracing::info!(user_id = %ctx.user_id, "Password changed");

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// Tokens are stateless; the client discards its copy
pub async fn logout(Extension(ctx): Extension<AuthContext>) -> Json<MessageResponse> {
    tracing::debug!(user_id = %ctx.user_id, "User logged out");
    Json(MessageResponse::new("Logged out successfully"))
}

/// Provision a member account in the caller's family
///
/// An owner that has no stored family id yet gets their own id stored,
/// so the family scope stays the same for both accounts.
///
/// # Errors
///
/// - `403 Forbidden`: caller is not an owner
/// - `400 Bad Request`: validation failed or email already registered
pub async fn create_family_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ValidatedJson(req): ValidatedJson<CreateMemberRequest>,
) -> ApiResult<(StatusCode, Json<CreateMemberResponse>)> {
    require_owner(&ctx)?;

    let email = normalize_email(&req.email);
    ensure_email_available(&state, &email).await?;

    if ctx.user.family_id.is_none() {
        User::set_family_id(&state.db, ctx.user_id, ctx.family_id).await?;
    }

    let password_hash = password::hash_password(&req.password)?;

    let member = User::create(
        &state.db,
        CreateUser {
            name: req.name.trim().to_string(),
            email,
            password_hash,
            phone: req.phone,
            role: UserRole::Member,
            parent_user_id: Some(ctx.user_id),
            family_id: Some(ctx.family_id),
            relation: req.relation,
        },
    )
    .await?;

    tracing::info!(
        user_id = %ctx.user_id,
        family_id = %ctx.family_id,
        member_id = %member.id,
        "Member account created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateMemberResponse {
            message: "Family member account created successfully".to_string(),
            family_member: member,
        }),
    ))
}

/// All other accounts in the caller's family, newest first
pub async fn list_family_members(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<User>>> {
    let members = User::list_family(&state.db, ctx.family_id, ctx.user_id).await?;
    Ok(Json(members))
}

/// Update a member account
///
/// # Errors
///
/// - `404 Not Found`: no such account
/// - `403 Forbidden`: account belongs to another family, or the caller is a
///   member changing an account other than their own
pub async fn update_family_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateMemberRequest>,
) -> ApiResult<Json<User>> {
    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(member_not_found)?;

    require_same_family(&ctx, &target)?;
    require_account_manager(&ctx, &target)?;

    let updated = User::update_member(
        &state.db,
        id,
        UpdateMember {
            name: req.name.map(|n| n.trim().to_string()),
            phone: req.phone,
            relation: req.relation,
            is_active: req.is_active,
        },
    )
    .await?
    .ok_or_else(member_not_found)?;

    Ok(Json(updated))
}

/// Delete a member account
///
/// # Errors
///
/// - `404 Not Found`: no such account
/// - `403 Forbidden`: account belongs to another family, is an owner, or
///   is another member's account and the caller is not the owner
pub async fn delete_family_member(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(member_not_found)?;

    require_family_member(&ctx, &target)?;
    require_deletable(&target)?;
    require_account_manager(&ctx, &target)?;

    if !User::delete(&state.db, id).await? {
        return Err(member_not_found());
    }

    tracing::info!(user_id = %ctx.user_id, member_id = %id, "Member account deleted");

    Ok(Json(MessageResponse::deleted("Family member")))
}

/// Set a new password on a member account
///
/// Owners may reset any member; members only their own account.
pub async fn reset_member_password(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let target = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(member_not_found)?;

    require_family_member(&ctx, &target)?;
    require_account_manager(&ctx, &target)?;

    let password_hash = password::hash_password(&req.new_password)?;
    User::update_password(&state.db, id, &password_hash).await?;

    tracing::info!(user_id = %ctx.user_id, member_id = %id, "Member password reset");

    Ok(Json(MessageResponse::new("Password reset successfully")))
}
