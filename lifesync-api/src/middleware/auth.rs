/// Authentication middleware
///
/// Resolves the caller from the `Authorization: Bearer <token>` header and
/// inserts an [`AuthContext`] into the request extensions. Handlers then
/// take `Extension<AuthContext>` and scope every query by its `family_id`.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use lifesync_shared::auth::middleware::{authenticate, AuthContext};

/// Rejects unauthenticated requests with 401
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let ctx: AuthContext = authenticate(&state.db, state.jwt_secret(), authorization).await?;

    tracing::debug!(user_id = %ctx.user_id, family_id = %ctx.family_id, "Request authenticated");

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
