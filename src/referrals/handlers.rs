use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{ClaimRequest, ClaimResponse, ReferralStats, ShareAction, ShareRequest};
use super::services;
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn referral_routes() -> Router<AppState> {
    Router::new()
        .route("/referrals/me", get(get_referral_stats))
        .route("/referrals/share", post(share_referral))
        .route("/referrals/copy", post(copy_referral_code))
        .route("/referrals/claim", post(claim_referral_code))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_referral_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ReferralStats>, AppError> {
    let stats = services::referral_stats(
        state.referrals.as_ref(),
        &user,
        state.config.referral.reward_amount,
    )
    .await?;
    Ok(Json(stats))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn share_referral(
    State(state): State<AppState>,
    user: AuthUser,
    body: Option<Json<ShareRequest>>,
) -> Result<Json<ShareAction>, AppError> {
    let native_share = body.map(|Json(b)| b.native_share).unwrap_or(false);
    let cfg = &state.config.referral;
    let code = services::get_or_create_code(state.referrals.as_ref(), &user, cfg.reward_amount).await?;
    Ok(Json(services::share_action(&code, cfg, native_share)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn copy_referral_code(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ShareAction>, AppError> {
    let code = services::get_or_create_code(
        state.referrals.as_ref(),
        &user,
        state.config.referral.reward_amount,
    )
    .await?;
    Ok(Json(services::copy_action(&code)))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn claim_referral_code(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), AppError> {
    let row = services::claim_code(
        state.referrals.as_ref(),
        user.id,
        &body.code,
        state.config.referral.reward_amount,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}
