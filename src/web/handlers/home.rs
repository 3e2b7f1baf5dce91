//! Home and health handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::board::BoardRepository;
use crate::db::MemberRepository;
use crate::web::dto::{ApiResponse, HomeResponse};
use crate::web::error::ApiError;
use crate::web::middleware::OptionalAuthUser;

use super::AppState;

/// GET / - Site summary.
#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    responses((status = 200, description = "Site summary", body = HomeResponse))
)]
pub async fn home(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
) -> Result<Json<ApiResponse<HomeResponse>>, ApiError> {
    let members = MemberRepository::new(state.db.pool());
    let member_count = members.count().await?;
    let board_count = BoardRepository::new(state.db.pool()).count_active().await?;

    let member_name = match claims {
        Some(claims) => members.get_by_id(claims.sub).await?.map(|m| m.name),
        None => None,
    };

    Ok(Json(ApiResponse::new(HomeResponse {
        site_name: state.site_name.clone(),
        member_count,
        board_count,
        member_name,
    })))
}

/// GET /health - Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}
