use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;

use squigg_types::api::{ApiResponse, CreateSquiggRequest, TopSquiggsQuery};
use squigg_types::models::User;

use crate::auth::AppState;
use crate::content::DEFAULT_TOP_SQUIGGS;
use crate::error::{ServiceError, blocking};

const MAX_TOP_SQUIGGS: usize = 50;

pub async fn create_squigg(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    WithRejection(Json(req), _): WithRejection<Json<CreateSquiggRequest>, ServiceError>,
) -> Result<impl IntoResponse, ServiceError> {
    let view = blocking(move || state.content.create_squigg(&req.content, &user.id)).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Squigg created.", vec![view])),
    ))
}

pub async fn top_squiggs(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<TopSquiggsQuery>, ServiceError>,
) -> Result<impl IntoResponse, ServiceError> {
    let limit = query.limit.unwrap_or(DEFAULT_TOP_SQUIGGS).min(MAX_TOP_SQUIGGS);
    let squiggs = state.content.get_top_squiggs(limit)?;

    Ok(Json(ApiResponse::success("Top squiggs.", squiggs)))
}
