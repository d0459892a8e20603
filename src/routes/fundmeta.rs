use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use super::extract::{respond, JsonBody};
use crate::{
    error::{AppError, AppResult},
    fundmeta::{NewMutualFundMeta, UpdateMutualFundMeta},
    middleware::RequestContext,
    pagination::{Pagination, PaginationParams},
    state::AppState,
};

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(input): JsonBody<NewMutualFundMeta>,
) -> AppResult<Response> {
    let created = state.fund_meta.create(input, ctx.now).await?;
    info!(request_id = %ctx.request_id, id = created.id, scheme_code = %created.scheme_code, "mutual_fund_meta created");
    Ok(respond(created, StatusCode::CREATED))
}

pub async fn query(
    State(state): State<AppState>,
    ctx: RequestContext,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Response> {
    let Query(pairs) = pairs.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let params = PaginationParams::from_pairs(pairs);
    let pagi = Pagination::from_params(&params)?;
    let records = state.fund_meta.query(&pagi).await?;
    tracing::debug!(request_id = %ctx.request_id, count = records.len(), "mutual_fund_meta listed");
    Ok(respond(records, StatusCode::OK))
}

pub async fn query_by_id(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Response> {
    let record = state.fund_meta.query_by_id(&key).await?;
    Ok(respond(record, StatusCode::OK))
}

pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(key): Path<String>,
    JsonBody(input): JsonBody<UpdateMutualFundMeta>,
) -> AppResult<Response> {
    let updated = state.fund_meta.update(&key, input, ctx.now).await?;
    info!(request_id = %ctx.request_id, id = updated.id, "mutual_fund_meta updated");
    Ok(respond(updated, StatusCode::OK))
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(key): Path<String>,
) -> AppResult<Response> {
    state.fund_meta.delete(&key, ctx.now).await?;
    info!(request_id = %ctx.request_id, key = %key, "mutual_fund_meta deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
