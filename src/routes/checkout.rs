use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;

use crate::access_control::check_ownership;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::query::{
    DeleteResult, Document, InsertOneResult, UpdateResult, delete_checkout, find_checkouts,
    insert_checkout, set_checkout_updated,
};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInput {
    #[serde(rename = "isUpdated", default)]
    pub is_updated: Value,
}

/// GET /checkout - Bookings of the authenticated identity
pub async fn list(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> Result<Json<Vec<Document>>, AppError> {
    let scope = check_ownership(&identity, params.email.as_deref())?;

    Ok(Json(find_checkouts(&state.pool, &scope).await?))
}

/// POST /checkout
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> Result<Json<InsertOneResult>, AppError> {
    let Value::Object(doc) = body else {
        return Err(AppError::BadRequest(
            "checkout must be a JSON object".to_string(),
        ));
    };

    Ok(Json(insert_checkout(&state.pool, doc).await?))
}

/// DELETE /checkout/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    Ok(Json(delete_checkout(&state.pool, &id).await?))
}

/// PUT /checkout/{id} - Set the `isUpdated` flag, upserting unknown ids
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateInput>, AppError>,
) -> Result<Json<UpdateResult>, AppError> {
    Ok(Json(
        set_checkout_updated(&state.pool, &id, input.is_updated).await?,
    ))
}
