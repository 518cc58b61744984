use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::query::{
    self, Document, InsertOneResult, ServiceFilter, SortOrder, find_service_by_id, find_services,
};
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// GET /services - Services matching `search` in the title, sorted by price
pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, AppError>,
) -> Result<Json<Vec<Document>>, AppError> {
    let filter = ServiceFilter {
        sort: SortOrder::from_param(params.sort.as_deref()),
        search: params.search,
    };

    tracing::debug!(?filter, "Listing services");

    Ok(Json(find_services(&state.pool, &filter).await?))
}

/// GET /services/{id} - Summary fields of a single service, `null` when unknown
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, AppError> {
    Ok(Json(find_service_by_id(&state.pool, &id).await?))
}

/// POST /services
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<Value>, AppError>,
) -> Result<Json<InsertOneResult>, AppError> {
    let Value::Object(doc) = body else {
        return Err(AppError::BadRequest(
            "service must be a JSON object".to_string(),
        ));
    };

    Ok(Json(query::insert_service(&state.pool, doc).await?))
}
