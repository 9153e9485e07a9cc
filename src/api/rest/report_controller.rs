use crate::api::rest::{ApiError, ApiResult, AppState};
use crate::db::models::report_models::{
    ChecklistSubmission, Report, ReportFilters, ReportPatch, ReportStatus, Shift, SystemType,
};
use crate::services::reports::ReportListItem;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Query parameters for checklist submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitParams {
    pub user_id: Option<String>,
}

/// Query parameters for report listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub system_type: Option<SystemType>,
    pub status: Option<ReportStatus>,
    pub date: Option<String>,
    pub user_id: Option<i64>,
}

/// Fixed checkpoint catalog for one system type
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistCatalog {
    pub system_type: SystemType,
    pub checkpoints: Vec<&'static str>,
    pub shifts: Vec<Shift>,
}

fn submitter_id(params: &SubmitParams) -> Result<i64, ApiError> {
    let raw = params
        .user_id
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("User ID is required"))?;
    raw.parse()
        .map_err(|_| ApiError::bad_request("User ID must be numeric"))
}

async fn submit(
    state: AppState,
    system_type: SystemType,
    params: SubmitParams,
    payload: Result<Json<ChecklistSubmission>, JsonRejection>,
) -> ApiResult<Json<Report>> {
    let submitted_by = submitter_id(&params)?;
    let Json(submission) = payload.map_err(|_| ApiError::bad_request("Invalid request data"))?;

    let report = state
        .report_service
        .submit(system_type, submission, submitted_by)
        .await?;
    Ok(Json(report))
}

/// Submit an electrical inspection checklist
pub async fn submit_electrical(
    State(state): State<AppState>,
    Query(params): Query<SubmitParams>,
    payload: Result<Json<ChecklistSubmission>, JsonRejection>,
) -> ApiResult<Json<Report>> {
    submit(state, SystemType::Electrical, params, payload).await
}

/// Submit an AC inspection checklist
pub async fn submit_ac(
    State(state): State<AppState>,
    Query(params): Query<SubmitParams>,
    payload: Result<Json<ChecklistSubmission>, JsonRejection>,
) -> ApiResult<Json<Report>> {
    submit(state, SystemType::Ac, params, payload).await
}

/// List reports. A userId filter returns only that submitter's reports
/// and ignores the other filters.
pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<ReportListItem>>> {
    let filters = ReportFilters {
        system_type: params.system_type,
        status: params.status,
        date: params.date,
    };

    let reports = state.report_service.list(filters, params.user_id).await;
    Ok(Json(reports))
}

/// Get a single report
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Report>> {
    let report = state.report_service.get(id).await?;
    Ok(Json(report))
}

/// Update a report: supervisor/manager review and approval, the manual
/// requires_attention override, or a plain remarks patch
pub async fn update_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<ReportPatch>, JsonRejection>,
) -> ApiResult<Json<Report>> {
    let Json(patch) = payload.map_err(|_| ApiError::bad_request("Invalid request data"))?;

    let report = state.report_service.patch(id, patch).await?;
    Ok(Json(report))
}

/// Serve the fixed checkpoint labels so clients and the spreadsheet
/// target share one source of truth
pub async fn get_checklist_catalog(
    Path(system_type): Path<SystemType>,
) -> ApiResult<Json<ChecklistCatalog>> {
    Ok(Json(ChecklistCatalog {
        system_type,
        checkpoints: system_type.checkpoint_labels().to_vec(),
        shifts: vec![Shift::Morning, Shift::Evening, Shift::Night],
    }))
}
