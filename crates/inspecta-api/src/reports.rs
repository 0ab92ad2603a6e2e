//! Handlers for `/reports`: the Show Visualizations action.
//!
//! Only the data is served; chart rendering is the client's job.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use inspecta_core::{
  report::{Report, ReportOutput},
  store::ReportStore,
};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ReportInfo {
  pub report: Report,
  pub title:  &'static str,
}

/// `GET /reports`
pub async fn list() -> Json<Vec<ReportInfo>> {
  Json(
    Report::ALL
      .into_iter()
      .map(|report| ReportInfo { report, title: report.title() })
      .collect(),
  )
}

/// `GET /reports/:name`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<ReportOutput>, ApiError>
where
  S: ReportStore,
{
  let report: Report = name
    .parse()
    .map_err(|e: inspecta_core::UnknownReport| ApiError::NotFound(e.to_string()))?;
  let output = store.run_report(report).await.map_err(ApiError::store)?;
  Ok(Json(output))
}
