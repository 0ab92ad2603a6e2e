//! Handler for `GET /`: the Home action.

use axum::Json;
use inspecta_core::{action::Action, schema::TableName};
use serde::Serialize;

pub const TITLE: &str = "Restaurant Inspection Management";

#[derive(Debug, Serialize)]
pub struct ActionInfo {
  pub action:      Action,
  pub label:       &'static str,
  /// Whether the action applies to the selected table.
  pub table_scope: bool,
}

#[derive(Debug, Serialize)]
pub struct Home {
  pub title:   &'static str,
  pub tables:  Vec<TableName>,
  pub actions: Vec<ActionInfo>,
}

/// `GET /`
pub async fn handler() -> Json<Home> {
  Json(Home {
    title:   TITLE,
    tables:  TableName::ALL.to_vec(),
    actions: Action::ALL
      .into_iter()
      .map(|action| ActionInfo {
        action,
        label: action.label(),
        table_scope: action.is_table_action(),
      })
      .collect(),
  })
}
