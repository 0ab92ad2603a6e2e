//! Row values, record sets and form descriptions.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
  error::CrudError,
  schema::{TableSchema, Widget},
};

// ─── Values ──────────────────────────────────────────────────────────────────

/// A single cell value. Serialises as the bare JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldValue::Null => f.write_str("NULL"),
      FieldValue::Integer(i) => write!(f, "{i}"),
      FieldValue::Real(r) => write!(f, "{r}"),
      FieldValue::Text(s) => f.write_str(s),
    }
  }
}

impl From<i64> for FieldValue {
  fn from(v: i64) -> Self { FieldValue::Integer(v) }
}

impl From<f64> for FieldValue {
  fn from(v: f64) -> Self { FieldValue::Real(v) }
}

impl From<&str> for FieldValue {
  fn from(v: &str) -> Self { FieldValue::Text(v.to_owned()) }
}

impl From<String> for FieldValue {
  fn from(v: String) -> Self { FieldValue::Text(v) }
}

/// User-submitted values keyed by column name.
pub type FieldValues = BTreeMap<String, FieldValue>;

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub BTreeMap<String, FieldValue>);

impl Record {
  pub fn get(&self, column: &str) -> Option<&FieldValue> { self.0.get(column) }
}

/// Rows of a table (or a report) in the order the store returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
  pub columns: Vec<String>,
  pub rows:    Vec<Record>,
}

impl RecordSet {
  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  /// Values of `column` across all rows, skipping rows that lack it.
  pub fn column_values<'a>(
    &'a self,
    column: &'a str,
  ) -> impl Iterator<Item = &'a FieldValue> + 'a {
    self.rows.iter().filter_map(move |r| r.get(column))
  }
}

// ─── Forms ───────────────────────────────────────────────────────────────────

/// One input of a create/update form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
  pub label:   String,
  pub widget:  Widget,
  pub initial: FieldValue,
}

/// Describe the editable columns of `schema` as form inputs.
///
/// With no `record` the inputs start at type defaults (create); otherwise
/// they start at the record's current values (update).
pub fn form_fields(schema: &TableSchema, record: Option<&Record>) -> Vec<FormField> {
  schema
    .editable_columns()
    .map(|col| FormField {
      label:   col.name.clone(),
      widget:  col.data_type.widget(),
      initial: record
        .and_then(|r| r.get(&col.name).cloned())
        .unwrap_or_else(|| col.data_type.default_value()),
    })
    .collect()
}

/// Check that `values` names exactly the editable columns of `schema`.
///
/// Unknown columns (including the primary key) are reported before
/// missing ones.
pub fn check_field_values(
  schema: &TableSchema,
  values: &FieldValues,
) -> Result<(), CrudError> {
  if let Some(name) = values
    .keys()
    .find(|k| schema.column(k).is_none() || **k == schema.primary_key)
  {
    return Err(CrudError::UnknownColumn(name.clone()));
  }
  if let Some(col) = schema
    .editable_columns()
    .find(|c| !values.contains_key(&c.name))
  {
    return Err(CrudError::MissingField(col.name.clone()));
  }
  Ok(())
}
