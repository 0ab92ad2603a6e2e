//! Handlers for `/tables` endpoints: the Read, Create, Update and Delete
//! actions over any recognized table.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/tables` | The fixed table list |
//! | `GET`    | `/tables/:table/schema` | Columns, types, key column |
//! | `GET`    | `/tables/:table/form` | Blank create form |
//! | `GET`    | `/tables/:table/keys` | Key values for update/delete selection |
//! | `GET`    | `/tables/:table/rows` | Every row |
//! | `POST`   | `/tables/:table/rows` | Body: column → value; returns 201 + key |
//! | `GET`    | `/tables/:table/rows/:key` | Row plus pre-filled update form |
//! | `PUT`    | `/tables/:table/rows/:key` | Body: column → value |
//! | `DELETE` | `/tables/:table/rows/:key` | 204 even if the row is gone |
//!
//! The schema is described afresh on every request.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use inspecta_core::{
  record::{FieldValue, FieldValues, FormField, Record, RecordSet, form_fields},
  schema::{TableName, TableSchema},
  store::TableStore,
};
use serde::Serialize;

use crate::error::ApiError;

async fn describe<S: TableStore>(store: &S, table: &str) -> Result<TableSchema, ApiError> {
  store.describe(table).await.map_err(ApiError::store)
}

/// Interpret a key path segment according to the key column's type.
fn parse_key(schema: &TableSchema, raw: &str) -> Result<FieldValue, ApiError> {
  let col = schema.primary_key_column().ok_or_else(|| {
    ApiError::BadRequest(format!("{} has no key column", schema.table))
  })?;
  col.data_type.parse_value(raw).ok_or_else(|| {
    ApiError::BadRequest(format!("{raw:?} is not a valid {}", col.name))
  })
}

// ─── Listing ──────────────────────────────────────────────────────────────────

/// `GET /tables`
pub async fn list() -> Json<Vec<TableName>> { Json(TableName::ALL.to_vec()) }

/// `GET /tables/:table/schema`
pub async fn schema<S>(
  State(store): State<Arc<S>>,
  Path(table): Path<String>,
) -> Result<Json<TableSchema>, ApiError>
where
  S: TableStore,
{
  Ok(Json(describe(store.as_ref(), &table).await?))
}

/// `GET /tables/:table/keys`
pub async fn keys<S>(
  State(store): State<Arc<S>>,
  Path(table): Path<String>,
) -> Result<Json<Vec<FieldValue>>, ApiError>
where
  S: TableStore,
{
  let schema = describe(store.as_ref(), &table).await?;
  let keys = store.primary_keys(&schema).await.map_err(ApiError::store)?;
  Ok(Json(keys))
}

/// `GET /tables/:table/rows`
pub async fn read_all<S>(
  State(store): State<Arc<S>>,
  Path(table): Path<String>,
) -> Result<Json<RecordSet>, ApiError>
where
  S: TableStore,
{
  let schema = describe(store.as_ref(), &table).await?;
  let rows = store.read_all(&schema).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `GET /tables/:table/form`
pub async fn create_form<S>(
  State(store): State<Arc<S>>,
  Path(table): Path<String>,
) -> Result<Json<Vec<FormField>>, ApiError>
where
  S: TableStore,
{
  let schema = describe(store.as_ref(), &table).await?;
  Ok(Json(form_fields(&schema, None)))
}

#[derive(Debug, Serialize)]
pub struct Created {
  pub key: FieldValue,
}

/// `POST /tables/:table/rows`: returns 201 + the store-assigned key.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(table): Path<String>,
  Json(values): Json<FieldValues>,
) -> Result<impl IntoResponse, ApiError>
where
  S: TableStore,
{
  let schema = describe(store.as_ref(), &table).await?;
  let key = store.create(&schema, values).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(Created { key })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// A row together with the update form pre-filled from it.
#[derive(Debug, Serialize)]
pub struct EditableRow {
  pub record: Record,
  pub form:   Vec<FormField>,
}

/// `GET /tables/:table/rows/:key`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((table, raw_key)): Path<(String, String)>,
) -> Result<Json<EditableRow>, ApiError>
where
  S: TableStore,
{
  let schema = describe(store.as_ref(), &table).await?;
  let key = parse_key(&schema, &raw_key)?;
  let record = store
    .get_row(&schema, &key)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("no row in {table} with key {key}")))?;
  let form = form_fields(&schema, Some(&record));
  Ok(Json(EditableRow { record, form }))
}

/// `PUT /tables/:table/rows/:key`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path((table, raw_key)): Path<(String, String)>,
  Json(values): Json<FieldValues>,
) -> Result<StatusCode, ApiError>
where
  S: TableStore,
{
  let schema = describe(store.as_ref(), &table).await?;
  let key = parse_key(&schema, &raw_key)?;
  store
    .update(&schema, &key, values)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /tables/:table/rows/:key`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path((table, raw_key)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: TableStore,
{
  let schema = describe(store.as_ref(), &table).await?;
  let key = parse_key(&schema, &raw_key)?;
  store.delete(&schema, &key).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
