//! Schema introspection and generic CRUD over the dataset tables.
//!
//! Statements are assembled at runtime from a [`TableSchema`]. The table
//! identifier comes from the closed `TableName` enumeration and column
//! identifiers from `pragma_table_info`, so neither is ever raw user text.
//! Every value is bound positionally.

use inspecta_core::{
  error::CrudError,
  record::{FieldValue, FieldValues, Record, RecordSet, check_field_values},
  schema::{Column, ColumnType, TableName, TableSchema},
  store::TableStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result, SqliteStore,
  encode::{collect_record_set, decode_row, decode_value, encode_value, quote_ident},
};

/// One row of `pragma_table_info`.
struct RawColumn {
  name:     String,
  declared: String,
  /// 1-based position within the primary key, 0 if not part of it.
  pk:       i64,
}

/// Pick the key column: the store's own single-column primary key, falling
/// back to the first declared column for tables without one.
fn resolve_primary_key(table: TableName, raw: &[RawColumn]) -> Option<String> {
  let declared: Vec<&RawColumn> = raw.iter().filter(|c| c.pk > 0).collect();
  if let [only] = declared.as_slice() {
    return Some(only.name.clone());
  }

  let first = raw.first()?;
  tracing::warn!(
    %table,
    key_columns = declared.len(),
    fallback = %first.name,
    "no single-column primary key declared; using first column"
  );
  Some(first.name.clone())
}

impl TableStore for SqliteStore {
  type Error = crate::Error;

  async fn describe(&self, table: &str) -> Result<TableSchema> {
    let table = table.parse::<TableName>().inspect_err(|e| {
      tracing::error!(error = %e, "table outside the fixed enumeration requested");
    })?;
    let name = table.as_str();

    let raw: Vec<RawColumn> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![name], |row| {
            Ok(RawColumn {
              name:     row.get(0)?,
              declared: row.get(1)?,
              pk:       row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let Some(primary_key) = resolve_primary_key(table, &raw) else {
      tracing::error!(%table, "configured table is missing from the database");
      return Err(CrudError::UnknownTable(name.to_owned()).into());
    };

    let columns = raw
      .into_iter()
      .map(|c| Column {
        data_type: ColumnType::from_declared(&c.declared),
        name:      c.name,
      })
      .collect();

    Ok(TableSchema { table, columns, primary_key })
  }

  async fn read_all(&self, schema: &TableSchema) -> Result<RecordSet> {
    let sql = format!("SELECT * FROM {}", quote_ident(schema.table.as_str()));

    let set = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        Ok(collect_record_set(&mut stmt, [])?)
      })
      .await?;

    Ok(set)
  }

  async fn get_row(&self, schema: &TableSchema, key: &FieldValue) -> Result<Option<Record>> {
    let sql = format!(
      "SELECT * FROM {} WHERE {} = ?1",
      quote_ident(schema.table.as_str()),
      quote_ident(&schema.primary_key),
    );
    let key = encode_value(key);

    let record = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> =
          stmt.column_names().into_iter().map(str::to_owned).collect();
        Ok(
          stmt
            .query_row(rusqlite::params![key], |row| decode_row(row, &columns))
            .optional()?,
        )
      })
      .await?;

    Ok(record)
  }

  async fn primary_keys(&self, schema: &TableSchema) -> Result<Vec<FieldValue>> {
    let sql = format!(
      "SELECT {} FROM {}",
      quote_ident(&schema.primary_key),
      quote_ident(schema.table.as_str()),
    );

    let keys = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let keys = stmt
          .query_map([], |row| Ok(decode_value(row.get_ref(0)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
      })
      .await?;

    Ok(keys)
  }

  async fn create(&self, schema: &TableSchema, values: FieldValues) -> Result<FieldValue> {
    check_field_values(schema, &values)?;

    let table = quote_ident(schema.table.as_str());
    let insert = if values.is_empty() {
      format!("INSERT INTO {table} DEFAULT VALUES")
    } else {
      let cols = values.keys().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ");
      let params = (1..=values.len()).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ");
      format!("INSERT INTO {table} ({cols}) VALUES ({params})")
    };
    // Read the key back through rowid so non-alias keys work too.
    let read_key = format!(
      "SELECT {} FROM {table} WHERE rowid = ?1",
      quote_ident(&schema.primary_key),
    );
    let bound: Vec<_> = values.values().map(encode_value).collect();

    let key = self
      .conn
      .call(move |conn| {
        conn.execute(&insert, rusqlite::params_from_iter(bound))?;
        let rowid = conn.last_insert_rowid();
        let key = conn.query_row(&read_key, rusqlite::params![rowid], |row| {
          Ok(decode_value(row.get_ref(0)?))
        })?;
        Ok(key)
      })
      .await?;

    tracing::info!(table = %schema.table, %key, "row created");
    Ok(key)
  }

  async fn update(
    &self,
    schema: &TableSchema,
    key: &FieldValue,
    values: FieldValues,
  ) -> Result<()> {
    check_field_values(schema, &values)?;

    if self.get_row(schema, key).await?.is_none() {
      return Err(
        CrudError::NotFound {
          table: schema.table.to_string(),
          key:   key.to_string(),
        }
        .into(),
      );
    }
    if values.is_empty() {
      return Ok(());
    }

    let assignments = values
      .keys()
      .enumerate()
      .map(|(i, c)| format!("{} = ?{}", quote_ident(c), i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE {} SET {assignments} WHERE {} = ?{}",
      quote_ident(schema.table.as_str()),
      quote_ident(&schema.primary_key),
      values.len() + 1,
    );
    let mut bound: Vec<_> = values.values().map(encode_value).collect();
    bound.push(encode_value(key));

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(bound))?;
        Ok(())
      })
      .await?;

    tracing::info!(table = %schema.table, %key, "row updated");
    Ok(())
  }

  async fn delete(&self, schema: &TableSchema, key: &FieldValue) -> Result<()> {
    // No existence check: deleting a missing key is a silent no-op.
    let sql = format!(
      "DELETE FROM {} WHERE {} = ?1",
      quote_ident(schema.table.as_str()),
      quote_ident(&schema.primary_key),
    );
    let bound = encode_value(key);

    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![bound])?))
      .await?;

    tracing::info!(table = %schema.table, %key, removed, "row delete issued");
    Ok(())
  }
}
