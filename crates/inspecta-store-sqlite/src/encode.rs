//! Conversions between [`FieldValue`] and SQLite values, plus identifier
//! quoting for the statements built at runtime.

use std::collections::BTreeMap;

use inspecta_core::record::{FieldValue, Record, RecordSet};
use rusqlite::types::{Value, ValueRef};

// ─── Values ──────────────────────────────────────────────────────────────────

pub fn encode_value(v: &FieldValue) -> Value {
  match v {
    FieldValue::Null => Value::Null,
    FieldValue::Integer(i) => Value::Integer(*i),
    FieldValue::Real(r) => Value::Real(*r),
    FieldValue::Text(s) => Value::Text(s.clone()),
  }
}

/// Blobs have no form widget; they surface as lossy UTF-8 text.
pub fn decode_value(v: ValueRef<'_>) -> FieldValue {
  match v {
    ValueRef::Null => FieldValue::Null,
    ValueRef::Integer(i) => FieldValue::Integer(i),
    ValueRef::Real(r) => FieldValue::Real(r),
    ValueRef::Text(t) | ValueRef::Blob(t) => {
      FieldValue::Text(String::from_utf8_lossy(t).into_owned())
    }
  }
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Double-quote an SQL identifier.
///
/// Only ever applied to table names from `TableName` and column names read
/// back from `pragma_table_info`. Values are always bound, never quoted.
pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Run a prepared statement and collect every row, keyed by result column.
pub fn collect_record_set<P: rusqlite::Params>(
  stmt: &mut rusqlite::Statement<'_>,
  params: P,
) -> rusqlite::Result<RecordSet> {
  let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();

  let mut rows = stmt.query(params)?;
  let mut out = Vec::new();
  while let Some(row) = rows.next()? {
    out.push(decode_row(row, &columns)?);
  }

  Ok(RecordSet { columns, rows: out })
}

pub fn decode_row(row: &rusqlite::Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
  let mut values = BTreeMap::new();
  for (i, name) in columns.iter().enumerate() {
    values.insert(name.clone(), decode_value(row.get_ref(i)?));
  }
  Ok(Record(values))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quotes_embedded_quotes() {
    assert_eq!(quote_ident("name"), "\"name\"");
    assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
  }

  #[test]
  fn blob_decodes_as_text() {
    assert_eq!(
      decode_value(ValueRef::Blob(b"abc")),
      FieldValue::Text("abc".into())
    );
    assert_eq!(decode_value(ValueRef::Integer(3)), FieldValue::Integer(3));
  }
}
