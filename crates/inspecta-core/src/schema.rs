//! Table schema descriptions.
//!
//! A [`TableSchema`] is derived from store metadata on every request and is
//! never cached. Table identifiers come only from the closed [`TableName`]
//! enumeration, which is what makes it safe for storage backends to
//! interpolate them into SQL text. Do not add a variant built from
//! user-supplied text without an allow-list check in front of it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::CrudError, record::FieldValue};

// ─── Table names ─────────────────────────────────────────────────────────────

/// The four tables of the inspection dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableName {
  Establishment,
  Employee,
  Inspection,
  Violation,
}

impl TableName {
  pub const ALL: [TableName; 4] = [
    TableName::Establishment,
    TableName::Employee,
    TableName::Inspection,
    TableName::Violation,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      TableName::Establishment => "establishment",
      TableName::Employee => "employee",
      TableName::Inspection => "inspection",
      TableName::Violation => "violation",
    }
  }
}

impl fmt::Display for TableName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TableName {
  type Err = CrudError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    TableName::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| CrudError::UnknownTable(s.to_owned()))
  }
}

// ─── Column types ────────────────────────────────────────────────────────────

/// Declared column type, reduced to the three kinds the forms distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
  Integer,
  Real,
  Text,
}

impl ColumnType {
  /// Map a declared SQL type to a column type using SQLite's affinity
  /// rules. Anything that is neither integral nor floating is text.
  pub fn from_declared(declared: &str) -> Self {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("INT") {
      ColumnType::Integer
    } else if ["REAL", "FLOA", "DOUB"].iter().any(|k| upper.contains(k)) {
      ColumnType::Real
    } else {
      ColumnType::Text
    }
  }

  pub fn widget(self) -> Widget {
    match self {
      ColumnType::Integer => Widget::IntegerStepper,
      ColumnType::Real => Widget::DecimalStepper,
      ColumnType::Text => Widget::TextInput,
    }
  }

  /// The value a blank create form starts with.
  pub fn default_value(self) -> FieldValue {
    match self {
      ColumnType::Integer => FieldValue::Integer(0),
      ColumnType::Real => FieldValue::Real(0.0),
      ColumnType::Text => FieldValue::Text(String::new()),
    }
  }

  /// Parse a raw key (e.g. a URL path segment) as a value of this type.
  pub fn parse_value(self, raw: &str) -> Option<FieldValue> {
    match self {
      ColumnType::Integer => raw.parse().ok().map(FieldValue::Integer),
      ColumnType::Real => raw.parse().ok().map(FieldValue::Real),
      ColumnType::Text => Some(FieldValue::Text(raw.to_owned())),
    }
  }
}

/// Input widget a presentation layer should render for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
  IntegerStepper,
  DecimalStepper,
  TextInput,
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
  pub name:      String,
  pub data_type: ColumnType,
}

/// Ordered column list plus the column used as the row key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
  pub table:       TableName,
  pub columns:     Vec<Column>,
  pub primary_key: String,
}

impl TableSchema {
  pub fn column(&self, name: &str) -> Option<&Column> {
    self.columns.iter().find(|c| c.name == name)
  }

  pub fn primary_key_column(&self) -> Option<&Column> {
    self.column(&self.primary_key)
  }

  /// Every column except the primary key, in declared order.
  pub fn editable_columns(&self) -> impl Iterator<Item = &Column> {
    self.columns.iter().filter(|c| c.name != self.primary_key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_names_parse() {
    assert_eq!("violation".parse::<TableName>(), Ok(TableName::Violation));
    assert_eq!(
      "users".parse::<TableName>(),
      Err(CrudError::UnknownTable("users".into()))
    );
    assert!("Establishment".parse::<TableName>().is_err());
  }

  #[test]
  fn declared_types_follow_affinity() {
    assert_eq!(ColumnType::from_declared("INTEGER"), ColumnType::Integer);
    assert_eq!(ColumnType::from_declared("bigint"), ColumnType::Integer);
    assert_eq!(ColumnType::from_declared("REAL"), ColumnType::Real);
    assert_eq!(ColumnType::from_declared("double precision"), ColumnType::Real);
    assert_eq!(ColumnType::from_declared("FLOAT"), ColumnType::Real);
    assert_eq!(ColumnType::from_declared("TEXT"), ColumnType::Text);
    assert_eq!(ColumnType::from_declared("DATE"), ColumnType::Text);
    assert_eq!(ColumnType::from_declared(""), ColumnType::Text);
  }

  #[test]
  fn widgets_by_type() {
    assert_eq!(ColumnType::Integer.widget(), Widget::IntegerStepper);
    assert_eq!(ColumnType::Real.widget(), Widget::DecimalStepper);
    assert_eq!(ColumnType::Text.widget(), Widget::TextInput);
  }

  #[test]
  fn parse_key_values() {
    assert_eq!(ColumnType::Integer.parse_value("42"), Some(FieldValue::Integer(42)));
    assert_eq!(ColumnType::Integer.parse_value("4.2"), None);
    assert_eq!(ColumnType::Real.parse_value("4.5"), Some(FieldValue::Real(4.5)));
    assert_eq!(
      ColumnType::Text.parse_value("abc"),
      Some(FieldValue::Text("abc".into()))
    );
  }

  #[test]
  fn editable_columns_skip_primary_key() {
    let schema = TableSchema {
      table:       TableName::Employee,
      columns:     vec![
        Column { name: "employee_id".into(), data_type: ColumnType::Integer },
        Column { name: "first_name".into(),  data_type: ColumnType::Text },
        Column { name: "salary".into(),      data_type: ColumnType::Integer },
      ],
      primary_key: "employee_id".into(),
    };
    let names: Vec<_> = schema.editable_columns().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["first_name", "salary"]);
  }
}
