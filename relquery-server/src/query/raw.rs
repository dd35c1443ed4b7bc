//! Parameterized raw statements
//!
//! The escape hatch for SQL the descriptor model cannot express. Statement
//! text is `&'static str`, so it has to be written into the program and
//! cannot be assembled from request data; values only ever travel as bound
//! `?` parameters.

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::{GatewayError, Result};

use super::{Record, Value};

/// A fixed SQL statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatement {
    sql: &'static str,
    params: Vec<Value>,
}

impl RawStatement {
    pub fn new(sql: &'static str) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Bind the next `?` placeholder.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &'static str {
        self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Check that every placeholder has exactly one bound value.
    pub fn validate(&self) -> Result<()> {
        let expected = count_placeholders(self.sql).map_err(GatewayError::Query)?;
        if expected != self.params.len() {
            return Err(GatewayError::Query(format!(
                "statement expects {} parameters, {} bound",
                expected,
                self.params.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn to_query(&self) -> Query<'static, Sqlite, SqliteArguments<'static>> {
        self.params
            .iter()
            .fold(sqlx::query(self.sql), |query, value| value.bind_to(query))
    }
}

/// Count positional `?` placeholders outside literals, quoted identifiers
/// and comments. Numbered and named placeholders are rejected.
fn count_placeholders(sql: &str) -> std::result::Result<usize, String> {
    let mut count = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                for d in chars.by_ref() {
                    if d == c {
                        break;
                    }
                }
            }
            '[' => {
                for d in chars.by_ref() {
                    if d == ']' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for d in chars.by_ref() {
                    if prev == '*' && d == '/' {
                        break;
                    }
                    prev = d;
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                for d in chars.by_ref() {
                    if d == '\n' {
                        break;
                    }
                }
            }
            '?' => {
                if chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                    return Err("numbered placeholders are not supported, use '?'".into());
                }
                count += 1;
            }
            ':' | '@' | '$'
                if chars
                    .peek()
                    .is_some_and(|d| d.is_ascii_alphabetic() || *d == '_') =>
            {
                return Err(format!(
                    "named placeholders ('{c}name') are not supported, use '?'"
                ));
            }
            _ => {}
        }
    }
    Ok(count)
}

/// Decode a row by the storage type of each value.
pub(crate) fn decode_row(row: &SqliteRow) -> Result<Record> {
    let mut record = Record::with_capacity(row.len());
    for column in row.columns() {
        let idx = column.ordinal();
        let raw = row.try_get_raw(idx)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            let type_name = raw.type_info().name().to_owned();
            match type_name.as_str() {
                "INTEGER" => Value::Integer(row.try_get(idx)?),
                "REAL" => Value::Real(row.try_get(idx)?),
                "TEXT" => Value::Text(row.try_get(idx)?),
                "BOOLEAN" => Value::Boolean(row.try_get(idx)?),
                other => {
                    return Err(GatewayError::Query(format!(
                        "column '{}' has unsupported type {}",
                        column.name(),
                        other
                    )))
                }
            }
        };
        record.push(column.name(), value);
    }
    Ok(record)
}
