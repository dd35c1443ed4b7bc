//! Scalar values carried by records and predicates

use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::QueryBuilder;

use crate::catalog::FieldType;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert to a value storable in a field of type `ty`.
    ///
    /// Integers widen to reals; nothing else converts and `Null` never matches.
    pub fn coerce_to(&self, ty: FieldType) -> Option<Value> {
        match (self, ty) {
            (Self::Integer(v), FieldType::Integer) => Some(Self::Integer(*v)),
            (Self::Integer(v), FieldType::Real) => Some(Self::Real(*v as f64)),
            (Self::Real(v), FieldType::Real) => Some(Self::Real(*v)),
            (Self::Text(v), FieldType::Text) => Some(Self::Text(v.clone())),
            (Self::Boolean(v), FieldType::Boolean) => Some(Self::Boolean(*v)),
            _ => None,
        }
    }

    /// Append this value to a builder as a bound parameter.
    pub(crate) fn push_bind(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Self::Null => builder.push_bind(None::<i64>),
            Self::Boolean(v) => builder.push_bind(*v),
            Self::Integer(v) => builder.push_bind(*v),
            Self::Real(v) => builder.push_bind(*v),
            Self::Text(v) => builder.push_bind(v.clone()),
        };
    }

    /// Bind this value as the next positional parameter of `query`.
    pub(crate) fn bind_to<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        match self {
            Self::Null => query.bind(None::<i64>),
            Self::Boolean(v) => query.bind(*v),
            Self::Integer(v) => query.bind(*v),
            Self::Real(v) => query.bind(*v),
            Self::Text(v) => query.bind(v.clone()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_to_real() {
        assert_eq!(Value::Integer(3).coerce_to(FieldType::Real), Some(Value::Real(3.0)));
        assert_eq!(Value::Real(3.5).coerce_to(FieldType::Integer), None);
    }

    #[test]
    fn null_never_coerces() {
        for ty in [FieldType::Integer, FieldType::Real, FieldType::Text, FieldType::Boolean] {
            assert_eq!(Value::Null.coerce_to(ty), None);
        }
    }

    #[test]
    fn deserializes_untagged_json() {
        let values: Vec<Value> =
            serde_json::from_str(r#"[null, true, 11, 9.99, "Tools"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Boolean(true),
                Value::Integer(11),
                Value::Real(9.99),
                Value::Text("Tools".into()),
            ]
        );
    }

    #[test]
    fn serializes_as_plain_json_scalars() {
        let json =
            serde_json::to_string(&vec![Value::Null, Value::Real(9.99), Value::from("a")])
                .unwrap();
        assert_eq!(json, r#"[null,9.99,"a"]"#);
    }
}
