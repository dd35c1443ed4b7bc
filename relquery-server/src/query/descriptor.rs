//! Declarative query descriptors
//!
//! A descriptor names things by string so it can arrive as JSON; it only
//! becomes executable once [`Catalog::resolve`](crate::Catalog::resolve)
//! turns it into a [`Plan`](super::Plan).

use serde::{Deserialize, Serialize};

use crate::catalog::FieldType;

use super::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// Only root rows with a matching related row.
    #[default]
    Inner,
    /// Every root row; related fields are null when nothing matches.
    #[serde(alias = "outer", alias = "left")]
    LeftOuter,
}

impl JoinKind {
    pub(crate) fn sql(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

/// Follow one relationship from the root entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinPath {
    pub relationship: String,
    #[serde(default)]
    pub kind: JoinKind,
}

/// Comparison operators accepted in predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Contains,
}

impl Operator {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "lt" => Some(Self::Lt),
            "le" => Some(Self::Le),
            "gt" => Some(Self::Gt),
            "ge" => Some(Self::Ge),
            "contains" => Some(Self::Contains),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Contains => "contains",
        }
    }

    /// Whether the operator is meaningful for a field of type `ty`.
    pub fn supports(&self, ty: FieldType) -> bool {
        match self {
            Self::Eq | Self::Ne => true,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => ty.is_numeric(),
            Self::Contains => ty == FieldType::Text,
        }
    }
}

/// `field op value`, evaluated against the root entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: String,
    /// Kept as text so an unknown operator is reported as an unsupported
    /// predicate instead of a malformed body.
    pub op: String,
    pub value: Value,
}

/// What to fetch: root entity, optional join, optional filter, projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<JoinPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
    /// Projected keys; empty selects every root field then every joined field.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl QueryDescriptor {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            join: None,
            filter: None,
            fields: Vec::new(),
        }
    }

    pub fn join(mut self, relationship: impl Into<String>, kind: JoinKind) -> Self {
        self.join = Some(JoinPath {
            relationship: relationship.into(),
            kind,
        });
        self
    }

    pub fn inner_join(self, relationship: impl Into<String>) -> Self {
        self.join(relationship, JoinKind::Inner)
    }

    pub fn outer_join(self, relationship: impl Into<String>) -> Self {
        self.join(relationship, JoinKind::LeftOuter)
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.filter = Some(Predicate {
            field: field.into(),
            op: op.as_str().to_owned(),
            value: value.into(),
        });
        self
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_by_type() {
        assert!(Operator::Eq.supports(FieldType::Boolean));
        assert!(Operator::Gt.supports(FieldType::Real));
        assert!(!Operator::Gt.supports(FieldType::Text));
        assert!(Operator::Contains.supports(FieldType::Text));
        assert!(!Operator::Contains.supports(FieldType::Integer));
        assert_eq!(Operator::parse("regex"), None);
    }

    #[test]
    fn descriptor_from_json() {
        let descriptor: QueryDescriptor = serde_json::from_str(
            r#"{
                "entity": "Category",
                "join": {"relationship": "products", "kind": "outer"},
                "filter": {"field": "owner_id", "op": "eq", "value": 11},
                "fields": ["name", "products__name"]
            }"#,
        )
        .unwrap();

        let expected = QueryDescriptor::new("Category")
            .outer_join("products")
            .filter("owner_id", Operator::Eq, 11_i64)
            .select(["name", "products__name"]);
        assert_eq!(descriptor, expected);
    }

    #[test]
    fn join_kind_defaults_to_inner() {
        let path: JoinPath = serde_json::from_str(r#"{"relationship": "category"}"#).unwrap();
        assert_eq!(path.kind, JoinKind::Inner);
    }
}
