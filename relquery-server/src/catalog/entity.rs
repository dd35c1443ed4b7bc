//! Entity and field definitions

use serde::{Deserialize, Serialize};

/// Name of the identifier column every entity carries.
pub const PRIMARY_KEY: &str = "id";

/// Storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Text => "text",
            Self::Boolean => "boolean",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

/// A typed column on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// A queryable record type backed by one table.
#[derive(Debug, Clone, Serialize)]
pub struct EntityDef {
    pub name: &'static str,
    pub table: &'static str,
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create an entity with its integer `id` field already declared.
    pub fn new(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            table,
            fields: vec![FieldDef {
                name: PRIMARY_KEY,
                ty: FieldType::Integer,
            }],
        }
    }

    /// Declare another field, in output order.
    pub fn field(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(FieldDef { name, ty });
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
