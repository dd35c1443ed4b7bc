//! Error types for relquery-server

use thiserror::Error;

use crate::catalog::CatalogError;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors raised while resolving or executing a query.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("unknown field '{field}' on {entity}")]
    UnknownField { entity: String, field: String },

    #[error("relationship '{name}' not found on {entity}")]
    RelationshipNotFound { entity: String, name: String },

    #[error("unsupported predicate on '{field}': {reason}")]
    UnsupportedPredicate { field: String, reason: String },

    #[error("type mismatch on '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Raw statement rejected or failed in the database.
    #[error("query error: {0}")]
    Query(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl GatewayError {
    /// Stable machine-readable kind, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "unknown_entity",
            Self::UnknownField { .. } => "unknown_field",
            Self::RelationshipNotFound { .. } => "relationship_not_found",
            Self::UnsupportedPredicate { .. } => "unsupported_predicate",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::Query(_) => "query_error",
            Self::Storage(_) => "storage_error",
            Self::Catalog(_) => "catalog_error",
        }
    }

    /// True when the caller's descriptor is at fault rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntity(_)
                | Self::UnknownField { .. }
                | Self::RelationshipNotFound { .. }
                | Self::UnsupportedPredicate { .. }
                | Self::TypeMismatch { .. }
        )
    }

    pub(crate) fn unknown_field(entity: &str, field: &str) -> Self {
        Self::UnknownField {
            entity: entity.to_owned(),
            field: field.to_owned(),
        }
    }

    pub(crate) fn unsupported(field: &str, reason: impl Into<String>) -> Self {
        Self::UnsupportedPredicate {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_errors_are_client_errors() {
        assert!(GatewayError::unknown_field("Product", "colour").is_client_error());
        assert!(GatewayError::unsupported("price", "regex").is_client_error());
        assert!(!GatewayError::Query("bad".into()).is_client_error());
    }

    #[test]
    fn error_display() {
        let err = GatewayError::RelationshipNotFound {
            entity: "Product".into(),
            name: "supplier".into(),
        };
        assert_eq!(err.to_string(), "relationship 'supplier' not found on Product");
        assert_eq!(err.kind(), "relationship_not_found");
    }
}
