//! Static relationship graph
//!
//! The catalog is built once at startup. Query descriptors are resolved
//! against it, so a bad join path or field name is caught before any SQL
//! is rendered, and every identifier that reaches SQL comes from here.

pub mod entity;
pub mod relationship;
pub mod storefront;

use std::collections::HashMap;

use thiserror::Error;

pub use entity::{EntityDef, FieldDef, FieldType, PRIMARY_KEY};
pub use relationship::{Cardinality, RelationshipDef};

/// Separator between a relationship name and a field in projected keys.
pub const PATH_SEPARATOR: &str = "__";

/// Catalog construction errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("entity '{0}' declared twice")]
    DuplicateEntity(String),

    #[error("relationship '{name}' declared twice on {entity}")]
    DuplicateRelationship { entity: String, name: String },

    #[error("foreign key references unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("foreign key column '{column}' is not an integer field of {entity}")]
    InvalidForeignKey { entity: String, column: String },

    #[error("relationship name '{0}' may not contain '__'")]
    InvalidRelationshipName(String),
}

/// The resolved entity set and its relationships.
#[derive(Debug, Clone)]
pub struct Catalog {
    entities: Vec<EntityDef>,
    index: HashMap<&'static str, usize>,
    relationships: Vec<RelationshipDef>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.index.get(name).map(|&i| &self.entities[i])
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.iter()
    }

    /// Look up a relationship by its name on the source entity.
    pub fn relationship(&self, from: &str, name: &str) -> Option<&RelationshipDef> {
        self.relationships
            .iter()
            .find(|r| r.from == from && r.name == name)
    }

    pub fn relationships(&self) -> &[RelationshipDef] {
        &self.relationships
    }

    /// Relationships that start at `entity`.
    pub fn relationships_of<'a>(
        &'a self,
        entity: &'a str,
    ) -> impl Iterator<Item = &'a RelationshipDef> + 'a {
        self.relationships.iter().filter(move |r| r.from == entity)
    }
}

struct ForeignKey {
    from: &'static str,
    column: &'static str,
    to: &'static str,
    forward: &'static str,
    reverse: &'static str,
}

/// Collects entities and foreign keys, then validates them as a whole.
#[derive(Default)]
pub struct CatalogBuilder {
    entities: Vec<EntityDef>,
    foreign_keys: Vec<ForeignKey>,
}

impl CatalogBuilder {
    pub fn entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Declare `from.column -> to.id`, registering `forward` on `from`
    /// (many-to-one) and `reverse` on `to` (one-to-many).
    pub fn foreign_key(
        mut self,
        from: &'static str,
        column: &'static str,
        to: &'static str,
        forward: &'static str,
        reverse: &'static str,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            from,
            column,
            to,
            forward,
            reverse,
        });
        self
    }

    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut index = HashMap::with_capacity(self.entities.len());
        for (i, entity) in self.entities.iter().enumerate() {
            if index.insert(entity.name, i).is_some() {
                return Err(CatalogError::DuplicateEntity(entity.name.to_owned()));
            }
        }

        let mut relationships: Vec<RelationshipDef> =
            Vec::with_capacity(self.foreign_keys.len() * 2);
        for fk in &self.foreign_keys {
            let source = index
                .get(fk.from)
                .map(|&i| &self.entities[i])
                .ok_or_else(|| CatalogError::UnknownEntity(fk.from.to_owned()))?;
            if !index.contains_key(fk.to) {
                return Err(CatalogError::UnknownEntity(fk.to.to_owned()));
            }

            match source.get_field(fk.column) {
                Some(field) if field.ty == FieldType::Integer && field.name != PRIMARY_KEY => {}
                _ => {
                    return Err(CatalogError::InvalidForeignKey {
                        entity: fk.from.to_owned(),
                        column: fk.column.to_owned(),
                    })
                }
            }

            let pair = [
                RelationshipDef {
                    name: fk.forward,
                    from: fk.from,
                    to: fk.to,
                    cardinality: Cardinality::ManyToOne,
                    fk_column: fk.column,
                },
                RelationshipDef {
                    name: fk.reverse,
                    from: fk.to,
                    to: fk.from,
                    cardinality: Cardinality::OneToMany,
                    fk_column: fk.column,
                },
            ];

            for rel in pair {
                if rel.name.contains(PATH_SEPARATOR) {
                    return Err(CatalogError::InvalidRelationshipName(rel.name.to_owned()));
                }
                if relationships
                    .iter()
                    .any(|r| r.from == rel.from && r.name == rel.name)
                {
                    return Err(CatalogError::DuplicateRelationship {
                        entity: rel.from.to_owned(),
                        name: rel.name.to_owned(),
                    });
                }
                relationships.push(rel);
            }
        }

        Ok(Catalog {
            entities: self.entities,
            index,
            relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CatalogBuilder {
        Catalog::builder()
            .entity(EntityDef::new("Category", "categories").field("name", FieldType::Text))
            .entity(
                EntityDef::new("Product", "products")
                    .field("name", FieldType::Text)
                    .field("category_id", FieldType::Integer),
            )
    }

    #[test]
    fn foreign_key_registers_both_directions() {
        let catalog = base()
            .foreign_key("Product", "category_id", "Category", "category", "products")
            .build()
            .unwrap();

        let forward = catalog.relationship("Product", "category").unwrap();
        assert_eq!(forward.cardinality, Cardinality::ManyToOne);
        assert_eq!(forward.to, "Category");

        let reverse = catalog.relationship("Category", "products").unwrap();
        assert_eq!(reverse.cardinality, Cardinality::OneToMany);
        assert_eq!(reverse.fk_column, "category_id");

        assert!(catalog.relationship("Category", "category").is_none());
        assert_eq!(catalog.relationships_of("Product").count(), 1);
    }

    #[test]
    fn rejects_duplicate_entity() {
        let err = base()
            .entity(EntityDef::new("Product", "products_v2"))
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEntity(name) if name == "Product"));
    }

    #[test]
    fn rejects_unknown_target() {
        let err = base()
            .foreign_key("Product", "category_id", "Supplier", "supplier", "products")
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownEntity(name) if name == "Supplier"));
    }

    #[test]
    fn rejects_non_integer_fk_column() {
        let err = base()
            .foreign_key("Product", "name", "Category", "category", "products")
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidForeignKey { .. }));
    }

    #[test]
    fn rejects_duplicate_relationship_name() {
        let err = base()
            .foreign_key("Product", "category_id", "Category", "category", "products")
            .foreign_key("Product", "category_id", "Category", "category", "items")
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateRelationship { .. }));
    }

    #[test]
    fn rejects_separator_in_relationship_name() {
        let err = base()
            .foreign_key("Product", "category_id", "Category", "main__category", "products")
            .build()
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRelationshipName(_)));
    }
}
