//! Directed associations between entities

use serde::Serialize;

use super::entity::PRIMARY_KEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// The source row holds the foreign key (`Product.category`).
    ManyToOne,
    /// The target rows hold the foreign key (`Category.products`).
    OneToMany,
}

/// A named, directed relationship from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipDef {
    pub name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub cardinality: Cardinality,
    /// Foreign-key column on the "many" side.
    pub fk_column: &'static str,
}

impl RelationshipDef {
    /// Columns for the join condition: `(column on from, column on to)`.
    pub fn join_columns(&self) -> (&'static str, &'static str) {
        match self.cardinality {
            Cardinality::ManyToOne => (self.fk_column, PRIMARY_KEY),
            Cardinality::OneToMany => (PRIMARY_KEY, self.fk_column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_columns_follow_fk_side() {
        let forward = RelationshipDef {
            name: "category",
            from: "Product",
            to: "Category",
            cardinality: Cardinality::ManyToOne,
            fk_column: "category_id",
        };
        assert_eq!(forward.join_columns(), ("category_id", "id"));

        let reverse = RelationshipDef {
            name: "products",
            from: "Category",
            to: "Product",
            cardinality: Cardinality::OneToMany,
            fk_column: "category_id",
        };
        assert_eq!(reverse.join_columns(), ("id", "category_id"));
    }
}
