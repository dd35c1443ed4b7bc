//! The storefront schema served by the HTTP endpoints

use super::{Catalog, CatalogError, EntityDef, FieldType};

/// Application label used in serialized documents (`relational_query.product`).
pub const APP_LABEL: &str = "relational_query";

pub const USER: &str = "User";
pub const CATEGORY: &str = "Category";
pub const PRODUCT: &str = "Product";
pub const CUSTOMER: &str = "Customer";
pub const INVOICE_PRODUCT: &str = "InvoiceProduct";

/// Build the storefront catalog.
pub fn catalog() -> Result<Catalog, CatalogError> {
    Catalog::builder()
        .entity(EntityDef::new(USER, "users").field("username", FieldType::Text))
        .entity(
            EntityDef::new(CATEGORY, "categories")
                .field("name", FieldType::Text)
                .field("owner_id", FieldType::Integer),
        )
        .entity(
            EntityDef::new(PRODUCT, "products")
                .field("name", FieldType::Text)
                .field("price", FieldType::Real)
                .field("category_id", FieldType::Integer),
        )
        .entity(
            EntityDef::new(CUSTOMER, "customers")
                .field("name", FieldType::Text)
                .field("email", FieldType::Text),
        )
        .entity(
            EntityDef::new(INVOICE_PRODUCT, "invoice_products")
                .field("customer_id", FieldType::Integer)
                .field("product_id", FieldType::Integer)
                .field("qty", FieldType::Integer)
                .field("sale_price", FieldType::Real),
        )
        .foreign_key(CATEGORY, "owner_id", USER, "owner", "categories")
        .foreign_key(PRODUCT, "category_id", CATEGORY, "category", "products")
        .foreign_key(INVOICE_PRODUCT, "customer_id", CUSTOMER, "customer", "invoice_products")
        .foreign_key(INVOICE_PRODUCT, "product_id", PRODUCT, "product", "invoice_products")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_catalog_builds() {
        let catalog = catalog().unwrap();
        assert_eq!(catalog.entities().count(), 5);
        assert_eq!(catalog.relationships().len(), 8);
        assert!(catalog.relationship(PRODUCT, "category").is_some());
        assert!(catalog.relationship(CATEGORY, "products").is_some());
        assert!(catalog.relationship(CUSTOMER, "invoice_products").is_some());
    }
}
