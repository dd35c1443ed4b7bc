//! Plans for the fixed endpoints, resolved once when the router is built

use crate::catalog::storefront::{CATEGORY, INVOICE_PRODUCT, PRODUCT};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::query::{Operator, Plan, QueryDescriptor};

/// Resolved plans; filtered ones carry a placeholder value that each
/// request replaces with [`Plan::bind_filter`].
#[derive(Debug, Clone)]
pub struct PreparedPlans {
    pub products: Plan,
    pub inner_join: Plan,
    pub outer_join: Plan,
    pub categories_by_owner: Plan,
    pub invoice_lines_by_customer: Plan,
}

impl PreparedPlans {
    pub fn resolve(catalog: &Catalog) -> Result<Self> {
        Ok(Self {
            products: catalog.resolve(&QueryDescriptor::new(PRODUCT))?,
            inner_join: catalog.resolve(
                &QueryDescriptor::new(PRODUCT)
                    .inner_join("category")
                    .select(["id", "name", "price", "category__id", "category__name"]),
            )?,
            outer_join: catalog.resolve(
                &QueryDescriptor::new(CATEGORY)
                    .outer_join("products")
                    .select(["id", "name", "products__id", "products__name", "products__price"]),
            )?,
            categories_by_owner: catalog.resolve(
                &QueryDescriptor::new(CATEGORY).filter("owner_id", Operator::Eq, 0_i64),
            )?,
            invoice_lines_by_customer: catalog.resolve(
                &QueryDescriptor::new(INVOICE_PRODUCT)
                    .filter("customer_id", Operator::Eq, 0_i64)
                    .select(["qty", "sale_price"]),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::storefront;

    #[test]
    fn storefront_plans_resolve() {
        let plans = PreparedPlans::resolve(&storefront::catalog().unwrap()).unwrap();
        assert_eq!(
            plans.products.keys().collect::<Vec<_>>(),
            vec!["id", "name", "price", "category_id"]
        );
        assert!(plans.categories_by_owner.has_filter());
        assert!(plans.invoice_lines_by_customer.has_filter());
        assert!(!plans.outer_join.has_filter());
    }
}
