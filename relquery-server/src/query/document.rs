//! Serializer-style documents (`{"model", "pk", "fields"}`)

use serde::Serialize;

use crate::catalog::{Cardinality, Catalog, PRIMARY_KEY};
use crate::error::{GatewayError, Result};

use super::{Record, Value};

/// One record in the full-serialization shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub model: String,
    pub pk: Value,
    pub fields: Record,
}

/// Wrap plain records of `entity` as documents labelled `<app_label>.<entity>`.
///
/// The primary key moves to `pk`; foreign-key columns are renamed to the
/// relationship they implement (`category_id` becomes `category`).
pub fn to_documents(
    catalog: &Catalog,
    app_label: &str,
    entity: &str,
    records: Vec<Record>,
) -> Result<Vec<Document>> {
    let def = catalog
        .entity(entity)
        .ok_or_else(|| GatewayError::UnknownEntity(entity.to_owned()))?;
    let model = format!("{}.{}", app_label, def.name.to_lowercase());
    let renames: Vec<_> = catalog
        .relationships_of(def.name)
        .filter(|r| r.cardinality == Cardinality::ManyToOne)
        .map(|r| (r.fk_column, r.name))
        .collect();

    Ok(records
        .into_iter()
        .map(|mut fields| {
            let pk = fields.take(PRIMARY_KEY).unwrap_or(Value::Null);
            for (column, name) in &renames {
                fields.rename(column, *name);
            }
            Document {
                model: model.clone(),
                pk,
                fields,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::storefront::{self, APP_LABEL, PRODUCT};

    #[test]
    fn product_document_shape() {
        let catalog = storefront::catalog().unwrap();
        let record: Record = [
            ("id".to_string(), Value::Integer(1)),
            ("name".to_string(), Value::from("Widget")),
            ("price".to_string(), Value::Real(9.99)),
            ("category_id".to_string(), Value::Integer(1)),
        ]
        .into_iter()
        .collect();

        let docs = to_documents(&catalog, APP_LABEL, PRODUCT, vec![record]).unwrap();
        let json = serde_json::to_value(&docs[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "relational_query.product",
                "pk": 1,
                "fields": {"name": "Widget", "price": 9.99, "category": 1}
            })
        );
    }
}
