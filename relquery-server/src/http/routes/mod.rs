//! Route handlers organized by resource

pub mod index;
pub mod joins;
pub mod lookups;
pub mod products;
pub mod query;
pub mod raw;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A list response wrapped under a single named key, e.g. `{"products": [...]}`.
#[derive(Debug)]
pub struct Collection<T> {
    pub key: &'static str,
    pub items: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new(key: &'static str, items: Vec<T>) -> Self {
        Self { key, items }
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.items)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Collection<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collection_serializes_under_key() {
        let body = serde_json::to_value(Collection::new("products", vec![1, 2])).unwrap();
        assert_eq!(body, json!({"products": [1, 2]}));

        let empty: Collection<i64> = Collection::new("customers", Vec::new());
        assert_eq!(serde_json::to_value(empty).unwrap(), json!({"customers": []}));
    }
}
