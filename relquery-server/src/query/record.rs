//! Flat output records

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::Value;

/// Ordered mapping from projected key to value.
///
/// Serializes as a JSON object whose keys follow projection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.fields.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove and return the value stored under `key`.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        let pos = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(pos).1)
    }

    /// Rename `from` to `to` in place, keeping its position.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) {
        if let Some(entry) = self.fields.iter_mut().find(|(k, _)| k == from) {
            entry.0 = to.into();
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_projection_order() {
        let mut record = Record::default();
        record.push("price", Value::Real(9.99));
        record.push("name", Value::from("Widget"));
        record.push("category__name", Value::Null);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"price":9.99,"name":"Widget","category__name":null}"#);
    }

    #[test]
    fn take_and_rename() {
        let mut record: Record = [
            ("id".to_string(), Value::Integer(1)),
            ("category_id".to_string(), Value::Integer(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.take("id"), Some(Value::Integer(1)));
        record.rename("category_id", "category");
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["category"]);
        assert_eq!(record.get("category"), Some(&Value::Integer(3)));
    }
}
