use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// One result row: the result set's column names plus this row's values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Value of the named column, first match wins.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Serializes as a `{column: value}` object in column order.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.columns.iter().zip(&self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Row {
        let columns: Arc<[String]> = vec!["id".to_string(), "name".to_string()].into();
        Row::new(columns, vec![json!(1), json!("x")])
    }

    #[test]
    fn lookup_by_name_and_index() {
        let row = sample();
        assert_eq!(row.get("name"), Some(&json!("x")));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_index(0), Some(&json!(1)));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn serializes_as_object() {
        let s = serde_json::to_string(&sample()).unwrap();
        assert_eq!(s, r#"{"id":1,"name":"x"}"#);
    }
}
