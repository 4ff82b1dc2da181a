use serde_json::{Map, Value};

/// Ordered column → value pairs.
///
/// Used both as a filter (`col = ?` equality matches) and as the set of
/// columns to write. Iteration follows insertion order, which is also the
/// order placeholders and parameters are rendered in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, Value)>,
}

/// Equality filters for a `WHERE` clause.
pub type FilterSpec = Fields;

/// Columns and values to insert or update.
pub type FieldSpec = Fields;

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Fields::insert`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set `column`, replacing the value in place if it is already present.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let f = Fields::new().with("b", 2).with("a", 1).with("c", "x");
        assert_eq!(f.columns().collect::<Vec<_>>(), ["b", "a", "c"]);
    }

    #[test]
    fn reinserting_replaces_in_place() {
        let mut f = Fields::new().with("a", 1).with("b", 2);
        f.insert("a", 10);
        assert_eq!(f.len(), 2);
        assert_eq!(f.columns().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(f.get("a"), Some(&json!(10)));
    }

    #[test]
    fn collects_from_pairs_and_json_objects() {
        let f: Fields = [("name", json!("x")), ("value", json!(5))].into_iter().collect();
        assert_eq!(f.get("value"), Some(&json!(5)));

        let obj = json!({"name": "x"});
        let f = Fields::from(obj.as_object().unwrap().clone());
        assert_eq!(f.len(), 1);
        assert_eq!(f.get("name"), Some(&json!("x")));
    }
}
