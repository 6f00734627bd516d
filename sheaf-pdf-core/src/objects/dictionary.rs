use crate::objects::Object;
use indexmap::IndexMap;

/// Dictionary that remembers insertion order, so serialized output is
/// deterministic and `/Type` stays the first key where it is set first.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    entries: IndexMap<String, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Creates a dictionary whose first entry is `/Type /<type_name>`.
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.set("Type", Object::name(type_name));
        dict
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Object::as_dict)
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }

    #[test]
    fn test_typed_puts_type_first() {
        let mut dict = Dictionary::typed("Page");
        dict.set("Rotate", 90);
        let keys: Vec<_> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Type", "Rotate"]);
        assert_eq!(dict.get("Type"), Some(&Object::name("Page")));
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("Name", "Test");
        dict.set("Age", 42);
        dict.set("Active", true);

        assert_eq!(dict.get("Name"), Some(&Object::String("Test".to_string())));
        assert_eq!(dict.get("Age"), Some(&Object::Integer(42)));
        assert_eq!(dict.get("Active"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut dict = Dictionary::new();
        dict.set("Zeta", 1);
        dict.set("Alpha", 2);
        dict.set("Mu", 3);
        // Overwriting keeps the original slot.
        dict.set("Zeta", 4);

        let keys: Vec<_> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mu"]);
        assert_eq!(dict.get("Zeta"), Some(&Object::Integer(4)));
    }

    #[test]
    fn test_remove() {
        let mut dict = Dictionary::new();
        dict.set("A", 1);
        dict.set("Temp", "Value");
        dict.set("B", 2);

        let removed = dict.remove("Temp");
        assert_eq!(removed, Some(Object::String("Value".to_string())));
        assert!(!dict.contains_key("Temp"));
        assert_eq!(dict.remove("Temp"), None);

        let keys: Vec<_> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    fn test_get_dict() {
        let mut parent = Dictionary::new();
        let mut child = Dictionary::new();
        child.set("ChildKey", "ChildValue");

        parent.set("Child", Object::Dictionary(child));
        parent.set("NotDict", "String");

        assert_eq!(
            parent.get_dict("Child").and_then(|c| c.get("ChildKey")),
            Some(&Object::String("ChildValue".to_string()))
        );
        assert!(parent.get_dict("NotDict").is_none());
        assert!(parent.get_dict("Missing").is_none());
    }

    #[test]
    fn test_from_iterator() {
        let items = vec![
            ("Name".to_string(), Object::String("Test".to_string())),
            ("Count".to_string(), Object::Integer(5)),
        ];

        let dict: Dictionary = items.into_iter().collect();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("Count"), Some(&Object::Integer(5)));
    }
}
