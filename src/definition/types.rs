//! Definition set types
//!
//! A definition set is the already-parsed `definitions` section of an API
//! document. The shape of every field is decided once, when the set is
//! built, so resolution never inspects raw JSON.
//!
//! Primitive kinds and reference tokens are kept exactly as written. They
//! are validated during resolution, where a bad kind or token aborts the run.

use indexmap::IndexMap;

/// One field of a composite definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Primitive kind (`string`, `integer`, ...)
    Scalar(String),
    /// Homogeneous array of one primitive kind
    ScalarArray(String),
    /// Reference token naming another definition
    Reference(String),
    /// Array of the referenced definition
    ReferenceArray(String),
}

impl Field {
    /// Create a scalar field
    pub fn scalar(kind: impl Into<String>) -> Self {
        Field::Scalar(kind.into())
    }

    /// Create a scalar array field
    pub fn scalar_array(kind: impl Into<String>) -> Self {
        Field::ScalarArray(kind.into())
    }

    /// Create a reference field
    pub fn reference(token: impl Into<String>) -> Self {
        Field::Reference(token.into())
    }

    /// Create a reference array field
    pub fn reference_array(token: impl Into<String>) -> Self {
        Field::ReferenceArray(token.into())
    }

    /// Returns the reference token, if this field points at a definition
    pub fn reference_token(&self) -> Option<&str> {
        match self {
            Field::Reference(token) | Field::ReferenceArray(token) => Some(token),
            Field::Scalar(_) | Field::ScalarArray(_) => None,
        }
    }

    /// Returns true for either array variant
    pub fn is_array(&self) -> bool {
        matches!(self, Field::ScalarArray(_) | Field::ReferenceArray(_))
    }
}

/// One named data shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// A single primitive kind
    Simple(String),
    /// Named fields, in document order
    Composite(Vec<(String, Field)>),
}

impl Definition {
    /// Create a simple definition
    pub fn simple(kind: impl Into<String>) -> Self {
        Definition::Simple(kind.into())
    }

    /// Create a composite definition.
    ///
    /// Field names are unique: a repeated name replaces the earlier field
    /// but keeps its position.
    pub fn composite<N, I>(fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Field)>,
    {
        let mut out: Vec<(String, Field)> = Vec::new();
        for (name, field) in fields {
            let name = name.into();
            match out.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = field,
                None => out.push((name, field)),
            }
        }
        Definition::Composite(out)
    }

    /// Returns the fields of a composite definition (empty for simple ones)
    pub fn fields(&self) -> &[(String, Field)] {
        match self {
            Definition::Simple(_) => &[],
            Definition::Composite(fields) => fields,
        }
    }

    /// Returns true for a simple definition
    pub fn is_simple(&self) -> bool {
        matches!(self, Definition::Simple(_))
    }
}

/// Mapping from unique definition name to definition.
///
/// Enumeration order is insertion order, which for a loaded document is the
/// order definitions are written in. Re-inserting a name keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionSet {
    definitions: IndexMap<String, Definition>,
}

impl DefinitionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, definition: Definition) -> Option<Definition> {
        self.definitions.insert(name.into(), definition)
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, definition: Definition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Get a definition by name
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    /// Get a definition together with its stored name
    pub fn get_entry(&self, name: &str) -> Option<(&str, &Definition)> {
        self.definitions
            .get_key_value(name)
            .map(|(name, def)| (name.as_str(), def))
    }

    /// Checks if a definition exists
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Iterate definitions in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Definition names in enumeration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True when the set has no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Definition)> for DefinitionSet {
    fn from_iter<I: IntoIterator<Item = (N, Definition)>>(iter: I) -> Self {
        let mut set = DefinitionSet::new();
        for (name, definition) in iter {
            set.insert(name, definition);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_keeps_field_order() {
        let def = Definition::composite([
            ("name", Field::scalar("string")),
            ("age", Field::scalar("integer")),
            ("tags", Field::scalar_array("string")),
        ]);

        let names: Vec<&str> = def.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "tags"]);
    }

    #[test]
    fn test_composite_field_names_unique() {
        let def = Definition::composite([
            ("id", Field::scalar("string")),
            ("name", Field::scalar("string")),
            ("id", Field::scalar("integer")),
        ]);

        assert_eq!(def.fields().len(), 2);
        assert_eq!(def.fields()[0], ("id".to_string(), Field::scalar("integer")));
    }

    #[test]
    fn test_simple_has_no_fields() {
        let def = Definition::simple("string");
        assert!(def.is_simple());
        assert!(def.fields().is_empty());
    }

    #[test]
    fn test_reference_token() {
        assert_eq!(
            Field::reference("#/definitions/Owner").reference_token(),
            Some("#/definitions/Owner")
        );
        assert_eq!(
            Field::reference_array("#/definitions/Tag").reference_token(),
            Some("#/definitions/Tag")
        );
        assert_eq!(Field::scalar("string").reference_token(), None);
        assert!(Field::reference_array("#/definitions/Tag").is_array());
        assert!(!Field::reference("#/definitions/Tag").is_array());
    }

    #[test]
    fn test_set_enumerates_in_insertion_order() {
        let mut set: DefinitionSet = [
            ("Pet", Definition::simple("string")),
            ("Owner", Definition::simple("string")),
            ("Address", Definition::simple("string")),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["Pet", "Owner", "Address"]);

        let replaced = set.insert("Owner", Definition::simple("integer"));
        assert_eq!(replaced, Some(Definition::simple("string")));
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["Pet", "Owner", "Address"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("Owner"));
        assert!(!set.contains("Missing"));
    }
}
