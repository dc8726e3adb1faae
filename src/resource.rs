//! The resource graph handed over for serialization.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::ser::to_value;
use crate::value::{Properties, Value};

/// A named entity with its own properties and relationships to other resources.
///
/// Resources are built by the caller; serializers only read them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
    name: String,
    properties: Properties,
    related_resources: Vec<Relationship>,
    linked_resources: Vec<Relationship>,
}

/// The target of a relationship: one resource or a list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    One(Resource),
    Many(Vec<Resource>),
}

/// A named edge from one resource to others.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub resources: Related,
    pub name: String,
    /// Whether the target is meant to be embedded in full rather than
    /// referenced. Plain JSON renders both the same way.
    pub embedded: bool,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Resource {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The resource name; the single top-level key of its document.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn related_resources(&self) -> &[Relationship] {
        &self.related_resources
    }

    pub fn linked_resources(&self) -> &[Relationship] {
        &self.linked_resources
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Adds every field of `value`, which has to serialize as a map or struct.
    pub fn with_serialized_properties<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        match to_value(value)? {
            Value::Map(properties) => Ok(self.with_properties(properties)),
            other => Err(Error::SerializationInput(format!(
                "resource properties must serialize as a map, got {}",
                other.type_name()
            ))),
        }
    }

    /// Adds a relationship whose target is rendered inline.
    pub fn with_related(
        mut self,
        name: impl Into<String>,
        resources: impl Into<Related>,
        embedded: bool,
    ) -> Self {
        self.related_resources
            .push(Relationship::new(name, resources, embedded));
        self
    }

    /// Adds a relationship whose target is reached through a link.
    pub fn with_linked(
        mut self,
        name: impl Into<String>,
        resources: impl Into<Related>,
        embedded: bool,
    ) -> Self {
        self.linked_resources
            .push(Relationship::new(name, resources, embedded));
        self
    }
}

impl Relationship {
    pub fn new(name: impl Into<String>, resources: impl Into<Related>, embedded: bool) -> Self {
        Relationship {
            resources: resources.into(),
            name: name.into(),
            embedded,
        }
    }
}

impl Related {
    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        match self {
            Related::One(resource) => std::slice::from_ref(resource).iter(),
            Related::Many(resources) => resources.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Related::One(_) => 1,
            Related::Many(resources) => resources.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Resource> for Related {
    fn from(resource: Resource) -> Self {
        Related::One(resource)
    }
}

impl From<Vec<Resource>> for Related {
    fn from(resources: Vec<Resource>) -> Self {
        Related::Many(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Author {
        name: &'static str,
        born: u16,
    }

    #[test]
    fn related_iterates_one_or_many() {
        let one = Related::from(Resource::new("a"));
        assert_eq!(one.len(), 1);
        assert_eq!(one.iter().map(Resource::name).collect::<Vec<_>>(), ["a"]);

        let many = Related::from(vec![Resource::new("b"), Resource::new("c")]);
        assert_eq!(many.iter().map(Resource::name).collect::<Vec<_>>(), ["b", "c"]);
        assert!(Related::Many(Vec::new()).is_empty());
    }

    #[test]
    fn serialized_properties_come_from_struct_fields() {
        let resource = Resource::new("author")
            .with_serialized_properties(&Author {
                name: "Herbert",
                born: 1920,
            })
            .unwrap();
        assert_eq!(resource.properties()["name"], Value::from("Herbert"));
        assert_eq!(resource.properties()["born"], Value::Integer(1920));
    }

    #[test]
    fn serialized_properties_must_be_a_map() {
        let err = Resource::new("x").with_serialized_properties(&[1, 2]).unwrap_err();
        assert!(matches!(err, Error::SerializationInput(_)));
    }

    #[test]
    fn relationships_keep_insertion_order() {
        let resource = Resource::new("book")
            .with_related("authors", vec![Resource::new("author")], true)
            .with_linked("publisher", Resource::new("publisher"), false);
        assert_eq!(resource.related_resources()[0].name, "authors");
        assert!(resource.related_resources()[0].embedded);
        assert_eq!(resource.linked_resources()[0].name, "publisher");
        assert!(!resource.linked_resources()[0].embedded);
    }
}
