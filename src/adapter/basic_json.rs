//! A plain dump of a resource into JSON.
//!
//! ```text
//! {
//!     "<resource name>": {
//!         "field1": "value",
//!         "relationship": [
//!             {"relationship_field": "value"}
//!         ],
//!         "list_relationship": [
//!             {"relationship_field": "value"},
//!             {"relationship_field": "value"}
//!         ]
//!     }
//! }
//! ```

use tracing::{debug, trace};

use super::exception::{ErrorDocument, ResponseError};
use super::{Adapter, AdapterOptions, NO_CONTENT, OK};
use crate::error::Result;
use crate::normalize::{normalize, normalize_deep, Normalization};
use crate::resource::{Relationship, Resource};
use crate::value::{Properties, Value};

const CONTENT_TYPE: &str = "application/json";

/// Renders a [`Resource`] as a single JSON object keyed by the resource name.
#[derive(Debug, Clone)]
pub struct BasicJsonAdapter<'a> {
    resource: &'a Resource,
    status_code: u16,
    options: AdapterOptions,
}

impl<'a> BasicJsonAdapter<'a> {
    pub fn new(resource: &'a Resource) -> Self {
        Self::new_with_options(resource, AdapterOptions::default())
    }

    pub fn new_with_options(resource: &'a Resource, options: AdapterOptions) -> Self {
        BasicJsonAdapter {
            resource,
            status_code: OK,
            options,
        }
    }

    /// Sets the status of the response being written.
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The document before encoding, or `None` for a `204 No Content` response.
    ///
    /// Relationship lists go in first, in the order the relationships were
    /// declared, related before linked. Relationships sharing a name share one
    /// list. The resource's own properties are merged in last and replace any
    /// relationship of the same name.
    pub fn document(&self) -> Option<Value> {
        if self.status_code == NO_CONTENT {
            return None;
        }
        let resource = self.resource;
        let mut body = Properties::new();
        append_relationships(&mut body, resource.related_resources());
        append_relationships(&mut body, resource.linked_resources());

        for (key, value) in resource.properties() {
            let value = match self.options.normalization {
                Normalization::Uniform => value.clone(),
                Normalization::OwnProperties => normalize(value.clone()),
            };
            body.insert(key.clone(), value);
        }

        let mut document = Properties::with_capacity(1);
        document.insert(resource.name().to_owned(), Value::Map(body));
        let document = Value::Map(document);
        Some(match self.options.normalization {
            Normalization::Uniform => normalize_deep(document),
            Normalization::OwnProperties => document,
        })
    }
}

fn append_relationships(body: &mut Properties, relationships: &[Relationship]) {
    for relationship in relationships {
        trace!(
            relationship = %relationship.name,
            count = relationship.resources.len(),
            embedded = relationship.embedded,
            "appending relationship"
        );
        let entry = body
            .entry(relationship.name.clone())
            .or_insert_with(|| Value::List(Vec::new()));
        if let Value::List(items) = entry {
            items.extend(
                relationship
                    .resources
                    .iter()
                    .map(|related| Value::Map(related.properties().clone())),
            );
        }
    }
}

impl Adapter for BasicJsonAdapter<'_> {
    const FORMATS: &'static [&'static str] = &["json", CONTENT_TYPE];
    const EXTRA_HEADERS: &'static [(&'static str, &'static str)] = &[("Content-Type", CONTENT_TYPE)];

    fn formatted_body(&self) -> Result<String> {
        let Some(document) = self.document() else {
            debug!(resource = self.resource.name(), "no content, empty body");
            return Ok(String::new());
        };
        debug!(
            resource = self.resource.name(),
            status = self.status_code,
            related = self.resource.related_resources().len(),
            linked = self.resource.linked_resources().len(),
            normalization = ?self.options.normalization,
            "formatting resource body"
        );
        let body = if self.options.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(body)
    }

    fn format_exception<E: ResponseError + ?Sized>(exc: &E) -> (String, &'static str, u16) {
        let document = ErrorDocument::from_error(exc);
        debug!(status = document.status, message = %document.message, "formatting exception");
        (document.to_json(), Self::primary_format(), document.status)
    }
}
