//! Plain JSON rendering for hypermedia resources.
//!
//! A [`Resource`] is a named entity with properties and two kinds of
//! relationships, related (embedded) and linked. [`BasicJsonAdapter`]
//! flattens it into one JSON object keyed by the resource name:
//!
//! ```
//! use resource_json::{Adapter, BasicJsonAdapter, Resource};
//!
//! let author = Resource::new("author").with_property("name", "Herbert");
//! let book = Resource::new("book")
//!     .with_property("title", "Dune")
//!     .with_related("authors", vec![author], true);
//!
//! let body = BasicJsonAdapter::new(&book).formatted_body()?;
//! assert_eq!(body, r#"{"book":{"authors":[{"name":"Herbert"}],"title":"Dune"}}"#);
//! # Ok::<(), resource_json::Error>(())
//! ```
//!
//! Errors render as `{"status": ..., "message": ...}` through
//! [`Adapter::format_exception`]. Decimals, timestamps and sets have no JSON
//! form of their own and are converted on the way out, see [`normalize`].
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod adapter;
pub mod convert;
mod error;
pub mod normalize;
mod resource;
pub mod ser;
mod value;

pub use adapter::{
    Adapter, AdapterKind, AdapterOptions, AdapterOptionsBuilder, ApiError, BasicJsonAdapter,
    ErrorDocument, ResponseError,
};
pub use convert::{convert_to_boolean, convert_to_datetime, parse_timestamp};
pub use error::{Error, Result};
pub use normalize::Normalization;
pub use resource::{Related, Relationship, Resource};
pub use value::{Properties, Value, ValueSet};
