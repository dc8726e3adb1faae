//! Response formats.
//!
//! Each format is an [`Adapter`]: a type declaring the format tokens it
//! answers to and the headers it needs, plus the rendering of resources,
//! exceptions and requests. [`AdapterKind`] is the closed set of adapters
//! this crate ships, looked up by any of their tokens.

mod basic_json;
mod exception;

pub use self::basic_json::BasicJsonAdapter;
pub use self::exception::{ApiError, ErrorDocument, ResponseError, INTERNAL_SERVER_ERROR};

use crate::error::Result;
use crate::normalize::Normalization;
use crate::resource::Resource;

pub const OK: u16 = 200;
pub const NO_CONTENT: u16 = 204;

/// A response format.
pub trait Adapter {
    /// Tokens this format answers to; the first one is the primary token.
    const FORMATS: &'static [&'static str];

    /// Headers every response in this format carries.
    const EXTRA_HEADERS: &'static [(&'static str, &'static str)];

    /// The response body as text. Empty for `204 No Content`.
    fn formatted_body(&self) -> Result<String>;

    /// Renders `exc` as `(body, format token, status code)`.
    fn format_exception<E: ResponseError + ?Sized>(exc: &E) -> (String, &'static str, u16);

    /// Adapts an incoming request. The default leaves it untouched.
    fn format_request<R>(request: R) -> R {
        request
    }

    fn primary_format() -> &'static str {
        Self::FORMATS[0]
    }

    fn extra_headers() -> &'static [(&'static str, &'static str)] {
        Self::EXTRA_HEADERS
    }
}

/// Options used to configure an adapter.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct AdapterOptions {
    /// Which values get normalized before encoding.
    pub normalization: Normalization,
    /// Whether to indent the encoded body. The default is false.
    pub pretty: bool,
}

impl AdapterOptions {
    /// Create a builder used to construct a new [`AdapterOptions`].
    pub fn builder() -> AdapterOptionsBuilder {
        AdapterOptionsBuilder {
            options: Default::default(),
        }
    }
}

/// A builder used to construct new [`AdapterOptions`] structs.
pub struct AdapterOptionsBuilder {
    options: AdapterOptions,
}

impl AdapterOptionsBuilder {
    pub fn normalization(mut self, value: Normalization) -> Self {
        self.options.normalization = value;
        self
    }

    pub fn pretty(mut self, value: bool) -> Self {
        self.options.pretty = value;
        self
    }

    /// Consume this builder and produce an [`AdapterOptions`].
    pub fn build(self) -> AdapterOptions {
        self.options
    }
}

/// The adapters available for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    BasicJson,
}

impl AdapterKind {
    pub const ALL: &'static [AdapterKind] = &[AdapterKind::BasicJson];

    /// Finds the adapter answering to `format`, ignoring ASCII case.
    pub fn from_format(format: &str) -> Option<AdapterKind> {
        Self::ALL.iter().copied().find(|kind| {
            kind.formats()
                .iter()
                .any(|token| token.eq_ignore_ascii_case(format.trim()))
        })
    }

    pub fn formats(self) -> &'static [&'static str] {
        match self {
            AdapterKind::BasicJson => BasicJsonAdapter::FORMATS,
        }
    }

    pub fn primary_format(self) -> &'static str {
        match self {
            AdapterKind::BasicJson => BasicJsonAdapter::primary_format(),
        }
    }

    pub fn extra_headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            AdapterKind::BasicJson => BasicJsonAdapter::extra_headers(),
        }
    }

    /// Renders `resource` as a response with the given status.
    pub fn formatted_body(
        self,
        resource: &Resource,
        status_code: u16,
        options: AdapterOptions,
    ) -> Result<String> {
        match self {
            AdapterKind::BasicJson => BasicJsonAdapter::new_with_options(resource, options)
                .with_status(status_code)
                .formatted_body(),
        }
    }

    pub fn format_exception(self, exc: &dyn ResponseError) -> (String, &'static str, u16) {
        match self {
            AdapterKind::BasicJson => BasicJsonAdapter::format_exception(exc),
        }
    }

    pub fn format_request<R>(self, request: R) -> R {
        match self {
            AdapterKind::BasicJson => BasicJsonAdapter::format_request(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest(
        format,
        case("json"),
        case("application/json"),
        case("JSON"),
        case(" Application/JSON ")
    )]
    fn json_adapter_found_by_either_alias(format: &str) {
        assert_eq!(AdapterKind::from_format(format), Some(AdapterKind::BasicJson));
    }

    #[rstest(format, case("xml"), case("text/html"), case(""))]
    fn unknown_formats_have_no_adapter(format: &str) {
        assert_eq!(AdapterKind::from_format(format), None);
    }

    #[test]
    fn json_declares_content_type() {
        let kind = AdapterKind::BasicJson;
        assert_eq!(kind.primary_format(), "json");
        assert_eq!(kind.formats(), ["json", "application/json"]);
        assert_eq!(kind.extra_headers(), [("Content-Type", "application/json")]);
    }

    #[test]
    fn requests_pass_through() {
        let request = vec![("q", "dune")];
        assert_eq!(
            AdapterKind::BasicJson.format_request(request.clone()),
            request
        );
    }

    #[test]
    fn dispatch_formats_bodies_and_exceptions() {
        let resource = Resource::new("book").with_property("title", "Dune");
        let kind = AdapterKind::BasicJson;
        assert_eq!(
            kind.formatted_body(&resource, OK, AdapterOptions::default())
                .unwrap(),
            r#"{"book":{"title":"Dune"}}"#
        );
        assert_eq!(
            kind.formatted_body(&resource, NO_CONTENT, AdapterOptions::default())
                .unwrap(),
            ""
        );

        let (_, format, status) = kind.format_exception(&ApiError::not_found("missing"));
        assert_eq!((format, status), ("json", 404));
    }
}
