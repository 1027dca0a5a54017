//! Request descriptor: the read-only input a resolution runs against.

use serde::{Deserialize, Serialize};

/// Methods that are treated as the "no method suffix" case during candidate
/// generation: the idempotent, side-effect-free verbs.
pub const DEFAULT_METHODS: &[&str] = &["GET", "HEAD"];

/// Incoming request descriptor.
///
/// Owned by the caller; the core only reads it. The resource type the
/// request targets is carried separately as an already-parsed
/// [`ResourceType`](crate::ResourceType), one per provider pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP-like method name, e.g. `GET`.
    pub method: String,

    /// Ordered selector strings, most significant first.
    pub selectors: Vec<String>,

    /// Optional request extension, e.g. `html`.
    pub extension: Option<String>,
}

impl RequestDescriptor {
    /// Create a descriptor for the given method with no selectors or
    /// extension.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            selectors: Vec::new(),
            extension: None,
        }
    }

    /// Set the selector list.
    #[must_use]
    pub fn with_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Whether the method belongs to the fixed default set.
    #[must_use]
    pub fn is_default_method(&self) -> bool {
        DEFAULT_METHODS.contains(&self.method.as_str())
    }
}
