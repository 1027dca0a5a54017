//! Script engine extension registry.
//!
//! An ordered list of file-extension-to-engine bindings supplied by the
//! surrounding scripting subsystem. The core treats a registry as a
//! read-only snapshot for the duration of one resolution call and probes
//! extensions in reverse registration order: a later-registered engine
//! overrides an earlier one for the same extension.

use serde::{Deserialize, Serialize};

/// One extension-to-engine binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineBinding {
    /// File extension, without the leading dot.
    pub extension: String,
    /// Identifier of the engine claiming the extension.
    pub engine: String,
}

/// Ordered registry of engine bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRegistry {
    bindings: Vec<EngineBinding>,
}

impl EngineRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding in registration order.
    pub fn register(&mut self, extension: impl Into<String>, engine: impl Into<String>) {
        self.bindings.push(EngineBinding {
            extension: extension.into(),
            engine: engine.into(),
        });
    }

    /// Bindings in registration order.
    #[must_use]
    pub fn bindings(&self) -> &[EngineBinding] {
        &self.bindings
    }

    /// Bindings in probe order: reverse registration order, so the
    /// last-registered engine is tried first.
    pub fn probe_order(&self) -> impl Iterator<Item = &EngineBinding> {
        self.bindings.iter().rev()
    }

    /// The engine bound to `extension`, honoring last-registered-wins.
    #[must_use]
    pub fn engine_by_extension(&self, extension: &str) -> Option<&str> {
        self.probe_order()
            .find(|b| b.extension == extension)
            .map(|b| b.engine.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

impl<E, N> FromIterator<(E, N)> for EngineRegistry
where
    E: Into<String>,
    N: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (E, N)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (extension, engine) in iter {
            registry.register(extension, engine);
        }
        registry
    }
}
