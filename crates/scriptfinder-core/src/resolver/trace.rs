//! Resolution tracing for the `resolve --explain` command.
//!
//! Provides step-by-step traces of script resolution for debugging and
//! understanding why a request resolves to a particular script.

use serde::Serialize;

/// Schema version for the explain output format.
/// Bump when the trace structure changes incompatibly.
pub const RESOLVE_EXPLAIN_SCHEMA_VERSION: u32 = 1;

/// A single step in the resolution trace.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveTraceStep {
    /// Step name (e.g., "select_provider", "probe_entry", "load_unit")
    pub step: &'static str,
    /// Whether this step succeeded
    pub ok: bool,
    /// Human-readable description of what happened
    pub detail: String,
    /// Candidate script name involved in this step, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    /// Engine extension being probed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Module the step ran against, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl ResolveTraceStep {
    /// Create a new trace step.
    pub fn new(step: &'static str, ok: bool, detail: impl Into<String>) -> Self {
        Self {
            step,
            ok,
            detail: detail.into(),
            candidate: None,
            extension: None,
            module: None,
        }
    }

    /// Set the candidate for this step.
    #[must_use]
    pub fn with_candidate(mut self, candidate: impl Into<String>) -> Self {
        self.candidate = Some(candidate.into());
        self
    }

    /// Set the extension for this step.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Set the module for this step.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

/// Warning generated during resolution.
#[derive(Debug, Clone, Serialize)]
pub struct TraceWarning {
    /// Warning code (e.g., "empty_registry")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
}

impl TraceWarning {
    /// Create a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Complete resolution trace.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolveTrace {
    /// Ordered list of resolution steps
    pub steps: Vec<ResolveTraceStep>,
    /// Warnings generated during resolution
    pub warnings: Vec<TraceWarning>,
}

impl ResolveTrace {
    /// Create a new empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step to the trace.
    pub fn add_step(&mut self, step: ResolveTraceStep) {
        self.steps.push(step);
    }

    /// Add a warning to the trace.
    pub fn add_warning(&mut self, warning: TraceWarning) {
        self.warnings.push(warning);
    }

    /// Add a simple success step.
    pub fn success(&mut self, step: &'static str, detail: impl Into<String>) {
        self.steps.push(ResolveTraceStep::new(step, true, detail));
    }

    /// Add a simple failure step.
    pub fn failure(&mut self, step: &'static str, detail: impl Into<String>) {
        self.steps.push(ResolveTraceStep::new(step, false, detail));
    }
}

/// Step names used in resolution tracing.
pub mod steps {
    pub const SELECT_PROVIDER: &str = "select_provider";
    pub const BUILD_CANDIDATES: &str = "build_candidates";
    pub const PROBE_ENTRY: &str = "probe_entry";
    pub const LOAD_UNIT: &str = "load_unit";
    pub const INSTANTIATE_UNIT: &str = "instantiate_unit";
    pub const RESOLVED: &str = "resolved";
    pub const EXHAUSTED: &str = "exhausted";
}

/// Warning codes used in resolution tracing.
pub mod warning_codes {
    pub const EMPTY_REGISTRY: &str = "empty_registry";
    pub const NO_ADVERTISED_TYPES: &str = "no_advertised_types";
}
