//! Script resolution.
//!
//! Resolves a request descriptor to the first matching script across an
//! ordered set of providers. The caller-supplied provider order is
//! authoritative; within it, candidates run most-specific-first and engine
//! extensions run in reverse registration order. The whole nested iteration
//! short-circuits at the first hit.
//!
//! Resolution is stateless and reentrant: it writes no shared state and
//! only reads the registry and provider snapshots supplied per call, so
//! concurrent resolutions are safe without locking as long as the owning
//! registry publishes immutable snapshots.

mod trace;

pub use trace::{
    steps as trace_steps, warning_codes as trace_warning_codes, ResolveTrace, ResolveTraceStep,
    TraceWarning, RESOLVE_EXPLAIN_SCHEMA_VERSION,
};

use crate::candidates::candidates;
use crate::error::Error;
use crate::mangle;
use crate::provider::{RenderUnit, TypeProvider};
use crate::registry::EngineRegistry;
use crate::request::RequestDescriptor;
use std::fmt;

/// Path prefix under which modules store their source scripts.
pub const SCRIPTS_ROOT: &str = "scripts";

/// Maximum number of tried paths to record.
const MAX_TRIED_PATHS: usize = 20;

/// Which kind of executable to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Probe modules for stored source scripts.
    #[default]
    Source,
    /// Load and instantiate precompiled units.
    Precompiled,
}

/// Read-only context for one resolution call.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Engine extension registry snapshot.
    pub registry: &'a EngineRegistry,
    /// Source-script or precompiled-unit mode.
    pub mode: ResolveMode,
}

/// The resolved unit of work, ready for execution by an external engine.
#[derive(Debug)]
pub enum Executable {
    /// A stored source script.
    Source {
        /// Name of the providing module.
        module: String,
        /// Located script path or URL, as reported by the module.
        path: String,
        /// Engine bound to the matched extension.
        engine: String,
    },
    /// An instantiated precompiled unit.
    Precompiled {
        /// Name of the providing module.
        module: String,
        /// Engine bound to the matched extension.
        engine: String,
        /// The instantiated unit.
        unit: Box<dyn RenderUnit>,
    },
}

impl Executable {
    /// Name of the providing module.
    #[must_use]
    pub fn module(&self) -> &str {
        match self {
            Self::Source { module, .. } | Self::Precompiled { module, .. } => module,
        }
    }

    /// Identifier of the engine selected for execution.
    #[must_use]
    pub fn engine(&self) -> &str {
        match self {
            Self::Source { engine, .. } | Self::Precompiled { engine, .. } => engine,
        }
    }
}

impl fmt::Display for Executable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source { path, engine, .. } => write!(f, "{path} ({engine})"),
            Self::Precompiled { engine, unit, .. } => {
                write!(f, "unit {} ({engine})", unit.name())
            }
        }
    }
}

/// Result of one resolution call.
///
/// `executable` being `None` is the normal not-found outcome, never an
/// error: callers act on it, typically by falling back or answering with a
/// no-renderer response.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    /// The first match, if any.
    pub executable: Option<Executable>,
    /// Probed paths / unit identifiers (capped).
    pub tried: Vec<String>,
}

/// Result of a traced resolution.
#[derive(Debug)]
pub struct ResolveOutcomeWithTrace {
    /// The resolution outcome.
    pub outcome: ResolveOutcome,
    /// The resolution trace.
    pub trace: ResolveTrace,
}

/// Resolve `request` against `providers` in order.
///
/// # Errors
/// Returns [`Error::UnitInstantiation`] when a precompiled unit is located
/// but cannot be constructed. That aborts the entire resolution, not just
/// the current candidate: a found-but-broken unit is a packaging defect,
/// not an absence.
pub fn resolve(
    ctx: &ResolveContext<'_>,
    request: &RequestDescriptor,
    providers: &[TypeProvider],
) -> Result<ResolveOutcome, Error> {
    let mut tried = Vec::new();
    let executable = resolve_inner(ctx, request, providers, &mut tried, None)?;
    Ok(ResolveOutcome { executable, tried })
}

/// Resolve with tracing enabled.
///
/// Performs the same resolution as [`resolve`] but records each step for
/// debugging and for explaining why a request resolves to a particular
/// script.
///
/// # Errors
/// Same as [`resolve`].
pub fn resolve_with_trace(
    ctx: &ResolveContext<'_>,
    request: &RequestDescriptor,
    providers: &[TypeProvider],
) -> Result<ResolveOutcomeWithTrace, Error> {
    let mut tried = Vec::new();
    let mut trace = ResolveTrace::new();

    if ctx.registry.is_empty() {
        trace.add_warning(TraceWarning::new(
            trace_warning_codes::EMPTY_REGISTRY,
            "engine registry is empty, nothing can match",
        ));
    }

    let executable = resolve_inner(ctx, request, providers, &mut tried, Some(&mut trace))?;
    match &executable {
        Some(executable) => trace.success(trace_steps::RESOLVED, executable.to_string()),
        None => trace.failure(
            trace_steps::EXHAUSTED,
            format!("no candidate matched in {} provider(s)", providers.len()),
        ),
    }

    Ok(ResolveOutcomeWithTrace {
        outcome: ResolveOutcome { executable, tried },
        trace,
    })
}

fn resolve_inner(
    ctx: &ResolveContext<'_>,
    request: &RequestDescriptor,
    providers: &[TypeProvider],
    tried: &mut Vec<String>,
    mut trace: Option<&mut ResolveTrace>,
) -> Result<Option<Executable>, Error> {
    for provider in providers {
        let module = provider.module();

        if let Some(t) = trace.as_deref_mut() {
            t.add_step(
                ResolveTraceStep::new(
                    trace_steps::SELECT_PROVIDER,
                    true,
                    format!(
                        "probing module {} ({} advertised type(s))",
                        module.name(),
                        provider.resource_types().len()
                    ),
                )
                .with_module(module.name()),
            );
            if provider.resource_types().is_empty() {
                t.add_warning(TraceWarning::new(
                    trace_warning_codes::NO_ADVERTISED_TYPES,
                    format!("module {} advertises no resource types", module.name()),
                ));
            }
        }

        for resource_type in provider.resource_types() {
            if let Some(t) = trace.as_deref_mut() {
                t.success(
                    trace_steps::BUILD_CANDIDATES,
                    format!("building candidates for type {resource_type}"),
                );
            }

            for candidate in candidates(request, resource_type) {
                match ctx.mode {
                    ResolveMode::Precompiled => {
                        let identifier = mangle::unit_identifier(&candidate);
                        add_tried(tried, &identifier);

                        for binding in ctx.registry.probe_order() {
                            let Some(unit_type) = module.unit(&identifier) else {
                                if let Some(t) = trace.as_deref_mut() {
                                    t.add_step(
                                        ResolveTraceStep::new(
                                            trace_steps::LOAD_UNIT,
                                            false,
                                            format!("no unit {identifier}"),
                                        )
                                        .with_candidate(&candidate)
                                        .with_extension(&binding.extension)
                                        .with_module(module.name()),
                                    );
                                }
                                continue;
                            };

                            let unit = unit_type.instantiate().map_err(|source| {
                                if let Some(t) = trace.as_deref_mut() {
                                    t.add_step(
                                        ResolveTraceStep::new(
                                            trace_steps::INSTANTIATE_UNIT,
                                            false,
                                            source.to_string(),
                                        )
                                        .with_candidate(&candidate)
                                        .with_module(module.name()),
                                    );
                                }
                                Error::UnitInstantiation {
                                    identifier: identifier.clone(),
                                    module: module.name().to_string(),
                                    source,
                                }
                            })?;

                            if let Some(t) = trace.as_deref_mut() {
                                t.add_step(
                                    ResolveTraceStep::new(
                                        trace_steps::INSTANTIATE_UNIT,
                                        true,
                                        format!("instantiated unit {identifier}"),
                                    )
                                    .with_candidate(&candidate)
                                    .with_extension(&binding.extension)
                                    .with_module(module.name()),
                                );
                            }
                            return Ok(Some(Executable::Precompiled {
                                module: module.name().to_string(),
                                engine: binding.engine.clone(),
                                unit,
                            }));
                        }
                    }
                    ResolveMode::Source => {
                        for binding in ctx.registry.probe_order() {
                            let path = format!("{SCRIPTS_ROOT}/{candidate}.{}", binding.extension);
                            add_tried(tried, &path);

                            if let Some(located) = module.entry(&path) {
                                if let Some(t) = trace.as_deref_mut() {
                                    t.add_step(
                                        ResolveTraceStep::new(
                                            trace_steps::PROBE_ENTRY,
                                            true,
                                            format!("found entry at {path}"),
                                        )
                                        .with_candidate(&candidate)
                                        .with_extension(&binding.extension)
                                        .with_module(module.name()),
                                    );
                                }
                                return Ok(Some(Executable::Source {
                                    module: module.name().to_string(),
                                    path: located,
                                    engine: binding.engine.clone(),
                                }));
                            }

                            if let Some(t) = trace.as_deref_mut() {
                                t.add_step(
                                    ResolveTraceStep::new(
                                        trace_steps::PROBE_ENTRY,
                                        false,
                                        format!("no entry at {path}"),
                                    )
                                    .with_candidate(&candidate)
                                    .with_extension(&binding.extension)
                                    .with_module(module.name()),
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(None)
}

/// Add a probed path to the tried list (with cap).
fn add_tried(tried: &mut Vec<String>, path: &str) {
    if tried.len() < MAX_TRIED_PATHS {
        tried.push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstantiationError;
    use crate::provider::{ScriptModule, UnitType};
    use crate::resource_type::ResourceType;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    #[derive(Default)]
    struct MapModule {
        name: String,
        entries: HashSet<String>,
        units: HashMap<String, Arc<dyn UnitType>>,
    }

    impl MapModule {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                ..Default::default()
            }
        }

        fn with_entries(mut self, entries: &[&str]) -> Self {
            self.entries = entries.iter().map(ToString::to_string).collect();
            self
        }

        fn with_unit(mut self, identifier: &str, unit: Arc<dyn UnitType>) -> Self {
            self.units.insert(identifier.to_string(), unit);
            self
        }
    }

    impl ScriptModule for MapModule {
        fn name(&self) -> &str {
            &self.name
        }

        fn entry(&self, path: &str) -> Option<String> {
            self.entries
                .contains(path)
                .then(|| format!("module://{}/{path}", self.name))
        }

        fn unit(&self, identifier: &str) -> Option<Arc<dyn UnitType>> {
            self.units.get(identifier).cloned()
        }
    }

    #[derive(Debug)]
    struct NamedUnit(&'static str);

    impl crate::provider::RenderUnit for NamedUnit {
        fn name(&self) -> &str {
            self.0
        }
    }

    struct GoodUnit(&'static str);

    impl UnitType for GoodUnit {
        fn instantiate(&self) -> Result<Box<dyn RenderUnit>, InstantiationError> {
            Ok(Box::new(NamedUnit(self.0)))
        }
    }

    struct BrokenUnit;

    impl UnitType for BrokenUnit {
        fn instantiate(&self) -> Result<Box<dyn RenderUnit>, InstantiationError> {
            Err(InstantiationError::new("missing constructor"))
        }
    }

    fn provider(raw_type: &str, module: MapModule) -> TypeProvider {
        TypeProvider::new(
            vec![ResourceType::parse(raw_type).unwrap()],
            Arc::new(module),
        )
    }

    fn registry() -> EngineRegistry {
        [("js", "rhino"), ("html", "htl")].into_iter().collect()
    }

    #[test]
    fn test_selector_qualified_match_wins_over_plain() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Source,
        };
        let request = RequestDescriptor::new("GET")
            .with_selectors(["print"])
            .with_extension("html");

        let first = provider(
            "app/component",
            MapModule::new("first").with_entries(&["scripts/app/component/GET.print.html"]),
        );
        let second = provider(
            "app/component",
            MapModule::new("second").with_entries(&["scripts/app/component/GET.html"]),
        );

        let outcome = resolve(&ctx, &request, &[first, second]).unwrap();
        match outcome.executable {
            Some(Executable::Source {
                module,
                path,
                engine,
            }) => {
                assert_eq!(module, "first");
                assert_eq!(path, "module://first/scripts/app/component/GET.print.html");
                assert_eq!(engine, "htl");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_provider_order_is_authoritative() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Source,
        };
        let request = RequestDescriptor::new("GET").with_extension("html");

        let make = |name: &str| {
            provider(
                "app/component",
                MapModule::new(name).with_entries(&["scripts/app/component/GET.html"]),
            )
        };

        let outcome = resolve(&ctx, &request, &[make("first"), make("second")]).unwrap();
        assert_eq!(outcome.executable.unwrap().module(), "first");
    }

    #[test]
    fn test_last_registered_extension_probed_first() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Source,
        };
        let request = RequestDescriptor::new("GET");

        // Both extensions have a stored script; html was registered last.
        let p = provider(
            "app.component",
            MapModule::new("m").with_entries(&[
                "scripts/app.component/component.js",
                "scripts/app.component/component.html",
            ]),
        );

        let outcome = resolve(&ctx, &request, &[p]).unwrap();
        assert_eq!(outcome.executable.unwrap().engine(), "htl");
    }

    #[test]
    fn test_not_found_is_a_value() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Source,
        };
        let request = RequestDescriptor::new("GET").with_extension("html");
        let p = provider("app/component", MapModule::new("m"));

        let outcome = resolve(&ctx, &request, &[p]).unwrap();
        assert!(outcome.executable.is_none());
        assert!(!outcome.tried.is_empty());
        assert!(outcome.tried.len() <= 20);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Source,
        };
        let request = RequestDescriptor::new("GET")
            .with_selectors(["a", "b"])
            .with_extension("html");
        let providers = vec![
            provider(
                "x/y",
                MapModule::new("m1").with_entries(&["scripts/x/y/GET.a.html"]),
            ),
            provider(
                "x/y",
                MapModule::new("m2").with_entries(&["scripts/x/y/GET.a/b.html"]),
            ),
        ];

        let first = resolve(&ctx, &request, &providers).unwrap();
        let second = resolve(&ctx, &request, &providers).unwrap();
        let as_pair = |o: &ResolveOutcome| {
            o.executable
                .as_ref()
                .map(|e| (e.module().to_string(), e.engine().to_string()))
        };
        assert_eq!(as_pair(&first), as_pair(&second));
        assert_eq!(first.tried, second.tried);
    }

    #[test]
    fn test_precompiled_unit_is_instantiated() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Precompiled,
        };
        let request = RequestDescriptor::new("GET").with_extension("html");

        let p = provider(
            "app/component",
            MapModule::new("m").with_unit(
                "app.component.GET_002e_html",
                Arc::new(GoodUnit("component")),
            ),
        );

        let outcome = resolve(&ctx, &request, &[p]).unwrap();
        match outcome.executable {
            Some(Executable::Precompiled { module, unit, engine }) => {
                assert_eq!(module, "m");
                assert_eq!(unit.name(), "component");
                // html registered last, so its engine is selected first.
                assert_eq!(engine, "htl");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_precompiled_absence_is_not_found() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Precompiled,
        };
        let request = RequestDescriptor::new("GET").with_extension("html");
        let p = provider("app/component", MapModule::new("m"));

        let outcome = resolve(&ctx, &request, &[p]).unwrap();
        assert!(outcome.executable.is_none());
    }

    #[test]
    fn test_broken_unit_aborts_resolution() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Precompiled,
        };
        let request = RequestDescriptor::new("GET").with_extension("html");

        let broken = provider(
            "app/component",
            MapModule::new("broken").with_unit(
                "app.component.GET_002e_html",
                Arc::new(BrokenUnit),
            ),
        );
        // A later provider with a working unit must not be reached.
        let healthy = provider(
            "app/component",
            MapModule::new("healthy").with_unit(
                "app.component.GET_002e_html",
                Arc::new(GoodUnit("component")),
            ),
        );

        let err = resolve(&ctx, &request, &[broken, healthy]).unwrap_err();
        match err {
            Error::UnitInstantiation { module, identifier, .. } => {
                assert_eq!(module, "broken");
                assert_eq!(identifier, "app.component.GET_002e_html");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trace_records_probes_and_outcome() {
        let registry = registry();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Source,
        };
        let request = RequestDescriptor::new("GET").with_extension("html");
        let p = provider(
            "app/component",
            MapModule::new("m").with_entries(&["scripts/app/component/GET.html"]),
        );

        let with_trace = resolve_with_trace(&ctx, &request, &[p]).unwrap();
        assert!(with_trace.outcome.executable.is_some());
        let last = with_trace.trace.steps.last().unwrap();
        assert_eq!(last.step, trace_steps::RESOLVED);
        assert!(with_trace
            .trace
            .steps
            .iter()
            .any(|s| s.step == trace_steps::PROBE_ENTRY && s.ok));
    }

    #[test]
    fn test_trace_warns_on_empty_registry() {
        let registry = EngineRegistry::new();
        let ctx = ResolveContext {
            registry: &registry,
            mode: ResolveMode::Source,
        };
        let request = RequestDescriptor::new("GET");
        let p = provider("a", MapModule::new("m"));

        let with_trace = resolve_with_trace(&ctx, &request, &[p]).unwrap();
        assert!(with_trace.outcome.executable.is_none());
        assert!(with_trace
            .trace
            .warnings
            .iter()
            .any(|w| w.code == trace_warning_codes::EMPTY_REGISTRY));
    }
}
