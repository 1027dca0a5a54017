//! `scriptfinder resolve` command implementation.
//!
//! Resolves a request descriptor against a directory-backed script module
//! and reports the first match, optionally with the full resolution trace.

use crate::module::DirModule;
use miette::{IntoDiagnostic, Result};
use scriptfinder_core::resolver::RESOLVE_EXPLAIN_SCHEMA_VERSION;
use scriptfinder_core::{
    resolve, resolve_with_trace, EngineRegistry, Executable, RequestDescriptor, ResolveContext,
    ResolveMode, ResolveOutcome, ResolveTrace, ResourceType, TypeProvider,
};
use serde::Serialize;
use std::sync::Arc;

/// Exit code for validation errors.
const EXIT_VALIDATION_ERROR: i32 = 2;

/// Exit code when no script matches.
const EXIT_NOT_FOUND: i32 = 3;

/// Default extension-to-engine bindings; `--engine` flags append after
/// these, so explicit bindings win per the last-registered-wins policy.
const DEFAULT_BINDINGS: &[(&str, &str)] = &[("js", "javascript"), ("html", "html")];

/// Stable error codes for resolve errors.
pub mod codes {
    pub const TYPE_INVALID: &str = "TYPE_INVALID";
    pub const ENGINE_BINDING_INVALID: &str = "ENGINE_BINDING_INVALID";
    pub const ROOT_INVALID: &str = "ROOT_INVALID";
}

/// Input for the resolve command.
pub struct ResolveArgs {
    pub raw_type: String,
    pub method: String,
    pub selectors: Vec<String>,
    pub extension: Option<String>,
    pub root: std::path::PathBuf,
    pub engines: Vec<String>,
    pub explain: bool,
    pub json: bool,
}

#[derive(Serialize)]
struct ResolvedScript {
    module: String,
    path: String,
    engine: String,
}

#[derive(Serialize)]
struct ResolveReport {
    schema_version: u32,
    ok: bool,
    resolved: Option<ResolvedScript>,
    tried: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<ResolveTrace>,
}

/// Run the resolve command.
pub fn run(args: &ResolveArgs) -> Result<()> {
    if !args.root.is_dir() {
        report_error(
            codes::ROOT_INVALID,
            &format!("script root {} is not a directory", args.root.display()),
            args.json,
        );
        std::process::exit(EXIT_VALIDATION_ERROR);
    }

    let resource_type = match ResourceType::parse(&args.raw_type) {
        Ok(rt) => rt,
        Err(e) => {
            report_error(codes::TYPE_INVALID, &e.to_string(), args.json);
            std::process::exit(EXIT_VALIDATION_ERROR);
        }
    };

    let registry = match build_registry(&args.engines) {
        Ok(registry) => registry,
        Err(message) => {
            report_error(codes::ENGINE_BINDING_INVALID, &message, args.json);
            std::process::exit(EXIT_VALIDATION_ERROR);
        }
    };

    let mut request =
        RequestDescriptor::new(&args.method).with_selectors(args.selectors.iter().cloned());
    if let Some(ext) = &args.extension {
        request = request.with_extension(ext);
    }

    let module = Arc::new(DirModule::new(args.root.clone()));
    let providers = [TypeProvider::new(vec![resource_type], module)];
    let ctx = ResolveContext {
        registry: &registry,
        mode: ResolveMode::Source,
    };

    tracing::debug!(
        method = %request.method,
        root = %args.root.display(),
        "resolving request"
    );

    let (outcome, trace) = if args.explain {
        let traced = resolve_with_trace(&ctx, &request, &providers).into_diagnostic()?;
        (traced.outcome, Some(traced.trace))
    } else {
        (resolve(&ctx, &request, &providers).into_diagnostic()?, None)
    };

    let found = outcome.executable.is_some();
    output_report(&outcome, trace, args.json)?;
    if !found {
        std::process::exit(EXIT_NOT_FOUND);
    }
    Ok(())
}

/// Build the engine registry from the defaults plus `--engine ext=name`
/// flags in flag order.
fn build_registry(engines: &[String]) -> std::result::Result<EngineRegistry, String> {
    let mut registry: EngineRegistry = DEFAULT_BINDINGS.iter().copied().collect();
    for binding in engines {
        let Some((extension, engine)) = binding.split_once('=') else {
            return Err(format!(
                "invalid engine binding {binding:?}, expected EXT=NAME"
            ));
        };
        if extension.is_empty() || engine.is_empty() {
            return Err(format!(
                "invalid engine binding {binding:?}, expected EXT=NAME"
            ));
        }
        registry.register(extension, engine);
    }
    Ok(registry)
}

fn output_report(
    outcome: &ResolveOutcome,
    trace: Option<ResolveTrace>,
    json: bool,
) -> Result<()> {
    if json {
        let resolved = outcome.executable.as_ref().map(|executable| match executable {
            Executable::Source {
                module,
                path,
                engine,
            } => ResolvedScript {
                module: module.clone(),
                path: path.clone(),
                engine: engine.clone(),
            },
            Executable::Precompiled { module, engine, .. } => ResolvedScript {
                module: module.clone(),
                path: String::new(),
                engine: engine.clone(),
            },
        });
        let report = ResolveReport {
            schema_version: RESOLVE_EXPLAIN_SCHEMA_VERSION,
            ok: outcome.executable.is_some(),
            resolved,
            tried: outcome.tried.clone(),
            trace,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).into_diagnostic()?
        );
        return Ok(());
    }

    match &outcome.executable {
        Some(executable) => {
            println!("resolved: {executable}");
            println!("module:   {}", executable.module());
        }
        None => {
            println!(
                "no script matched ({} path(s) probed)",
                outcome.tried.len()
            );
        }
    }

    if let Some(trace) = trace {
        println!();
        for step in &trace.steps {
            let mark = if step.ok { "ok  " } else { "miss" };
            println!("  {mark} {:<18} {}", step.step, step.detail);
        }
        for warning in &trace.warnings {
            println!("  warn {}: {}", warning.code, warning.message);
        }
    }

    Ok(())
}

fn report_error(code: &str, message: &str, json: bool) {
    if json {
        let error_json = serde_json::json!({
            "ok": false,
            "error": { "code": code, "message": message }
        });
        println!("{error_json:#}");
    } else {
        eprintln!("error: {message}");
    }
}
