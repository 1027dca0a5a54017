//! `scriptfinder candidates` command implementation.

use miette::{IntoDiagnostic, Result};
use scriptfinder_core::version::SCHEMA_VERSION;
use scriptfinder_core::{candidates, RequestDescriptor, ResourceType};
use serde::Serialize;

/// Exit code for validation errors.
const EXIT_VALIDATION_ERROR: i32 = 2;

/// Stable error codes for candidates errors.
pub mod codes {
    pub const TYPE_INVALID: &str = "TYPE_INVALID";
}

#[derive(Serialize)]
struct CandidatesOutput {
    schema_version: u32,
    resource_type: String,
    method: String,
    selectors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extension: Option<String>,
    candidates: Vec<String>,
}

/// Print the ordered candidate script names for a request descriptor.
pub fn run(
    raw_type: &str,
    method: &str,
    selectors: &[String],
    extension: Option<&str>,
    json: bool,
) -> Result<()> {
    let resource_type = match ResourceType::parse(raw_type) {
        Ok(rt) => rt,
        Err(e) => {
            report_error(codes::TYPE_INVALID, &e.to_string(), json);
            std::process::exit(EXIT_VALIDATION_ERROR);
        }
    };

    let mut request = RequestDescriptor::new(method).with_selectors(selectors.iter().cloned());
    if let Some(ext) = extension {
        request = request.with_extension(ext);
    }

    let list: Vec<String> = candidates(&request, &resource_type).collect();

    if json {
        let output = CandidatesOutput {
            schema_version: SCHEMA_VERSION,
            resource_type: resource_type.to_string(),
            method: request.method.clone(),
            selectors: request.selectors.clone(),
            extension: request.extension.clone(),
            candidates: list,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).into_diagnostic()?
        );
    } else {
        for candidate in &list {
            println!("{candidate}");
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
