#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod commands;
mod logging;
mod module;

use clap::Parser;
use miette::Result;
use scriptfinder_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scriptfinder")]
#[command(author, version, about = "Resolve request descriptors to bundled scripts", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Print the ordered candidate script names for a request descriptor
    Candidates {
        /// Resource type, optionally versioned (e.g. "app/component" or "app/component/1.0.0")
        resource_type: String,

        /// HTTP-like method name
        #[arg(long, default_value = "GET")]
        method: String,

        /// Request selectors, most significant first
        #[arg(long, value_delimiter = ',')]
        selectors: Vec<String>,

        /// Request extension (e.g. "html")
        #[arg(long)]
        extension: Option<String>,
    },

    /// Resolve a request descriptor against a script directory
    Resolve {
        /// Resource type, optionally versioned
        resource_type: String,

        /// Directory containing the module's "scripts/" tree
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// HTTP-like method name
        #[arg(long, default_value = "GET")]
        method: String,

        /// Request selectors, most significant first
        #[arg(long, value_delimiter = ',')]
        selectors: Vec<String>,

        /// Request extension (e.g. "html")
        #[arg(long)]
        extension: Option<String>,

        /// Extra engine bindings as EXT=NAME, appended after the defaults
        #[arg(long = "engine", value_name = "EXT=NAME")]
        engines: Vec<String>,

        /// Include the step-by-step resolution trace
        #[arg(long)]
        explain: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Candidates {
            resource_type,
            method,
            selectors,
            extension,
        }) => commands::candidates::run(
            &resource_type,
            &method,
            &selectors,
            extension.as_deref(),
            cli.json,
        ),
        Some(Commands::Resolve {
            resource_type,
            root,
            method,
            selectors,
            extension,
            engines,
            explain,
        }) => {
            let root = if root.is_absolute() {
                root
            } else {
                cwd.join(root)
            };
            commands::resolve::run(&commands::resolve::ResolveArgs {
                raw_type: resource_type,
                method,
                selectors,
                extension,
                root,
                engines,
                explain,
                json: cli.json,
            })
        }
    }
}
