#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Core resolution logic for scriptfinder.
//!
//! Resolves a request descriptor (resource type, method, selectors,
//! extension) to a single executable script drawn from an ordered set of
//! providers. See [`resolver::resolve`] for the entry point.

pub mod candidates;
pub mod config;
pub mod error;
pub mod mangle;
pub mod provider;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod resource_type;
pub mod version;

pub use candidates::candidates;
pub use config::Config;
pub use error::{Error, InstantiationError};
pub use provider::{RenderUnit, ScriptModule, TypeProvider, UnitType};
pub use registry::{EngineBinding, EngineRegistry};
pub use request::{RequestDescriptor, DEFAULT_METHODS};
pub use resolver::{
    resolve, resolve_with_trace, Executable, ResolveContext, ResolveMode, ResolveOutcome,
    ResolveOutcomeWithTrace, ResolveTrace, SCRIPTS_ROOT,
};
pub use resource_type::{ResourceType, TypeVersion};
pub use version::VERSION;
