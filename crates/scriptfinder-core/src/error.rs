use thiserror::Error;

/// Core error type for scriptfinder operations.
///
/// A candidate that matches nothing is never an error; "not found" is a
/// normal resolution outcome and is reported as a value, not through this
/// type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot extract a type from the resource type string {raw:?}")]
    InvalidType { raw: String },

    #[error("cannot instantiate precompiled unit {identifier} from module {module}: {source}")]
    UnitInstantiation {
        identifier: String,
        module: String,
        #[source]
        source: InstantiationError,
    },
}

/// Failure raised by a module while constructing a located compiled unit.
///
/// Distinct from absence: the unit type was found but could not be built,
/// which indicates a packaging defect in the providing module.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct InstantiationError {
    pub message: String,
}

impl InstantiationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
