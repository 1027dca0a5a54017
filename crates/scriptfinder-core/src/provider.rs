//! Providers and the module capability boundary.
//!
//! A module is the opaque entity that stores scripts and compiled units.
//! How modules are discovered, ordered, and indexed is an external concern;
//! the core only probes them through [`ScriptModule`].

use crate::error::InstantiationError;
use crate::resource_type::ResourceType;
use std::fmt;
use std::sync::Arc;

/// Capability boundary to a script-providing module.
///
/// Both lookups treat absence as a normal outcome; a module must never fail
/// a probe, only answer it.
pub trait ScriptModule: Send + Sync {
    /// Stable module name, used for provider identity in reports and logs.
    fn name(&self) -> &str;

    /// Look up a stored entry by path, returning its located path or URL.
    fn entry(&self, path: &str) -> Option<String>;

    /// Look up a compiled unit type by its qualified identifier.
    fn unit(&self, identifier: &str) -> Option<Arc<dyn UnitType>>;
}

/// A located compiled unit type, not yet instantiated.
///
/// Instantiation is attempted by the resolver; a failure here is fatal to
/// the whole resolution because it indicates a packaging defect rather than
/// an absence.
pub trait UnitType: Send + Sync {
    fn instantiate(&self) -> Result<Box<dyn RenderUnit>, InstantiationError>;
}

/// An instantiated compiled unit, opaque to the core.
///
/// Execution belongs to the surrounding engine; the core only hands the
/// instance back to the caller.
pub trait RenderUnit: Send + fmt::Debug {
    /// Unit name for reporting.
    fn name(&self) -> &str;
}

/// Association between a set of advertised resource types and the module
/// that provides them.
///
/// Constructed once per discovered module and immutable thereafter. The
/// owning registry keeps providers alive; the resolver only borrows them
/// for the duration of one resolution call.
#[derive(Clone)]
pub struct TypeProvider {
    resource_types: Vec<ResourceType>,
    module: Arc<dyn ScriptModule>,
}

impl TypeProvider {
    /// Build a provider for the given resource types and module.
    #[must_use]
    pub fn new(resource_types: Vec<ResourceType>, module: Arc<dyn ScriptModule>) -> Self {
        Self {
            resource_types,
            module,
        }
    }

    /// The advertised resource types, in advertisement order.
    #[must_use]
    pub fn resource_types(&self) -> &[ResourceType] {
        &self.resource_types
    }

    /// The providing module.
    #[must_use]
    pub fn module(&self) -> &Arc<dyn ScriptModule> {
        &self.module
    }
}

impl PartialEq for TypeProvider {
    fn eq(&self, other: &Self) -> bool {
        self.resource_types == other.resource_types && Arc::ptr_eq(&self.module, &other.module)
    }
}

impl Eq for TypeProvider {}

impl fmt::Debug for TypeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeProvider")
            .field("resource_types", &self.resource_types)
            .field("module", &self.module.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct EmptyModule(&'static str);

    impl ScriptModule for EmptyModule {
        fn name(&self) -> &str {
            self.0
        }

        fn entry(&self, _path: &str) -> Option<String> {
            None
        }

        fn unit(&self, _identifier: &str) -> Option<Arc<dyn UnitType>> {
            None
        }
    }

    #[test]
    fn test_provider_equality_is_module_identity() {
        let types = vec![ResourceType::parse("a/b").unwrap()];
        let module: Arc<dyn ScriptModule> = Arc::new(EmptyModule("m"));
        let other: Arc<dyn ScriptModule> = Arc::new(EmptyModule("m"));

        let p1 = TypeProvider::new(types.clone(), Arc::clone(&module));
        let p2 = TypeProvider::new(types.clone(), Arc::clone(&module));
        let p3 = TypeProvider::new(types, other);

        assert_eq!(p1, p2);
        assert_ne!(p1, p3);
    }
}
