//! Filesystem-backed script module.

use scriptfinder_core::{ScriptModule, UnitType};
use std::path::PathBuf;
use std::sync::Arc;

/// A [`ScriptModule`] over a directory tree.
///
/// Stored entries are probed as plain files relative to the root, so a
/// script the resolver asks for at `scripts/app/component/GET.html` is the
/// file `<root>/scripts/app/component/GET.html`. Directory modules carry no
/// compiled units.
pub struct DirModule {
    name: String,
    root: PathBuf,
}

impl DirModule {
    /// Create a module over `root`, named after its final path component.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        let name = root
            .file_name()
            .map_or_else(|| "scripts".to_string(), |n| n.to_string_lossy().into_owned());
        Self { name, root }
    }
}

impl ScriptModule for DirModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn entry(&self, path: &str) -> Option<String> {
        let full = self.root.join(path);
        full.is_file().then(|| full.to_string_lossy().into_owned())
    }

    fn unit(&self, _identifier: &str) -> Option<Arc<dyn UnitType>> {
        None
    }
}
