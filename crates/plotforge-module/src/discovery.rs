//! Filesystem module discovery
//!
//! Scans the immediate subdirectories of a module root for `module.toml`
//! manifests. Malformed or manifest-less directories are skipped without
//! aborting the scan; an absent root is a hard error.

use crate::descriptor::{ModuleDescriptor, ModuleManifest, MANIFEST_FILE};
use crate::error::ModuleError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Discover modules under `root`, optionally filtered by type tag
///
/// Returns a name-to-descriptor map. Consumers must not depend on any
/// particular iteration order.
///
/// # Errors
/// Returns [`ModuleError::RootNotFound`] when `root` does not exist and
/// [`ModuleError::ScanFailed`] when the directory listing itself fails.
pub fn discover(
    root: &Path,
    type_filter: Option<&str>,
) -> Result<BTreeMap<String, ModuleDescriptor>, ModuleError> {
    if !root.is_dir() {
        return Err(ModuleError::RootNotFound(root.to_path_buf()));
    }

    let entries = fs::read_dir(root).map_err(|source| ModuleError::ScanFailed {
        path: root.to_path_buf(),
        source,
    })?;

    let mut discovered = BTreeMap::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(root = %root.display(), error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        let raw = match fs::read_to_string(&manifest_path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!(dir = %dir.display(), "no module manifest, skipping");
                continue;
            }
        };
        let manifest: ModuleManifest = match toml::from_str(&raw) {
            Ok(manifest) => manifest,
            Err(err) => {
                debug!(manifest = %manifest_path.display(), error = %err, "malformed manifest, skipping");
                continue;
            }
        };

        if let Some(wanted) = type_filter {
            if manifest.module_type != wanted {
                continue;
            }
        }

        let descriptor = ModuleDescriptor::from_manifest(manifest, &dir);
        discovered.insert(descriptor.name.clone(), descriptor);
    }

    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_module(root: &Path, dir: &str, manifest: &str) {
        let module_dir = root.join(dir);
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join(MANIFEST_FILE), manifest).unwrap();
    }

    #[test]
    fn absent_root_is_hard_error() {
        let result = discover(Path::new("/definitely/not/here"), None);
        assert!(matches!(result, Err(ModuleError::RootNotFound(_))));
    }

    #[test]
    fn well_formed_module_found_empty_directory_skipped() {
        let root = TempDir::new().unwrap();
        write_module(
            root.path(),
            "standard",
            r#"
            type = "plot"
            backend = "builtin.standard"
            capabilities = ["generate_single"]
            "#,
        );
        fs::create_dir_all(root.path().join("empty")).unwrap();

        let discovered = discover(root.path(), Some("plot")).unwrap();
        assert_eq!(discovered.len(), 1);
        assert!(discovered.contains_key("standard"));
    }

    #[test]
    fn malformed_manifest_skipped_silently() {
        let root = TempDir::new().unwrap();
        write_module(root.path(), "broken", "type = [not toml");
        write_module(
            root.path(),
            "good",
            r#"
            type = "plot"
            backend = "builtin.good"
            "#,
        );

        let discovered = discover(root.path(), None).unwrap();
        assert_eq!(discovered.len(), 1);
        assert!(discovered.contains_key("good"));
    }

    #[test]
    fn type_filter_excludes_other_tags() {
        let root = TempDir::new().unwrap();
        write_module(
            root.path(),
            "plots",
            r#"
            type = "plot"
            backend = "builtin.plots"
            "#,
        );
        write_module(
            root.path(),
            "domain",
            r#"
            type = "domain"
            backend = "builtin.domain"
            "#,
        );

        let plots = discover(root.path(), Some("plot")).unwrap();
        assert_eq!(plots.len(), 1);
        let all = discover(root.path(), None).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn loose_files_in_root_are_ignored() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("README.md"), "not a module").unwrap();

        let discovered = discover(root.path(), None).unwrap();
        assert!(discovered.is_empty());
    }
}
