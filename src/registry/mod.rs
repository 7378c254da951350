//! Alias registry: the root group, a dirty flag, and file persistence.
//!
//! The backing file is read whole on load and rewritten whole on save. There
//! is no locking; two processes editing the same file can lose updates.

pub mod accession;

use crate::error::{Error, Result};
use crate::group::{EditAction, Group};
use crate::view;

pub use accession::Accession;

use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Default)]
pub struct Registry {
    root: Group,
    changed: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry stored at `path`.
    ///
    /// A file that cannot be read (most commonly, one that does not exist yet)
    /// yields an empty registry. A file that can be read but does not decode,
    /// including a 0-byte one, is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(
                    "registry {} not readable ({}), starting empty",
                    path.display(),
                    err
                );
                return Ok(Self::new());
            }
        };

        let root = Group::from_bytes(&bytes)?;
        debug!(
            "loaded registry {} ({} bytes, {} top-level entries)",
            path.display(),
            bytes.len(),
            root.child_count()
        );
        Ok(Self {
            root,
            changed: false,
        })
    }

    /// Write the registry to `path` if it changed since it was loaded.
    ///
    /// The new image goes to a temporary file next to `path` and is renamed
    /// over it, so a failed save leaves the previous file intact. Returns
    /// whether anything was written.
    pub fn save(&mut self, path: &Path) -> Result<bool> {
        if !self.is_changed() {
            debug!("registry unchanged, not writing {}", path.display());
            return Ok(false);
        }

        let bytes = self.root.to_bytes()?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(Error::io(format!(
            "could not create registry directory {}",
            dir.display()
        )))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(Error::io(format!(
            "could not create temporary file in {}",
            dir.display()
        )))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(Error::io(format!(
                "could not write {}",
                tmp.path().display()
            )))?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .map_err(Error::io(format!(
                "could not save alias registry to {}",
                path.display()
            )))?;

        self.changed = false;
        info!("saved registry to {} ({} bytes)", path.display(), bytes.len());
        Ok(true)
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Path an alias accession points to.
    pub fn get_path(&self, accession: &str) -> Result<&str> {
        match Accession::parse(accession)? {
            Accession::RootScope(key) => self
                .root
                .aliases()
                .get(key)
                .map(String::as_str)
                .ok_or_else(|| Error::alias_not_found(accession)),
            Accession::Path(segments) => self.root.get_path(&segments),
        }
    }

    /// Group an accession points to. The empty string is the root.
    pub fn group(&self, accession: &str) -> Result<&Group> {
        if accession.is_empty() {
            return Ok(self.root());
        }
        self.root.find_group(&accession::split(accession)?)
    }

    pub fn add_alias(&mut self, name: &str, path: &str) -> Result<()> {
        match Accession::parse(name)? {
            Accession::RootScope(key) => self.root.insert_alias(key, path.to_string())?,
            Accession::Path(segments) => self
                .root
                .edit(&segments, EditAction::AddAlias(path.to_string()))?,
        }
        debug!("added alias {} -> {}", name, path);
        self.mark_changed();
        Ok(())
    }

    pub fn remove_alias(&mut self, name: &str) -> Result<()> {
        match Accession::parse(name)? {
            Accession::RootScope(key) => {
                self.root.remove_alias(key);
            }
            Accession::Path(segments) => self.root.edit(&segments, EditAction::RemoveAlias)?,
        }
        debug!("removed alias {}", name);
        self.mark_changed();
        Ok(())
    }

    /// Group accessions are always split on `:`; there is no root-scope form.
    pub fn add_group(&mut self, name: &str) -> Result<()> {
        self.root
            .edit(&accession::split(name)?, EditAction::AddGroup)?;
        debug!("added group {}", name);
        self.mark_changed();
        Ok(())
    }

    pub fn remove_group(&mut self, name: &str) -> Result<()> {
        self.root
            .edit(&accession::split(name)?, EditAction::RemoveGroup)?;
        debug!("removed group {}", name);
        self.mark_changed();
        Ok(())
    }

    /// Indented listing of the whole tree.
    pub fn list(&self) -> String {
        view::render_listing(&self.root)
    }

    /// Indented listing of the group at `accession`.
    pub fn list_at(&self, accession: &str) -> Result<String> {
        Ok(view::render_listing(self.group(accession)?))
    }

    // Set even when an edit turned out to be a no-op.
    fn mark_changed(&mut self) {
        self.changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_alias_round_trip() {
        let mut reg = Registry::new();
        reg.add_group("a").unwrap();
        reg.add_alias("a:b", "/x").unwrap();
        assert_eq!(reg.get_path("a:b").unwrap(), "/x");

        reg.add_group("g1").unwrap();
        reg.add_alias("g1:x", "/y").unwrap();
        assert_eq!(reg.get_path("g1:x").unwrap(), "/y");
    }

    #[test]
    fn root_scope_keeps_colons_in_alias_name() {
        let mut reg = Registry::new();
        reg.add_alias(":weird:name", "/z").unwrap();
        assert_eq!(reg.get_path(":weird:name").unwrap(), "/z");
        assert_eq!(reg.root().aliases().get("weird:name").unwrap(), "/z");
        // Not reachable by splitting: there is no group `weird`.
        assert!(matches!(
            reg.get_path("weird:name"),
            Err(Error::NotFound { kind: "group", .. })
        ));

        reg.remove_alias(":weird:name").unwrap();
        assert!(reg.root().is_empty());
    }

    #[test]
    fn plain_root_alias_is_reachable_both_ways() {
        let mut reg = Registry::new();
        reg.add_alias("home", "/home/me").unwrap();
        assert_eq!(reg.get_path("home").unwrap(), "/home/me");
        assert_eq!(reg.get_path(":home").unwrap(), "/home/me");
    }

    #[test]
    fn removing_missing_alias_only_marks_dirty() {
        let mut reg = Registry::new();
        reg.add_alias("keep", "/k").unwrap();
        reg.changed = false;
        let before = reg.root().clone();

        reg.remove_alias("nope").unwrap();
        assert_eq!(reg.root(), &before);
        assert!(reg.is_changed());
    }

    #[test]
    fn failed_edit_leaves_registry_clean() {
        let mut reg = Registry::new();
        assert!(matches!(
            reg.add_alias("missing:x", "/x"),
            Err(Error::NotFound { kind: "group", .. })
        ));
        assert!(matches!(reg.add_group(""), Err(Error::InvalidArgument { .. })));
        assert!(!reg.is_changed());
    }

    #[test]
    fn group_accessions_ignore_root_scope_marker() {
        let mut reg = Registry::new();
        assert!(matches!(
            reg.add_group(":g"),
            Err(Error::InvalidArgument { .. })
        ));
        reg.add_group("g").unwrap();
        reg.add_group("g:h").unwrap();
        reg.remove_group("g:h").unwrap();
        assert!(reg.group("g").unwrap().is_empty());
    }

    #[test]
    fn empty_registry_lists_placeholder() {
        assert_eq!(Registry::new().list(), "(none)\n");
    }

    #[test]
    fn lists_subtree() {
        let mut reg = Registry::new();
        reg.add_group("g").unwrap();
        reg.add_alias("g:x", "/x").unwrap();
        assert_eq!(reg.list_at("g").unwrap(), "x\n");
        assert!(reg.list_at("nope").is_err());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry");

        let mut reg = Registry::new();
        reg.add_group("work").unwrap();
        reg.add_alias("work:cy", "/src/cy").unwrap();
        reg.add_alias(":a:b", "/ab").unwrap();
        assert!(reg.save(&path).unwrap());
        assert!(!reg.is_changed());

        let loaded = Registry::load(&path).unwrap();
        assert_eq!(loaded.root(), reg.root());
        assert!(!loaded.is_changed());
        assert_eq!(loaded.get_path("work:cy").unwrap(), "/src/cy");
        assert_eq!(loaded.get_path(":a:b").unwrap(), "/ab");

        assert_eq!(fs::read(&path).unwrap(), reg.root().to_bytes().unwrap());
    }

    #[test]
    fn save_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("registry");

        let mut reg = Registry::new();
        reg.add_alias("x", "/x").unwrap();
        assert!(reg.save(&path).unwrap());
        assert_eq!(Registry::load(&path).unwrap().get_path("x").unwrap(), "/x");
    }

    #[test]
    fn missing_file_loads_empty_and_save_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");

        let mut reg = Registry::load(&path).unwrap();
        assert_eq!(reg.root(), Registry::new().root());
        assert!(!reg.is_changed());

        assert!(!reg.save(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry");
        fs::write(&path, b"\x01\x09").unwrap();

        assert!(matches!(Registry::load(&path), Err(Error::Decode { .. })));
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry");
        fs::write(&path, b"").unwrap();

        assert!(matches!(Registry::load(&path), Err(Error::Decode { .. })));
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let mut reg = Registry::new();
        reg.add_alias("x", "/x").unwrap();
        let err = reg.save(&blocker.join("registry")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(reg.is_changed());
    }
}
