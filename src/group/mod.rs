//! Alias group tree.
//!
//! A group owns two independent name-keyed mappings: aliases (name -> path)
//! and subgroups (name -> group). Subgroups are owned outright, so the whole
//! registry is a plain tree with no back-references.
//!
//! Lookups and edits take the accession already split into segments; every
//! segment but the last names a subgroup to descend into.

pub mod codec;

use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Maximum number of aliases plus subgroups a single group can hold.
/// The on-disk child count is a single byte.
pub const MAX_CHILDREN: usize = u8::MAX as usize;

/// Deepest group nesting below the root. Decoding, encoding and listing all
/// recurse once per level, so the bound keeps them off the end of the stack.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    aliases: BTreeMap<String, String>,
    subgroups: BTreeMap<String, Group>,
}

/// Edit applied to the entry named by the last accession segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    AddGroup,
    RemoveGroup,
    AddAlias(String),
    RemoveAlias,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    pub fn subgroups(&self) -> &BTreeMap<String, Group> {
        &self.subgroups
    }

    /// Combined number of immediate aliases and subgroups.
    pub fn child_count(&self) -> usize {
        self.aliases.len() + self.subgroups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty() && self.subgroups.is_empty()
    }

    /// Resolve an alias path. The last segment names the alias.
    pub fn get_path(&self, segments: &[&str]) -> Result<&str> {
        match segments {
            [] => Err(Error::invalid("empty alias accession")),
            [name] => self
                .aliases
                .get(*name)
                .map(String::as_str)
                .ok_or_else(|| Error::alias_not_found(name)),
            [first, rest @ ..] => self.subgroup(first)?.get_path(rest),
        }
    }

    /// Resolve a group. An empty segment list resolves to `self`.
    pub fn find_group(&self, segments: &[&str]) -> Result<&Group> {
        segments
            .iter()
            .try_fold(self, |group, name| group.subgroup(name))
    }

    /// Apply `action` to the entry named by the last segment.
    ///
    /// Intermediate groups must already exist; they are never created on the way.
    pub fn edit(&mut self, segments: &[&str], action: EditAction) -> Result<()> {
        if action == EditAction::AddGroup && segments.len() > MAX_DEPTH {
            return Err(Error::invalid(format!(
                "groups cannot be nested more than {} levels deep",
                MAX_DEPTH
            )));
        }
        match segments {
            [] => Err(Error::invalid("empty accession")),
            [name] => {
                match action {
                    EditAction::AddGroup => self.insert_group(name)?,
                    EditAction::RemoveGroup => {
                        self.subgroups.remove(*name);
                    }
                    EditAction::AddAlias(path) => self.insert_alias(name, path)?,
                    EditAction::RemoveAlias => {
                        self.aliases.remove(*name);
                    }
                }
                Ok(())
            }
            [first, rest @ ..] => self
                .subgroups
                .get_mut(*first)
                .ok_or_else(|| Error::group_not_found(first))?
                .edit(rest, action),
        }
    }

    /// Insert or overwrite an alias at this level.
    pub fn insert_alias(&mut self, name: &str, path: String) -> Result<()> {
        check_name("alias", name)?;
        if path.contains('\0') {
            return Err(Error::invalid(format!("path of '{}' contains a NUL byte", name)));
        }
        if self.subgroups.contains_key(name) {
            return Err(Error::invalid(format!(
                "'{}' is already a group at this level",
                name
            )));
        }
        if !self.aliases.contains_key(name) {
            self.check_capacity(name)?;
        }
        self.aliases.insert(name.to_string(), path);
        Ok(())
    }

    /// Insert an empty group at this level, replacing any group of that name.
    pub fn insert_group(&mut self, name: &str) -> Result<()> {
        check_name("group", name)?;
        if self.aliases.contains_key(name) {
            return Err(Error::invalid(format!(
                "'{}' is already an alias at this level",
                name
            )));
        }
        if !self.subgroups.contains_key(name) {
            self.check_capacity(name)?;
        }
        self.subgroups.insert(name.to_string(), Group::new());
        Ok(())
    }

    pub fn remove_alias(&mut self, name: &str) -> Option<String> {
        self.aliases.remove(name)
    }

    fn subgroup(&self, name: &str) -> Result<&Group> {
        self.subgroups
            .get(name)
            .ok_or_else(|| Error::group_not_found(name))
    }

    fn check_capacity(&self, name: &str) -> Result<()> {
        if self.child_count() >= MAX_CHILDREN {
            return Err(Error::invalid(format!(
                "cannot add '{}': group already holds {} entries",
                name, MAX_CHILDREN
            )));
        }
        Ok(())
    }
}

/// Names are stored NUL-terminated.
fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid(format!("empty {} name", kind)));
    }
    if name.contains('\0') {
        return Err(Error::invalid(format!("{} name {:?} contains a NUL byte", kind, name)));
    }
    Ok(())
}
