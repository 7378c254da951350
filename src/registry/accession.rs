//! Accession strings: `group:subgroup:name`, or `:name` for a root alias.

use crate::error::{Error, Result};

/// Separates the segments of an accession.
pub const DELIMITER: char = ':';

/// Leading marker that addresses a root alias by its full, unsplit name.
pub const ROOT_SCOPE: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accession<'a> {
    /// Key into the root alias mapping, used verbatim (may contain `:`).
    RootScope(&'a str),
    /// Group names followed by the target name.
    Path(Vec<&'a str>),
}

impl<'a> Accession<'a> {
    /// Parse an alias accession, honoring the root-scope marker.
    pub fn parse(s: &'a str) -> Result<Self> {
        match s.strip_prefix(ROOT_SCOPE) {
            Some("") => Err(Error::invalid(format!(
                "'{}' must be followed by an alias name",
                ROOT_SCOPE
            ))),
            Some(key) => Ok(Accession::RootScope(key)),
            None => Ok(Accession::Path(split(s)?)),
        }
    }
}

/// Split an accession into segments without the root-scope shortcut.
///
/// Every segment must be non-empty, so `""`, `":a"`, `"a::b"` and `"a:"` are
/// all rejected.
pub fn split(s: &str) -> Result<Vec<&str>> {
    if s.is_empty() {
        return Err(Error::invalid("empty accession"));
    }
    let segments: Vec<&str> = s.split(DELIMITER).collect();
    if segments.iter().any(|seg| seg.is_empty()) {
        return Err(Error::invalid(format!(
            "accession '{}' has an empty segment",
            s
        )));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_colons() {
        assert_eq!(
            Accession::parse("work:repos:cy").unwrap(),
            Accession::Path(vec!["work", "repos", "cy"])
        );
        assert_eq!(
            Accession::parse("home").unwrap(),
            Accession::Path(vec!["home"])
        );
    }

    #[test]
    fn root_scope_keeps_inner_colons() {
        assert_eq!(
            Accession::parse(":weird:name").unwrap(),
            Accession::RootScope("weird:name")
        );
    }

    #[test]
    fn rejects_empty_forms() {
        for bad in ["", ":", "a::b", "a:"] {
            assert!(
                matches!(Accession::parse(bad), Err(Error::InvalidArgument { .. })),
                "{:?} should be rejected",
                bad
            );
        }
        assert!(split(":a").is_err());

        // Everything after the marker is the key, even a lone colon.
        assert_eq!(Accession::parse("::").unwrap(), Accession::RootScope(":"));
    }
}
