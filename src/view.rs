//! Printable views of a group tree: the indented `list` output and a JSON view.

use crate::group::Group;

use serde::Serialize;
use std::collections::BTreeMap;

/// Shown in place of a group that holds nothing.
pub const EMPTY_PLACEHOLDER: &str = "(none)";

/// Render `group` as an indented listing, one entry per line.
///
/// Alias names come first, then each subgroup as `name:` followed by its own
/// listing one tab deeper. Both are in name order, matching the file order.
pub fn render_listing(group: &Group) -> String {
    let mut out = String::new();
    write_listing(group, 0, &mut out);
    out
}

fn write_listing(group: &Group, depth: usize, out: &mut String) {
    let indent = "\t".repeat(depth);

    if group.is_empty() {
        out.push_str(&indent);
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
        return;
    }

    for name in group.aliases().keys() {
        out.push_str(&indent);
        out.push_str(name);
        out.push('\n');
    }
    for (name, sub) in group.subgroups() {
        out.push_str(&indent);
        out.push_str(name);
        out.push_str(":\n");
        write_listing(sub, depth + 1, out);
    }
}

/// Serializable mirror of a group, used by `list --json`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub aliases: BTreeMap<String, String>,
    pub groups: BTreeMap<String, GroupView>,
}

impl From<&Group> for GroupView {
    fn from(group: &Group) -> Self {
        GroupView {
            aliases: group.aliases().clone(),
            groups: group
                .subgroups()
                .iter()
                .map(|(name, sub)| (name.clone(), GroupView::from(sub)))
                .collect(),
        }
    }
}

pub fn render_json(group: &Group) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(&GroupView::from(group))?;
    json.push('\n');
    Ok(json)
}
