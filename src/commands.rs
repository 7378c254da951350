//! Alias management sub-commands and their dispatch against a registry.

use crate::Result;
use crate::registry::Registry;
use crate::view;

use anyhow::{Context, bail};
use clap::{Subcommand, ValueEnum};
use std::io::Write;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add aliases (NAME PATH pairs) or groups (NAMEs).
    #[command(visible_alias = "a")]
    Add {
        kind: EntryKind,

        #[arg(required = true, value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Remove aliases or groups. Removing something absent is not an error.
    #[command(visible_alias = "r")]
    Rem {
        kind: EntryKind,

        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,
    },

    /// Print the alias tree, or the subtree under GROUP.
    #[command(visible_alias = "l")]
    List {
        group: Option<String>,

        /// Print the tree as JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Print the path each alias points to.
    #[command(visible_alias = "i")]
    Info {
        #[arg(required = true, value_name = "ALIAS")]
        aliases: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    #[value(alias = "a")]
    Alias,
    #[value(alias = "g")]
    Group,
}

/// Run `cmd` against `registry`, writing its output to `out`.
///
/// Arguments are applied in order; the first failure stops the command, after
/// the output of the arguments before it has been written.
pub fn execute(cmd: &Command, registry: &mut Registry, out: &mut impl Write) -> Result<()> {
    match cmd {
        Command::Add {
            kind: EntryKind::Alias,
            args,
        } => {
            if args.len() % 2 != 0 {
                bail!(
                    "add alias expects NAME PATH pairs, got {} argument(s)",
                    args.len()
                );
            }
            for pair in args.chunks_exact(2) {
                let (name, path) = (&pair[0], &pair[1]);
                registry
                    .add_alias(name, path)
                    .with_context(|| format!("failed to add alias {}", name))?;
            }
        }
        Command::Add {
            kind: EntryKind::Group,
            args,
        } => {
            for name in args {
                registry
                    .add_group(name)
                    .with_context(|| format!("failed to add group {}", name))?;
            }
        }
        Command::Rem {
            kind: EntryKind::Alias,
            names,
        } => {
            for name in names {
                registry
                    .remove_alias(name)
                    .with_context(|| format!("failed to remove alias {}", name))?;
            }
        }
        Command::Rem {
            kind: EntryKind::Group,
            names,
        } => {
            for name in names {
                registry
                    .remove_group(name)
                    .with_context(|| format!("failed to remove group {}", name))?;
            }
        }
        Command::List { group, json } => {
            let at = group.as_deref().unwrap_or("");
            let text = if *json {
                let target = registry
                    .group(at)
                    .with_context(|| format!("cannot list {}", at))?;
                view::render_json(target)?
            } else if at.is_empty() {
                registry.list()
            } else {
                registry
                    .list_at(at)
                    .with_context(|| format!("cannot list {}", at))?
            };
            out.write_all(text.as_bytes())?;
        }
        Command::Info { aliases } => {
            for alias in aliases {
                let path = registry
                    .get_path(alias)
                    .with_context(|| format!("invalid alias {}", alias))?;
                writeln!(out, "{}\t{}", alias, path)?;
            }
        }
    }

    Ok(())
}
