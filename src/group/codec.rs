//! Binary layout of a group tree.
//!
//! The whole registry file is a single group encoding, no header:
//!
//! group        := child_count:u8 child*
//! child        := alias_child | group_child
//! alias_child  := 0x01 name:cstr path:cstr
//! group_child  := 0x02 name:cstr group
//! cstr         := byte* 0x00
//!
//! Aliases are written before subgroups, each in name order, so encoding the
//! same tree always yields the same bytes.

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::group::{Group, MAX_CHILDREN, MAX_DEPTH};

use log::warn;

const TAG_ALIAS: u8 = 1;
const TAG_GROUP: u8 = 2;

impl Group {
    /// Decode exactly one group encoding from `cursor`.
    ///
    /// Duplicate names are resolved last-read-wins, as the writer never
    /// produces them.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<Group> {
        Group::decode_at(cursor, 0)
    }

    fn decode_at(cursor: &mut ByteCursor<'_>, depth: usize) -> Result<Group> {
        let count = cursor
            .pop()
            .ok_or_else(|| Error::decode("unexpected end of data, expected child count"))?;

        let mut group = Group::new();
        for _ in 0..count {
            let offset = cursor.position();
            match cursor.pop() {
                Some(TAG_ALIAS) => {
                    let name = read_string(cursor, "alias name")?;
                    let path = read_string(cursor, "alias path")?;
                    if group.subgroups.contains_key(&name) {
                        warn!("alias '{}' shadows a group of the same name", name);
                    }
                    group.aliases.insert(name, path);
                }
                Some(TAG_GROUP) => {
                    let name = read_string(cursor, "group name")?;
                    if depth >= MAX_DEPTH {
                        return Err(Error::decode(format!(
                            "group nesting exceeds {} levels at offset {}",
                            MAX_DEPTH, offset
                        )));
                    }
                    let sub = Group::decode_at(cursor, depth + 1)?;
                    if group.aliases.contains_key(&name) {
                        warn!("group '{}' shadows an alias of the same name", name);
                    }
                    group.subgroups.insert(name, sub);
                }
                Some(tag) => {
                    return Err(Error::decode(format!(
                        "unknown entry tag {:#04x} at offset {}",
                        tag, offset
                    )));
                }
                None => {
                    return Err(Error::decode(
                        "unexpected end of data, expected entry tag",
                    ));
                }
            }
        }

        Ok(group)
    }

    /// Append this group's encoding to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        self.encode_at(out, 0)
    }

    fn encode_at(&self, out: &mut Vec<u8>, depth: usize) -> Result<()> {
        let count = self.child_count();
        let count = u8::try_from(count).map_err(|_| {
            Error::encode(format!(
                "group holds {} entries, at most {} can be stored",
                count, MAX_CHILDREN
            ))
        })?;
        out.push(count);

        for (name, path) in &self.aliases {
            out.push(TAG_ALIAS);
            write_cstr(out, name)?;
            write_cstr(out, path)?;
        }
        for (name, group) in &self.subgroups {
            if depth >= MAX_DEPTH {
                return Err(Error::encode(format!(
                    "group '{}' is nested more than {} levels deep",
                    name, MAX_DEPTH
                )));
            }
            out.push(TAG_GROUP);
            write_cstr(out, name)?;
            group.encode_at(out, depth + 1)?;
        }

        Ok(())
    }

    /// Decode a complete registry image. Bytes after the root group are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Group> {
        let mut cursor = ByteCursor::new(bytes);
        let group = Group::decode(&mut cursor)?;
        if cursor.remaining() > 0 {
            return Err(Error::decode(format!(
                "{} trailing bytes after root group at offset {}",
                cursor.remaining(),
                cursor.position()
            )));
        }
        Ok(group)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out)?;
        Ok(out)
    }
}

fn read_string(cursor: &mut ByteCursor<'_>, what: &str) -> Result<String> {
    let offset = cursor.position();
    let bytes = cursor
        .read_cstr()
        .ok_or_else(|| Error::decode(format!("unterminated {} at offset {}", what, offset)))?;
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        Error::decode(format!(
            "{} at offset {} is not valid UTF-8: {}",
            what, offset, e
        ))
    })
}

fn write_cstr(out: &mut Vec<u8>, s: &str) -> Result<()> {
    if s.contains('\0') {
        return Err(Error::encode(format!("{:?} contains a NUL byte", s)));
    }
    out.extend_from_slice(s.as_bytes());
    out.push(0);
    Ok(())
}
