//! Field paths into JSON records and the copy-on-write updater built on them.
//!
//! A path is parsed once from the closed grammar
//!
//! ```text
//! path    := ident ( '.' ident | '.' digits | '[' digits ']' )*
//! ident   := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! so `father.fullName`, `addresses[0].district` and `addresses.0.district`
//! are all valid, while `father..fullName` or `addresses[x]` are rejected up
//! front instead of silently creating stray keys. Indices above
//! [`MAX_INDEX`] are rejected as well, since setting one pads the array up to
//! that length.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::PathError;

/// Largest list index a path may address.
pub const MAX_INDEX: usize = 10_000;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A validated, pre-split path into a nested record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }

        let bytes = input.as_bytes();
        let mut segments = Vec::new();
        let mut i = 0;
        let mut expect_segment = true;

        while i < bytes.len() {
            let b = bytes[i];
            if expect_segment {
                if b.is_ascii_digit() {
                    // Only `.0` style indices may start with a digit, never the first segment.
                    if segments.is_empty() {
                        return Err(PathError::UnexpectedChar {
                            found: b as char,
                            at: i,
                        });
                    }
                    let (index, end) = parse_index(input, i)?;
                    segments.push(Segment::Index(index));
                    i = end;
                } else if b == b'_' || b.is_ascii_alphabetic() {
                    let end = bytes[i..]
                        .iter()
                        .position(|c| !(c.is_ascii_alphanumeric() || *c == b'_'))
                        .map_or(bytes.len(), |p| i + p);
                    segments.push(Segment::Key(input[i..end].to_string()));
                    i = end;
                } else if b == b'.' {
                    return Err(PathError::EmptySegment(i));
                } else {
                    return Err(unexpected(input, i));
                }
                expect_segment = false;
                continue;
            }

            match b {
                b'.' => {
                    expect_segment = true;
                    i += 1;
                }
                b'[' => {
                    let start = i;
                    let (index, end) = parse_index(input, i + 1)?;
                    if bytes.get(end) != Some(&b']') {
                        return Err(PathError::UnclosedBracket(start));
                    }
                    segments.push(Segment::Index(index));
                    i = end + 1;
                }
                _ => return Err(unexpected(input, i)),
            }
        }

        if expect_segment {
            return Err(PathError::EmptySegment(input.len()));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Read the value at this path, if every step exists.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match segment {
                Segment::Key(key) => node.as_object()?.get(key),
                Segment::Index(index) => node.as_array()?.get(*index),
            })
    }
}

fn parse_index(input: &str, start: usize) -> Result<(usize, usize), PathError> {
    let bytes = input.as_bytes();
    let len = bytes[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .unwrap_or(bytes.len() - start);
    if len == 0 {
        return if start < bytes.len() {
            Err(unexpected(input, start))
        } else {
            Err(PathError::UnclosedBracket(start.saturating_sub(1)))
        };
    }
    let end = start + len;
    let index = input[start..end]
        .parse::<usize>()
        .ok()
        .filter(|index| *index <= MAX_INDEX)
        .ok_or(PathError::IndexOverflow(start))?;
    Ok((index, end))
}

fn unexpected(input: &str, at: usize) -> PathError {
    let found = input[at..].chars().next().unwrap_or('\0');
    PathError::UnexpectedChar { found, at }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Return a copy of `root` with `value` stored at `path`.
///
/// Intermediate nodes that are missing, null, or of the wrong kind are
/// replaced with an empty array (index segment) or object (key segment).
/// Arrays are padded with `null` up to the addressed index.
pub fn set_path(root: &Value, path: &FieldPath, value: Value) -> Value {
    set_in(Some(root), path.segments(), value)
}

/// Read `path` from `root`.
pub fn get_path<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.get(root)
}

fn set_in(node: Option<&Value>, segments: &[Segment], value: Value) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };

    match head {
        Segment::Key(key) => {
            let mut map = match node {
                Some(Value::Object(map)) => map.clone(),
                _ => Map::new(),
            };
            let child = set_in(map.get(key), rest, value);
            map.insert(key.clone(), child);
            Value::Object(map)
        }
        Segment::Index(index) => {
            let mut items = match node {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            let Some(len) = index.checked_add(1) else {
                return Value::Array(items);
            };
            if items.len() < len {
                items.resize(len, Value::Null);
            }
            let child = set_in(items.get(*index), rest, value);
            if let Some(slot) = items.get_mut(*index) {
                *slot = child;
            }
            Value::Array(items)
        }
    }
}
