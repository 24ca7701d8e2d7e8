// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::PatternSyntaxError;
use std::fmt;
use std::str::FromStr;

/// Concrete location of a node while the comparator walks the documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path {
    Root,
    Keys(Vec<Key>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Object field.
    Field(String),
    /// Array element addressed by position.
    Idx(usize),
    /// Array element addressed by its unique key value, e.g. `[id=7]`.
    Unique { field: String, value: String },
}

impl Key {
    pub fn field(name: impl Into<String>) -> Self {
        Key::Field(name.into())
    }

    pub fn unique(field: impl Into<String>, value: impl Into<String>) -> Self {
        Key::Unique {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Idx(idx) => write!(f, "[{}]", idx),
            Key::Field(key) => write!(f, ".{}", key),
            Key::Unique { field, value } => write!(f, "[{}={}]", field, value),
        }
    }
}

impl Path {
    pub fn root() -> Self {
        Path::Root
    }

    pub fn append(&self, next: Key) -> Path {
        match self {
            Path::Root => Path::Keys(vec![next]),
            Path::Keys(list) => {
                let mut copy = list.clone();
                copy.push(next);
                Path::Keys(copy)
            }
        }
    }

    pub fn keys(&self) -> &[Key] {
        match self {
            Path::Root => &[],
            Path::Keys(keys) => keys,
        }
    }

    pub fn is_root(&self) -> bool {
        self.keys().is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Path::Root => write!(f, "$"),
            Path::Keys(keys) => {
                for (i, key) in keys.iter().enumerate() {
                    match key {
                        Key::Field(name) if i == 0 => write!(f, "{}", name)?,
                        _ => write!(f, "{}", key)?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// One element of a compiled [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Idx(usize),
    Unique { field: String, value: String },
    /// `*`: exactly one segment of any kind.
    Any,
    /// `[*]`: exactly one array element, positional or keyed.
    AnyElement,
    /// `**`: zero or more segments.
    Recursive,
}

impl Segment {
    fn accepts(&self, key: &Key) -> bool {
        match (self, key) {
            (Segment::Any, _) => true,
            (Segment::AnyElement, Key::Idx(_) | Key::Unique { .. }) => true,
            (Segment::Field(a), Key::Field(b)) => a == b,
            (Segment::Idx(a), Key::Idx(b)) => a == b,
            (
                Segment::Unique { field, value },
                Key::Unique {
                    field: key_field,
                    value: key_value,
                },
            ) => field == key_field && value == key_value,
            _ => false,
        }
    }
}

/// A compiled dot/bracket path expression with `*` and `**` wildcards.
///
/// Syntax: fields separated by `.`, each optionally followed by bracket
/// selectors `[n]`, `[*]` or `[field=value]`. A leading `$` names the root,
/// so `$` alone addresses the whole document and `$.a` is the same as `a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    text: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn compile(text: &str) -> Result<Self, PatternSyntaxError> {
        let mut segments = Vec::new();
        let mut rest = text;
        let mut pos = 0;

        if let Some(stripped) = rest.strip_prefix('$') {
            rest = stripped;
            pos = 1;
            if let Some(stripped) = rest.strip_prefix('.') {
                if stripped.is_empty() {
                    return Err(PatternSyntaxError::new(text, pos, "trailing dot"));
                }
                rest = stripped;
                pos += 1;
            } else if !rest.is_empty() && !rest.starts_with('[') {
                return Err(PatternSyntaxError::new(text, pos, "expected '.' or '[' after '$'"));
            }
        } else if rest.is_empty() {
            return Err(PatternSyntaxError::new(text, 0, "empty pattern"));
        }

        if rest.is_empty() {
            return Ok(PathPattern {
                text: text.to_string(),
                segments,
            });
        }

        let mut first = true;
        loop {
            let (consumed, parsed) = parse_segment(text, rest, pos, first)?;
            segments.extend(parsed);
            rest = &rest[consumed..];
            pos += consumed;
            first = false;
            if rest.is_empty() {
                break;
            }
            // parse_segment only stops early at a dot
            rest = &rest[1..];
            pos += 1;
            if rest.is_empty() {
                return Err(PatternSyntaxError::new(text, pos - 1, "trailing dot"));
            }
        }

        segments.dedup_by(|a, b| *a == Segment::Recursive && *b == Segment::Recursive);

        Ok(PathPattern {
            text: text.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Checks the pattern against a concrete path.
    ///
    /// `**` is resolved lazily: it first tries to consume nothing, then one
    /// segment, then two, until the remainder of the pattern matches or the
    /// path runs out.
    pub fn matches(&self, path: &Path) -> bool {
        matches_from(&self.segments, path.keys())
    }
}

fn matches_from(segments: &[Segment], keys: &[Key]) -> bool {
    match segments.split_first() {
        None => keys.is_empty(),
        Some((Segment::Recursive, rest)) => {
            (0..=keys.len()).any(|skip| matches_from(rest, &keys[skip..]))
        }
        Some((segment, rest)) => match keys.split_first() {
            Some((key, tail)) => segment.accepts(key) && matches_from(rest, tail),
            None => false,
        },
    }
}

/// Parses one dotted segment: an optional name followed by bracket selectors.
/// Returns the number of bytes consumed, stopping before a `.` or at the end.
fn parse_segment(
    text: &str,
    input: &str,
    offset: usize,
    first: bool,
) -> Result<(usize, Vec<Segment>), PatternSyntaxError> {
    let mut segments = Vec::new();
    let name_len = input
        .find(|c: char| matches!(c, '.' | '[' | ']'))
        .unwrap_or(input.len());
    let name = &input[..name_len];

    if input[name_len..].starts_with(']') {
        return Err(PatternSyntaxError::new(
            text,
            offset + name_len,
            "unmatched ']'",
        ));
    }

    match name {
        "" if input[name_len..].starts_with('[') && first => {}
        "" => return Err(PatternSyntaxError::new(text, offset, "empty segment")),
        "*" => segments.push(Segment::Any),
        "**" => segments.push(Segment::Recursive),
        name => segments.push(Segment::Field(name.to_string())),
    }

    let mut consumed = name_len;
    while input[consumed..].starts_with('[') {
        let open = consumed;
        let close = input[open..]
            .find(']')
            .map(|idx| open + idx)
            .ok_or_else(|| PatternSyntaxError::new(text, offset + open, "unclosed '['"))?;
        let inner = &input[open + 1..close];
        segments.push(parse_bracket(text, inner, offset + open)?);
        consumed = close + 1;
    }

    match input[consumed..].chars().next() {
        None | Some('.') => Ok((consumed, segments)),
        Some(_) => Err(PatternSyntaxError::new(
            text,
            offset + consumed,
            "unexpected character after ']'",
        )),
    }
}

fn parse_bracket(text: &str, inner: &str, offset: usize) -> Result<Segment, PatternSyntaxError> {
    if inner.is_empty() {
        return Err(PatternSyntaxError::new(text, offset, "empty brackets"));
    }
    if inner.contains('[') {
        return Err(PatternSyntaxError::new(text, offset, "nested '['"));
    }
    if inner == "*" {
        return Ok(Segment::AnyElement);
    }
    if let Some((field, value)) = inner.split_once('=') {
        if field.is_empty() {
            return Err(PatternSyntaxError::new(text, offset, "missing key name"));
        }
        return Ok(Segment::Unique {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    inner
        .parse::<usize>()
        .map(Segment::Idx)
        .map_err(|_| PatternSyntaxError::new(text, offset, format!("malformed index '{}'", inner)))
}

impl FromStr for PathPattern {
    type Err = PatternSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathPattern::compile(s)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
