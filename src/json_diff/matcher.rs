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

//! Value matchers that replace structural comparison at customized paths.

use super::misc::summary;
use super::path::{Key, Path};
use super::result::ComparisonResult;
use super::{Comparator, Scope};
use crate::document::{Node, Scalar};
use crate::error::ConfigError;
use regex::Regex;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Verdict of a [`ValueMatcher`].
///
/// Matchers that recurse record their own failures into the scope's result
/// and return `Match`, so the comparator does not report the path twice.
#[derive(Debug)]
pub enum Outcome {
    Match,
    Mismatch(Mismatch),
}

impl From<bool> for Outcome {
    fn from(matched: bool) -> Self {
        if matched {
            Outcome::Match
        } else {
            Outcome::Mismatch(Mismatch::Rejected)
        }
    }
}

/// Where a regular expression came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// Fixed when the matcher was built; the expected value is ignored.
    Constant,
    /// Taken from the expected document at the compared path.
    Dynamic,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatternKind::Constant => write!(f, "Constant"),
            PatternKind::Dynamic => write!(f, "Dynamic"),
        }
    }
}

/// A valid regular expression that did not match the actual value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} expected pattern '{pattern}' did not match value '{actual}'")]
pub struct MatchError {
    pub kind: PatternKind,
    pub pattern: String,
    pub actual: String,
}

#[derive(Debug, Clone, Error)]
pub enum Mismatch {
    #[error(transparent)]
    Pattern(#[from] MatchError),

    #[error("expected array size of {expected} elements but got {actual}")]
    Size { expected: SizeRange, actual: usize },

    #[error("expected an array but got {0}")]
    NotAnArray(&'static str),

    #[error("element range {range} is outside an array of {len} elements")]
    OutOfRange { range: ElementRange, len: usize },

    #[error("value rejected by custom matcher")]
    Rejected,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Compares one actual value against one expected value or pattern.
pub trait ValueMatcher: Send + Sync {
    fn compare(&self, actual: &Node, expected: &Node, scope: &mut Scope<'_>) -> Outcome;

    /// Checks the expected value this matcher will receive before the
    /// comparison starts.
    ///
    /// `comparator` is the one this matcher is registered with; matchers that
    /// recurse validate the children of `expected` through it.
    fn validate(
        &self,
        _expected: &Node,
        _path: &Path,
        _comparator: &Comparator,
    ) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Whether a field at this path may be missing from, or unexpected in,
    /// the actual document.
    fn tolerates_absence(&self) -> bool {
        false
    }
}

/// Plain structural comparison.
///
/// Useful to shield a path from a broader wildcard customization registered
/// after it; customizations below this path still apply.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralMatcher;

impl ValueMatcher for LiteralMatcher {
    fn compare(&self, actual: &Node, expected: &Node, scope: &mut Scope<'_>) -> Outcome {
        scope.compare_structure(expected, actual);
        Outcome::Match
    }

    fn validate(
        &self,
        expected: &Node,
        path: &Path,
        comparator: &Comparator,
    ) -> Result<(), ConfigError> {
        comparator.validate_structure(path, expected)
    }
}

/// Accepts any value.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreMatcher;

impl ValueMatcher for IgnoreMatcher {
    fn compare(&self, _actual: &Node, _expected: &Node, _scope: &mut Scope<'_>) -> Outcome {
        Outcome::Match
    }

    fn tolerates_absence(&self) -> bool {
        true
    }
}

/// Wraps a closure receiving `(actual, expected)`.
pub struct Predicate<F>(F);

pub fn predicate<F>(f: F) -> Predicate<F>
where
    F: Fn(&Node, &Node) -> bool + Send + Sync,
{
    Predicate(f)
}

impl<F> ValueMatcher for Predicate<F>
where
    F: Fn(&Node, &Node) -> bool + Send + Sync,
{
    fn compare(&self, actual: &Node, expected: &Node, _scope: &mut Scope<'_>) -> Outcome {
        (self.0)(actual, expected).into()
    }
}

/// Matches the actual value's string form against a regular expression.
///
/// The whole string must match. Strings are matched without their quotes,
/// other values by their compact JSON text.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    constant: Option<(String, Regex)>,
}

impl RegexMatcher {
    /// Uses `pattern` for every comparison and ignores the expected value.
    pub fn constant(pattern: &str) -> Result<Self, ConfigError> {
        let regex = compile(pattern)?;
        Ok(Self {
            constant: Some((pattern.to_string(), regex)),
        })
    }

    /// Reads the pattern from the expected document at each compared path.
    pub fn dynamic() -> Self {
        Self { constant: None }
    }

    pub fn kind(&self) -> PatternKind {
        match self.constant {
            Some(_) => PatternKind::Constant,
            None => PatternKind::Dynamic,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ConfigError::Regex {
        pattern: pattern.to_string(),
        source,
    })
}

impl ValueMatcher for RegexMatcher {
    fn compare(&self, actual: &Node, expected: &Node, _scope: &mut Scope<'_>) -> Outcome {
        let dynamic_pattern;
        let dynamic_regex;
        let (pattern, regex) = match &self.constant {
            Some((pattern, regex)) => (pattern.as_str(), regex),
            None => {
                dynamic_pattern = expected.text();
                dynamic_regex = match compile(&dynamic_pattern) {
                    Ok(regex) => regex,
                    Err(err) => return Outcome::Mismatch(err.into()),
                };
                (dynamic_pattern.as_str(), &dynamic_regex)
            }
        };

        let text = actual.text();
        if regex.is_match(&text) {
            Outcome::Match
        } else {
            Outcome::Mismatch(
                MatchError {
                    kind: self.kind(),
                    pattern: pattern.to_string(),
                    actual: text,
                }
                .into(),
            )
        }
    }

    fn validate(
        &self,
        expected: &Node,
        _path: &Path,
        _comparator: &Comparator,
    ) -> Result<(), ConfigError> {
        match self.constant {
            Some(_) => Ok(()),
            None => compile(&expected.text()).map(|_| ()),
        }
    }
}

/// Inclusive bounds on an array's element count.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SizeRange {
    pub min: u64,
    pub max: u64,
}

impl SizeRange {
    /// Reads `[n]` or `[min, max]` from the expected document.
    pub fn from_bounds(expected: &Node, path: &Path) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::SizeBounds {
            path: path.to_string(),
            found: summary(expected),
        };

        let bounds = expected
            .as_array()
            .filter(|items| matches!(items.len(), 1 | 2))
            .ok_or_else(malformed)?
            .iter()
            .map(|item| match item {
                Node::Scalar(Scalar::Number(n)) => n.as_u64(),
                _ => None,
            })
            .collect::<Option<Vec<u64>>>()
            .ok_or_else(malformed)?;

        let min = bounds[0];
        let max = bounds.get(1).copied().unwrap_or(min);
        if max < min {
            return Err(ConfigError::SizeOrder {
                path: path.to_string(),
                min,
                max,
            });
        }
        Ok(SizeRange { min, max })
    }

    pub fn contains(&self, len: usize) -> bool {
        let len = len as u64;
        self.min <= len && len <= self.max
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} to {}", self.min, self.max)
        }
    }
}

/// Asserts only the element count of an array.
///
/// The expected value is `[n]` for an exact count or `[min, max]` for an
/// inclusive range; element contents are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArraySizeMatcher;

impl ValueMatcher for ArraySizeMatcher {
    fn compare(&self, actual: &Node, expected: &Node, scope: &mut Scope<'_>) -> Outcome {
        let range = match SizeRange::from_bounds(expected, scope.path()) {
            Ok(range) => range,
            Err(err) => return Outcome::Mismatch(err.into()),
        };

        match actual.as_array() {
            Some(items) if range.contains(items.len()) => Outcome::Match,
            Some(items) => Outcome::Mismatch(Mismatch::Size {
                expected: range,
                actual: items.len(),
            }),
            None => Outcome::Mismatch(Mismatch::NotAnArray(actual.type_name())),
        }
    }

    fn validate(
        &self,
        expected: &Node,
        path: &Path,
        _comparator: &Comparator,
    ) -> Result<(), ConfigError> {
        SizeRange::from_bounds(expected, path).map(|_| ())
    }
}

/// Inclusive window of array indexes; an open end runs to the last element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ElementRange {
    pub from: usize,
    pub to: Option<usize>,
}

impl ElementRange {
    fn is_whole_array(&self) -> bool {
        self.from == 0 && self.to.is_none()
    }

    fn window(&self, len: usize) -> Range<usize> {
        let end = match self.to {
            Some(to) => len.min(to.saturating_add(1)),
            None => len,
        };
        self.from.min(end)..end
    }
}

impl fmt::Display for ElementRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to {
            Some(to) => write!(f, "[{}..={}]", self.from, to),
            None => write!(f, "[{}..]", self.from),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Discipline {
    Every,
    Any,
}

/// Compares the expected value against a window of the actual array.
///
/// The expected value describes one element, or several when it is itself an
/// array. In the default `every` discipline each element in the window is
/// compared against the expected elements in turn, cycling through them. With
/// [`any`](Self::any) each expected element only needs one match somewhere
/// in the window.
#[derive(Debug)]
pub struct ArrayValueMatcher {
    comparator: Option<Comparator>,
    range: ElementRange,
    discipline: Discipline,
}

impl ArrayValueMatcher {
    pub fn new() -> Self {
        Self {
            comparator: None,
            range: ElementRange { from: 0, to: None },
            discipline: Discipline::Every,
        }
    }

    /// Compares elements with `comparator` instead of the enclosing one.
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn at(mut self, index: usize) -> Self {
        self.range = ElementRange {
            from: index,
            to: Some(index),
        };
        self
    }

    pub fn between(mut self, from: usize, to: usize) -> Result<Self, ConfigError> {
        if to < from {
            return Err(ConfigError::ElementRange { from, to });
        }
        self.range = ElementRange { from, to: Some(to) };
        Ok(self)
    }

    pub fn starting_at(mut self, from: usize) -> Self {
        self.range = ElementRange { from, to: None };
        self
    }

    pub fn any(mut self) -> Self {
        self.discipline = Discipline::Any;
        self
    }
}

impl Default for ArrayValueMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueMatcher for ArrayValueMatcher {
    fn compare(&self, actual: &Node, expected: &Node, scope: &mut Scope<'_>) -> Outcome {
        let Some(items) = actual.as_array() else {
            return Outcome::Mismatch(Mismatch::NotAnArray(actual.type_name()));
        };
        if !self.range.is_whole_array() && self.range.from >= items.len() {
            return Outcome::Mismatch(Mismatch::OutOfRange {
                range: self.range,
                len: items.len(),
            });
        }

        let wanted: Vec<&Node> = match expected {
            Node::Array(elements) => elements.iter().collect(),
            other => vec![other],
        };
        let comparator = self.comparator.as_ref().unwrap_or(scope.comparator());
        let path = scope.path();
        let window = self.range.window(items.len());

        match self.discipline {
            Discipline::Every => {
                if wanted.is_empty() {
                    return Outcome::Match;
                }
                for idx in window.clone() {
                    let expected = wanted[(idx - window.start) % wanted.len()];
                    comparator.compare_values(
                        &path.append(Key::Idx(idx)),
                        expected,
                        &items[idx],
                        scope.result(),
                    );
                }
            }
            Discipline::Any => {
                for expected in wanted {
                    let found = window.clone().any(|idx| {
                        let mut scratch = ComparisonResult::new();
                        comparator.compare_values(
                            &path.append(Key::Idx(idx)),
                            expected,
                            &items[idx],
                            &mut scratch,
                        );
                        scratch.passed()
                    });
                    if !found {
                        scope.result().unmatched(
                            path,
                            format!("an element matching {}", summary(expected)),
                            format!("none in {}", self.range),
                        );
                    }
                }
            }
        }
        Outcome::Match
    }

    /// Expected elements are validated as if laid out from the start of the
    /// window, with the nested comparator when there is one.
    fn validate(
        &self,
        expected: &Node,
        path: &Path,
        comparator: &Comparator,
    ) -> Result<(), ConfigError> {
        let comparator = self.comparator.as_ref().unwrap_or(comparator);
        match expected {
            Node::Array(elements) => {
                for (offset, element) in elements.iter().enumerate() {
                    let idx = self.range.from + offset;
                    comparator.validate_at(&path.append(Key::Idx(idx)), element)?;
                }
                Ok(())
            }
            element => comparator.validate_at(&path.append(Key::Idx(self.range.from)), element),
        }
    }
}
