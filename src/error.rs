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

use std::fmt;
use thiserror::Error;

/// A path pattern that is not a well-formed dot/bracket path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path pattern '{pattern}' at position {position}: {reason}")]
pub struct PatternSyntaxError {
    pub pattern: String,
    pub position: usize,
    pub reason: String,
}

impl PatternSyntaxError {
    pub(crate) fn new(pattern: &str, position: usize, reason: impl Into<String>) -> Self {
        PatternSyntaxError {
            pattern: pattern.to_string(),
            position,
            reason: reason.into(),
        }
    }
}

/// The assertion itself is malformed.
///
/// These are reported before any comparison happens, so a broken
/// customization never silently passes.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error(transparent)]
    PathPattern(#[from] PatternSyntaxError),

    #[error("invalid regular expression '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{path}: array size bounds must be an array of one or two non-negative integers, got {found}")]
    SizeBounds { path: String, found: String },

    #[error("{path}: maximum array size {max} is less than minimum {min}")]
    SizeOrder { path: String, min: u64, max: u64 },

    #[error("element range {from}..={to} is empty")]
    ElementRange { from: usize, to: usize },
}

/// A compare mode name that is not one of `strict`, `lenient`,
/// `strict-order` or `non-extensible`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown compare mode '{0}', expected one of: strict, lenient, strict-order, non-extensible")]
pub struct UnknownMode(pub String);

/// Which of the two documents an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Expected => write!(f, "expected"),
            Side::Actual => write!(f, "actual"),
        }
    }
}

/// Errors that prevent a comparison from running at all.
#[derive(Debug, Error)]
pub enum Error {
    #[error("error parsing {side} document: {source}")]
    Parse {
        side: Side,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<PatternSyntaxError> for Error {
    fn from(err: PatternSyntaxError) -> Self {
        Error::Config(ConfigError::PathPattern(err))
    }
}
