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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use thiserror::Error;

mod document;
mod error;
mod json_diff;
#[cfg(test)]
mod tests;

pub use document::{DocumentParser, Fields, JsonParser, Kind, Node, Scalar};
pub use error::{ConfigError, Error, PatternSyntaxError, Side, UnknownMode};
pub use json_diff::customization::{Customization, Customizations};
pub use json_diff::matcher::{
    predicate, ArraySizeMatcher, ArrayValueMatcher, ElementRange, IgnoreMatcher, LiteralMatcher,
    MatchError, Mismatch, Outcome, PatternKind, Predicate, RegexMatcher, SizeRange, ValueMatcher,
};
pub use json_diff::path::{Key, Path, PathPattern, Segment};
pub use json_diff::result::{ComparisonResult, Failure, FailureKind};
pub use json_diff::{CompareMode, Comparator, Config, NumericMode, Scope};

/// Receives the outcome of a failed assertion.
///
/// Implement this to plug assertions into a test framework other than the
/// standard panicking harness.
pub trait Reporter {
    /// Called when the documents differ.
    fn report_mismatch(&self, result: &ComparisonResult);

    /// Called when the assertion could not run at all.
    fn report_error(&self, err: &Error);
}

/// Panics with the failure message, failing the surrounding `#[test]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn report_mismatch(&self, result: &ComparisonResult) {
        panic!("documents differ: {}", result.message());
    }

    fn report_error(&self, err: &Error) {
        panic!("assertion is malformed: {}", err);
    }
}

/// Writes failures to the `log` facade and lets the caller carry on.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report_mismatch(&self, result: &ComparisonResult) {
        log::error!("documents differ: {}", result.report());
    }

    fn report_error(&self, err: &Error) {
        log::error!("assertion is malformed: {}", err);
    }
}

/// Error type for a [`JsonAssert`] run.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// A document could not be parsed or a customization does not fit the
    /// expected document.
    #[error("assertion is malformed: {0}")]
    Malformed(#[from] Error),
    /// The documents were compared and differ.
    #[error("documents differ: {0}")]
    Mismatch(ComparisonResult),
}

/// Builder for JSON assertions.
///
/// # Examples
///
/// ```
/// use json_assert::{CompareMode, Customization, JsonAssert, RegexMatcher};
///
/// let assertion = JsonAssert::new()
///     .with_mode(CompareMode::Lenient)
///     .with_customization(
///         Customization::parse("user.id", RegexMatcher::constant(r"[0-9a-f]{8}").unwrap()).unwrap(),
///     );
///
/// let expected = r#"{"user": {"id": "", "name": "Alice"}}"#;
/// let actual = r#"{"user": {"id": "1f2e3d4c", "name": "Alice", "age": 31}}"#;
/// assert!(assertion.assert(expected, actual));
/// ```
pub struct JsonAssert {
    comparator: Comparator,
    reporter: Box<dyn Reporter>,
}

impl JsonAssert {
    /// Constructs a builder comparing in [`CompareMode::Strict`] that panics
    /// on failure.
    pub fn new() -> Self {
        Self {
            comparator: Comparator::default(),
            reporter: Box::new(PanicReporter),
        }
    }

    /// Sets the compare mode, keeping the numeric mode and customizations.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_assert::{CompareMode, JsonAssert};
    ///
    /// let assertion = JsonAssert::new().with_mode(CompareMode::NonExtensible);
    /// assert!(assertion.assert("[1, 2, 3]", "[3, 1, 2]"));
    /// ```
    pub fn with_mode(mut self, mode: CompareMode) -> Self {
        let config = self.comparator.config().compare_mode(mode);
        self.comparator = self.comparator.with_config(config);
        self
    }

    /// Replaces the whole configuration, keeping customizations.
    pub fn with_config(mut self, config: Config) -> Self {
        self.comparator = self.comparator.with_config(config);
        self
    }

    /// Registers a customization after the ones already registered.
    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.comparator = self.comparator.customize(customization);
        self
    }

    /// Replaces the comparator, dropping earlier configuration and
    /// customizations.
    pub fn with_comparator(mut self, comparator: Comparator) -> Self {
        self.comparator = comparator;
        self
    }

    /// Sets where failures are reported by [`assert`](Self::assert).
    ///
    /// # Examples
    ///
    /// ```
    /// use json_assert::{JsonAssert, LogReporter};
    ///
    /// let assertion = JsonAssert::new().with_reporter(LogReporter);
    /// assert!(!assertion.assert(r#"{"a": 1}"#, r#"{"a": 2}"#));
    /// ```
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Compares the documents and returns every difference found.
    pub fn compare(&self, expected: &str, actual: &str) -> Result<ComparisonResult, Error> {
        self.comparator.compare_text(expected, actual)
    }

    /// Compares the documents, failing with the differences if there are any.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_assert::{AssertionError, JsonAssert};
    ///
    /// match JsonAssert::new().try_assert(r#"{"a": [1, 2]}"#, r#"{"a": [1]}"#) {
    ///     Err(AssertionError::Mismatch(result)) => {
    ///         assert_eq!(result.message(), "a: expected 2 values but got 1 values");
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn try_assert(&self, expected: &str, actual: &str) -> Result<(), AssertionError> {
        let result = self.compare(expected, actual)?;
        if result.passed() {
            Ok(())
        } else {
            Err(AssertionError::Mismatch(result))
        }
    }

    /// Compares the documents and hands any failure to the reporter.
    ///
    /// Returns whether the documents matched, for reporters that do not
    /// panic.
    pub fn assert(&self, expected: &str, actual: &str) -> bool {
        match self.try_assert(expected, actual) {
            Ok(()) => true,
            Err(AssertionError::Mismatch(result)) => {
                self.reporter.report_mismatch(&result);
                false
            }
            Err(AssertionError::Malformed(err)) => {
                self.reporter.report_error(&err);
                false
            }
        }
    }
}

impl Default for JsonAssert {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares two JSON texts under `mode` with no customizations.
///
/// # Examples
///
/// ```
/// use json_assert::{compare, CompareMode};
///
/// let result = compare(r#"{"a": 1, "b": 2}"#, r#"{"b": 2, "a": 1}"#, CompareMode::Strict).unwrap();
/// assert!(result.passed());
/// ```
pub fn compare(expected: &str, actual: &str, mode: CompareMode) -> Result<ComparisonResult, Error> {
    Comparator::with_mode(mode).compare_text(expected, actual)
}

/// Compares two JSON texts with a configured comparator.
pub fn compare_with(
    expected: &str,
    actual: &str,
    comparator: &Comparator,
) -> Result<ComparisonResult, Error> {
    comparator.compare_text(expected, actual)
}

/// Asserts that two JSON documents are equal in [`CompareMode::Strict`].
///
/// Both arguments may be anything whose `to_string()` is JSON text, such as
/// `&str` or `serde_json::Value`.
///
/// ```
/// use serde_json::json;
///
/// json_assert::assert_json_eq!(json!({ "a": [1, 2] }), r#"{"a": [1, 2]}"#);
/// ```
#[macro_export]
macro_rules! assert_json_eq {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::assert_json_matches!($expected, $actual, $crate::CompareMode::Strict)
    };
}

/// Asserts that two JSON documents match under the given [`CompareMode`].
///
/// ```
/// use json_assert::CompareMode;
///
/// json_assert::assert_json_matches!(
///     r#"{"a": 1}"#,
///     r#"{"a": 1, "b": 2}"#,
///     CompareMode::Lenient,
/// );
/// ```
#[macro_export]
macro_rules! assert_json_matches {
    ($expected:expr, $actual:expr, $mode:expr $(,)?) => {{
        match $crate::compare(
            &::std::string::ToString::to_string(&$expected),
            &::std::string::ToString::to_string(&$actual),
            $mode,
        ) {
            Ok(result) if result.passed() => {}
            Ok(result) => panic!("documents differ: {}", result.message()),
            Err(err) => panic!("assertion is malformed: {}", err),
        }
    }};
}
