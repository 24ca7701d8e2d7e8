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

mod arrays;
pub mod customization;
pub mod matcher;
mod misc;
pub mod path;
pub mod result;

use crate::document::{DocumentParser, Fields, JsonParser, Node, Scalar};
use crate::error::{ConfigError, Error, PatternSyntaxError, Side, UnknownMode};
use customization::{Customization, Customizations};
use log::{trace, warn};
use matcher::{IgnoreMatcher, Mismatch, Outcome, ValueMatcher};
use misc::{numbers_equal, summary};
use path::{Key, Path};
use result::ComparisonResult;
use std::fmt;
use std::str::FromStr;

/// Mode for how documents should be compared.
///
/// Each mode is a combination of two switches: whether the actual document
/// may carry object fields the expected one does not (extensible), and
/// whether array element order is significant.
///
/// | Mode             | Extensible | Strict order |
/// |------------------|------------|--------------|
/// | `Strict`         | no         | yes          |
/// | `Lenient`        | yes        | yes          |
/// | `StrictOrder`    | no         | yes          |
/// | `NonExtensible`  | no         | no           |
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CompareMode {
    #[default]
    Strict,
    Lenient,
    /// Same switches as `Strict`, for callers who want to state the intent.
    StrictOrder,
    NonExtensible,
}

impl CompareMode {
    pub fn is_extensible(&self) -> bool {
        matches!(self, CompareMode::Lenient)
    }

    pub fn has_strict_order(&self) -> bool {
        !matches!(self, CompareMode::NonExtensible)
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompareMode::Strict => write!(f, "strict"),
            CompareMode::Lenient => write!(f, "lenient"),
            CompareMode::StrictOrder => write!(f, "strict-order"),
            CompareMode::NonExtensible => write!(f, "non-extensible"),
        }
    }
}

impl FromStr for CompareMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(CompareMode::Strict),
            "lenient" => Ok(CompareMode::Lenient),
            "strict-order" | "strict_order" => Ok(CompareMode::StrictOrder),
            "non-extensible" | "non_extensible" => Ok(CompareMode::NonExtensible),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// How should numbers be compared.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum NumericMode {
    /// Integer and floating representations must match as well as the value.
    Strict,
    /// Numbers are equal when their values are, so `1` equals `1.0`.
    #[default]
    AssumeFloat,
}

/// Configuration for how documents should be compared.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    compare_mode: CompareMode,
    extensible: bool,
    strict_order: bool,
    numeric_mode: NumericMode,
}

impl Config {
    /// Create a new [`Config`] using the given [`CompareMode`].
    ///
    /// The default `numeric_mode` is [`NumericMode::AssumeFloat`].
    pub fn new(compare_mode: CompareMode) -> Self {
        Self {
            compare_mode,
            extensible: compare_mode.is_extensible(),
            strict_order: compare_mode.has_strict_order(),
            numeric_mode: NumericMode::default(),
        }
    }

    /// Change the config's compare mode, resetting both switches to the
    /// mode's values.
    pub fn compare_mode(mut self, compare_mode: CompareMode) -> Self {
        self.compare_mode = compare_mode;
        self.extensible = compare_mode.is_extensible();
        self.strict_order = compare_mode.has_strict_order();
        self
    }

    /// Override whether extra actual object fields are tolerated.
    pub fn extensible(mut self, extensible: bool) -> Self {
        self.extensible = extensible;
        self
    }

    /// Override whether array element order is significant.
    pub fn strict_order(mut self, strict_order: bool) -> Self {
        self.strict_order = strict_order;
        self
    }

    pub fn numeric_mode(mut self, numeric_mode: NumericMode) -> Self {
        self.numeric_mode = numeric_mode;
        self
    }

    pub fn mode(&self) -> CompareMode {
        self.compare_mode
    }

    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    pub fn has_strict_order(&self) -> bool {
        self.strict_order
    }

    pub fn numeric(&self) -> NumericMode {
        self.numeric_mode
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(CompareMode::default())
    }
}

/// Walks an expected and an actual document in lock-step and records every
/// difference into a [`ComparisonResult`].
///
/// A comparator is built once, before any comparison, and is only read
/// afterwards; the same comparator may be used by several threads at once.
///
/// ```
/// use json_assert::{CompareMode, Comparator, Node};
/// use serde_json::json;
///
/// let comparator = Comparator::with_mode(CompareMode::Strict)
///     .ignore("**.updated_at")
///     .unwrap();
///
/// let expected = Node::from(json!({ "id": 1, "meta": { "updated_at": "yesterday" } }));
/// let actual = Node::from(json!({ "meta": { "updated_at": "today" }, "id": 1 }));
///
/// let result = comparator.compare(&expected, &actual).unwrap();
/// assert!(result.passed());
/// ```
#[derive(Debug, Default)]
pub struct Comparator {
    config: Config,
    customizations: Customizations,
}

impl Comparator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            customizations: Customizations::new(),
        }
    }

    pub fn with_mode(mode: CompareMode) -> Self {
        Self::new(Config::new(mode))
    }

    /// Replace the configuration, keeping the registered customizations.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Register a customization. Earlier registrations win over later ones.
    pub fn customize(mut self, customization: Customization) -> Self {
        self.customizations.add(customization);
        self
    }

    /// Register `matcher` for every path matched by `pattern`.
    pub fn customize_path(
        self,
        pattern: &str,
        matcher: impl ValueMatcher + 'static,
    ) -> Result<Self, PatternSyntaxError> {
        Ok(self.customize(Customization::parse(pattern, matcher)?))
    }

    /// Accept any value, or no value at all, at the paths matched by
    /// `pattern`.
    pub fn ignore(self, pattern: &str) -> Result<Self, PatternSyntaxError> {
        self.customize_path(pattern, IgnoreMatcher)
    }

    /// Append all of `customizations` after the ones already registered.
    pub fn with_customizations(mut self, customizations: Customizations) -> Self {
        self.customizations.extend(customizations);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn customizations(&self) -> &Customizations {
        &self.customizations
    }

    /// Checks every customization against the expected value it will be
    /// handed, so a malformed assertion fails before any comparison.
    pub fn validate(&self, expected: &Node) -> Result<(), ConfigError> {
        self.validate_at(&Path::root(), expected)
    }

    /// Validates the expected value found at `path`, consulting the
    /// customizations first. Used by matchers that recurse.
    pub fn validate_at(&self, path: &Path, expected: &Node) -> Result<(), ConfigError> {
        match self.customizations.resolve(path) {
            Some(customization) => customization.matcher().validate(expected, path, self),
            None => self.validate_structure(path, expected),
        }
    }

    /// Validates the children of the expected value at `path` without
    /// consulting the customizations at `path` itself.
    pub fn validate_structure(&self, path: &Path, expected: &Node) -> Result<(), ConfigError> {
        match expected {
            Node::Object(fields) => {
                for (key, value) in fields.iter() {
                    self.validate_at(&path.append(Key::field(key)), value)?;
                }
            }
            Node::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    self.validate_at(&path.append(Key::Idx(idx)), item)?;
                }
            }
            Node::Scalar(_) => {}
        }
        Ok(())
    }

    /// Compare two documents.
    ///
    /// Differences are collected into the returned result. An error means
    /// the customizations do not fit the expected document and nothing was
    /// compared.
    pub fn compare(&self, expected: &Node, actual: &Node) -> Result<ComparisonResult, ConfigError> {
        self.validate(expected)?;

        let mut result = ComparisonResult::new();
        self.compare_values(&Path::root(), expected, actual, &mut result);
        Ok(result)
    }

    /// Parse both documents as JSON and compare them.
    pub fn compare_text(&self, expected: &str, actual: &str) -> Result<ComparisonResult, Error> {
        self.compare_with_parser(&JsonParser, expected, actual)
    }

    /// Parse both documents with `parser` and compare them.
    pub fn compare_with_parser<P>(
        &self,
        parser: &P,
        expected: &str,
        actual: &str,
    ) -> Result<ComparisonResult, Error>
    where
        P: DocumentParser + ?Sized,
    {
        let expected = parser.parse(expected).map_err(|source| Error::Parse {
            side: Side::Expected,
            source,
        })?;
        let actual = parser.parse(actual).map_err(|source| Error::Parse {
            side: Side::Actual,
            source,
        })?;

        Ok(self.compare(&expected, &actual)?)
    }

    /// Compare the values found at `path`, consulting the customizations
    /// first. Used by the walk itself and by matchers that recurse.
    pub fn compare_values(
        &self,
        path: &Path,
        expected: &Node,
        actual: &Node,
        result: &mut ComparisonResult,
    ) {
        let Some(customization) = self.customizations.resolve(path) else {
            return self.compare_structure(path, expected, actual, result);
        };

        trace!("{}: matched by customization '{}'", path, customization.pattern());
        let outcome = {
            let mut scope = Scope::new(self, path, &mut *result);
            customization.matcher().compare(actual, expected, &mut scope)
        };

        if let Outcome::Mismatch(mismatch) = outcome {
            if let Mismatch::Config(err) = &mismatch {
                warn!("{}: {}", path, err);
            }
            result.fail_with_detail(path, summary(expected), summary(actual), mismatch);
        }
    }

    /// Compare the values at `path` by structure alone, without consulting
    /// the customizations at `path` itself. Descendants are still
    /// customized.
    pub fn compare_structure(
        &self,
        path: &Path,
        expected: &Node,
        actual: &Node,
        result: &mut ComparisonResult,
    ) {
        let mut folder = DiffFolder {
            comparator: self,
            actual,
            path,
            acc: result,
        };

        fold_json(expected, &mut folder);
    }

    /// Whether a field at `path` may be absent on either side.
    fn tolerates_absence(&self, path: &Path) -> bool {
        self.customizations
            .resolve(path)
            .is_some_and(|customization| customization.matcher().tolerates_absence())
    }
}

/// What a [`ValueMatcher`] sees of the comparison in progress.
pub struct Scope<'a> {
    comparator: &'a Comparator,
    path: &'a Path,
    result: &'a mut ComparisonResult,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(
        comparator: &'a Comparator,
        path: &'a Path,
        result: &'a mut ComparisonResult,
    ) -> Self {
        Self {
            comparator,
            path,
            result,
        }
    }

    /// The comparator running this comparison.
    pub fn comparator(&self) -> &'a Comparator {
        self.comparator
    }

    /// The path of the values being matched.
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// The run's result, for matchers that report their own failures.
    pub fn result(&mut self) -> &mut ComparisonResult {
        &mut *self.result
    }

    /// Compare the two values structurally at this path.
    pub fn compare_structure(&mut self, expected: &Node, actual: &Node) {
        self.comparator
            .compare_structure(self.path, expected, actual, self.result);
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("path", &self.path.to_string())
            .field("passed", &self.result.passed())
            .finish()
    }
}

struct DiffFolder<'a, 'b> {
    comparator: &'a Comparator,
    actual: &'a Node,
    path: &'a Path,
    acc: &'b mut ComparisonResult,
}

impl DiffFolder<'_, '_> {
    fn on_object(&mut self, expected: &Fields, actual: &Fields) {
        for (key, expected) in expected.iter() {
            let path = self.path.append(Key::field(key));

            match actual.get(key) {
                Some(actual) => self.comparator.compare_values(&path, expected, actual, self.acc),
                None => {
                    if self.comparator.tolerates_absence(&path) {
                        continue;
                    }
                    self.acc.missing(&path, summary(expected));
                }
            }
        }

        if self.comparator.config.is_extensible() {
            return;
        }

        for (key, actual) in actual.iter() {
            if expected.contains_key(key) {
                continue;
            }
            let path = self.path.append(Key::field(key));
            if self.comparator.tolerates_absence(&path) {
                continue;
            }
            self.acc.unexpected(&path, summary(actual));
        }
    }

    fn on_array(&mut self, expected: &[Node], actual: &[Node]) {
        arrays::compare_arrays(self.comparator, self.path, expected, actual, self.acc);
    }

    fn on_scalar(&mut self, node: &Node, expected: &Scalar, actual: &Scalar) {
        let is_equal = match (expected, actual) {
            (Scalar::Number(lhs), Scalar::Number(rhs)) => match self.comparator.config.numeric_mode {
                NumericMode::Strict => lhs == rhs,
                NumericMode::AssumeFloat => numbers_equal(lhs, rhs),
            },
            _ if expected.type_name() != actual.type_name() => {
                return self.on_type_mismatch(node);
            }
            _ => expected == actual,
        };

        if !is_equal {
            self.acc.fail(self.path, summary(node), summary(self.actual));
        }
    }

    fn on_type_mismatch(&mut self, expected: &Node) {
        self.acc
            .type_mismatch(self.path, describe(expected), describe(self.actual));
    }
}

fn describe(node: &Node) -> String {
    format!("{} {}", node.type_name(), summary(node))
}

fn fold_json(expected: &Node, folder: &mut DiffFolder<'_, '_>) {
    let actual = folder.actual;

    match (expected, actual) {
        (Node::Object(lhs), Node::Object(rhs)) => folder.on_object(lhs, rhs),
        (Node::Array(lhs), Node::Array(rhs)) => folder.on_array(lhs, rhs),
        (Node::Scalar(lhs), Node::Scalar(rhs)) => folder.on_scalar(expected, lhs, rhs),
        _ => folder.on_type_mismatch(expected),
    }
}

#[cfg(test)]
mod test {
    use super::matcher::{ArraySizeMatcher, LiteralMatcher, RegexMatcher};
    use super::result::{Failure, FailureKind};
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn diff(expected: &Value, actual: &Value, config: Config) -> Vec<Failure> {
        diff_with(expected, actual, &Comparator::new(config))
    }

    fn diff_with(expected: &Value, actual: &Value, comparator: &Comparator) -> Vec<Failure> {
        comparator
            .compare(&Node::from(expected), &Node::from(actual))
            .unwrap()
            .failures()
            .to_vec()
    }

    fn message(expected: &Value, actual: &Value, comparator: &Comparator) -> String {
        comparator
            .compare(&Node::from(expected), &Node::from(actual))
            .unwrap()
            .message()
    }

    #[test]
    fn test_mode_switches() {
        assert!(!CompareMode::Strict.is_extensible());
        assert!(CompareMode::Strict.has_strict_order());
        assert!(CompareMode::Lenient.is_extensible());
        assert!(CompareMode::Lenient.has_strict_order());
        assert!(!CompareMode::StrictOrder.is_extensible());
        assert!(CompareMode::StrictOrder.has_strict_order());
        assert!(!CompareMode::NonExtensible.is_extensible());
        assert!(!CompareMode::NonExtensible.has_strict_order());

        for mode in [
            CompareMode::Strict,
            CompareMode::Lenient,
            CompareMode::StrictOrder,
            CompareMode::NonExtensible,
        ] {
            assert_eq!(mode.to_string().parse::<CompareMode>(), Ok(mode));
        }
        assert_eq!(
            "STRICT_ORDER".parse::<CompareMode>(),
            Ok(CompareMode::StrictOrder)
        );
        assert!("loose".parse::<CompareMode>().is_err());

        let config = Config::new(CompareMode::Strict)
            .extensible(true)
            .strict_order(false);
        assert!(config.is_extensible());
        assert!(!config.has_strict_order());
        let config = config.compare_mode(CompareMode::Strict);
        assert!(!config.is_extensible());
        assert!(config.has_strict_order());
    }

    #[test]
    fn test_diffing_leaf_json() {
        let diffs = diff(&json!(null), &json!(null), Config::new(CompareMode::Strict));
        assert_eq!(diffs, vec![]);

        let diffs = diff(&json!(false), &json!(false), Config::new(CompareMode::Strict));
        assert_eq!(diffs, vec![]);

        let diffs = diff(&json!(false), &json!(true), Config::new(CompareMode::Strict));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, FailureKind::ValueMismatch);
        assert_eq!(diffs[0].to_string(), "$: expected false but got true");

        let diffs = diff(&json!("a"), &json!("b"), Config::new(CompareMode::Strict));
        assert_eq!(diffs[0].to_string(), r#"$: expected "a" but got "b""#);

        let diffs = diff(&json!(1), &json!(2), Config::new(CompareMode::Strict));
        assert_eq!(diffs.len(), 1);

        let diffs = diff(&json!(1), &json!(1.0), Config::new(CompareMode::Strict));
        assert_eq!(diffs, vec![]);

        let diffs = diff(&json!(1.0), &json!(1), Config::new(CompareMode::Lenient));
        assert_eq!(diffs, vec![]);

        let diffs = diff(
            &json!(1),
            &json!(1.0),
            Config::new(CompareMode::Strict).numeric_mode(NumericMode::Strict),
        );
        assert_eq!(diffs.len(), 1);

        let diffs = diff(
            &json!(1.5),
            &json!(1.5),
            Config::new(CompareMode::Strict).numeric_mode(NumericMode::Strict),
        );
        assert_eq!(diffs, vec![]);
    }

    #[test]
    fn test_type_mismatch() {
        let diffs = diff(&json!("1"), &json!(1), Config::new(CompareMode::Lenient));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, FailureKind::TypeMismatch);
        assert_eq!(
            diffs[0].to_string(),
            r#"$: type mismatch, expected string "1" but got number 1"#
        );

        let diffs = diff(
            &json!({ "a": { "b": 1 } }),
            &json!({ "a": [1] }),
            Config::new(CompareMode::Strict),
        );
        assert_eq!(
            diffs[0].to_string(),
            r#"a: type mismatch, expected object {"b":1} but got array [1]"#
        );

        let diffs = diff(&json!(null), &json!({}), Config::new(CompareMode::Strict));
        assert_eq!(diffs[0].kind, FailureKind::TypeMismatch);
    }

    #[test]
    fn test_object() {
        let diffs = diff(&json!({}), &json!({}), Config::new(CompareMode::Lenient));
        assert_eq!(diffs, vec![]);

        let diffs = diff(
            &json!({ "a": 1 }),
            &json!({ "a": 1, "b": 123 }),
            Config::new(CompareMode::Lenient),
        );
        assert_eq!(diffs, vec![]);

        let diffs = diff(
            &json!({ "b": 1 }),
            &json!({ "a": 1 }),
            Config::new(CompareMode::Lenient),
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, FailureKind::MissingField);
        assert_eq!(diffs[0].to_string(), "b: expected 1 but none found");

        let diffs = diff(
            &json!({ "a": {} }),
            &json!({ "a": { "b": true } }),
            Config::new(CompareMode::Lenient),
        );
        assert_eq!(diffs, vec![]);
    }

    #[test]
    fn test_object_strict() {
        let diffs = diff(&json!({}), &json!({ "a": 1 }), Config::new(CompareMode::Strict));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, FailureKind::UnexpectedField);
        assert_eq!(diffs[0].to_string(), "a: unexpected 1");

        let diffs = diff(&json!({ "a": 1 }), &json!({}), Config::new(CompareMode::Strict));
        assert_eq!(diffs.len(), 1);

        let json = json!({ "a": 1, "b": { "c": [1, 2] } });
        let diffs = diff(&json, &json, Config::new(CompareMode::Strict));
        assert_eq!(diffs, vec![]);

        let diffs = diff(
            &json!({ "a": 1, "b": 2 }),
            &json!({ "b": 2, "a": 1 }),
            Config::new(CompareMode::Strict),
        );
        assert_eq!(diffs, vec![]);
    }

    #[test]
    fn test_collects_every_failure() {
        let comparator = Comparator::with_mode(CompareMode::Strict);
        assert_eq!(
            message(
                &json!({ "a": { "b": 1, "c": "x" }, "d": [1, 2] }),
                &json!({ "a": { "b": 2, "e": null }, "d": [1, 3] }),
                &comparator,
            ),
            r#"a.b: expected 1 but got 2 ; a.c: expected "x" but none found ; a.e: unexpected null ; d[1]: expected 2 but got 3"#
        );
    }

    #[test]
    fn test_customization_short_circuits() {
        let comparator = Comparator::with_mode(CompareMode::Strict)
            .customize_path("a.id", RegexMatcher::constant(r"\d+").unwrap())
            .unwrap()
            .ignore("a.meta")
            .unwrap();

        let diffs = diff_with(
            &json!({ "a": { "id": "ignored", "meta": { "x": 1 } } }),
            &json!({ "a": { "id": 42, "meta": [] } }),
            &comparator,
        );
        assert_eq!(diffs, vec![]);

        let diffs = diff_with(
            &json!({ "a": { "id": "ignored", "meta": 1 } }),
            &json!({ "a": { "id": "x42" } }),
            &comparator,
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].kind, FailureKind::Matcher);
        assert_eq!(
            diffs[0].to_string(),
            r"a.id: Constant expected pattern '\d+' did not match value 'x42'"
        );
    }

    #[test]
    fn test_ignore_tolerates_absent_fields() {
        let comparator = Comparator::with_mode(CompareMode::Strict)
            .ignore("**.timestamp")
            .unwrap();

        let diffs = diff_with(
            &json!({ "a": { "timestamp": 1 } }),
            &json!({ "a": {}, "timestamp": 2 }),
            &comparator,
        );
        assert_eq!(diffs, vec![]);
    }

    #[test]
    fn test_recursive_wildcard_customization() {
        let comparator = Comparator::with_mode(CompareMode::Strict)
            .customize_path("**.tags", ArraySizeMatcher)
            .unwrap();

        let expected = json!({
            "tags": [2],
            "nested": { "deeper": { "tags": [1, 3] } }
        });
        let actual = json!({
            "tags": ["a", "b"],
            "nested": { "deeper": { "tags": ["a", "b", "c", "d"] } }
        });
        assert_eq!(
            message(&expected, &actual, &comparator),
            "nested.deeper.tags: expected array size of 1 to 3 elements but got 4"
        );
    }

    #[test]
    fn test_first_registered_customization_wins() {
        let comparator = Comparator::with_mode(CompareMode::Strict)
            .customize_path("user", LiteralMatcher)
            .unwrap()
            .ignore("*")
            .unwrap();

        let diffs = diff_with(
            &json!({ "user": { "name": "a" }, "other": 1 }),
            &json!({ "user": { "name": "b" }, "other": 2 }),
            &comparator,
        );
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "user.name");
    }

    #[test]
    fn test_literal_matcher_keeps_nested_customizations() {
        let comparator = Comparator::with_mode(CompareMode::Strict)
            .customize_path("a", LiteralMatcher)
            .unwrap()
            .ignore("a.b")
            .unwrap();

        let diffs = diff_with(
            &json!({ "a": { "b": 1, "c": 2 } }),
            &json!({ "a": { "b": 9, "c": 2 } }),
            &comparator,
        );
        assert_eq!(diffs, vec![]);
    }

    #[test]
    fn test_validation_runs_before_comparison() {
        let comparator = Comparator::with_mode(CompareMode::Strict)
            .customize_path("a", ArraySizeMatcher)
            .unwrap();
        let err = comparator
            .compare(&Node::from(json!({ "a": [4, 2] })), &Node::from(json!({ "a": [] })))
            .unwrap_err();
        assert!(matches!(err, ConfigError::SizeOrder { min: 4, max: 2, .. }));

        let comparator = Comparator::with_mode(CompareMode::Strict)
            .customize_path("id", RegexMatcher::dynamic())
            .unwrap();
        let err = comparator
            .compare(&Node::from(json!({ "id": "(" })), &Node::from(json!({ "id": "x" })))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Regex { .. }));
    }

    #[test]
    fn test_compare_text() {
        let comparator = Comparator::with_mode(CompareMode::Lenient);
        let result = comparator
            .compare_text(r#"{"a": [1, 2]}"#, r#"{"a": [1, 2], "b": null}"#)
            .unwrap();
        assert!(result.passed());

        let err = comparator.compare_text("{", "{}").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                side: Side::Expected,
                ..
            }
        ));

        let err = comparator.compare_text("{}", "[1,").unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                side: Side::Actual,
                ..
            }
        ));
    }
}
