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

use super::misc::Indent;
use super::path::Path;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A field of the expected object is absent from the actual one.
    MissingField,
    /// The actual object carries a field the expected one does not.
    UnexpectedField,
    TypeMismatch,
    ArrayLength,
    ValueMismatch,
    /// An element of an unordered array found no counterpart.
    Unmatched,
    /// A value matcher rejected the actual value.
    Matcher,
}

/// One discrepancy found during a comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub path: String,
    pub expected: String,
    pub actual: String,
    /// Matcher-provided explanation, replacing the default wording.
    pub detail: Option<String>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(detail) = &self.detail {
            return write!(f, "{}: {}", self.path, detail);
        }

        match self.kind {
            FailureKind::MissingField => {
                write!(f, "{}: expected {} but none found", self.path, self.expected)
            }
            FailureKind::UnexpectedField => write!(f, "{}: unexpected {}", self.path, self.actual),
            FailureKind::TypeMismatch => write!(
                f,
                "{}: type mismatch, expected {} but got {}",
                self.path, self.expected, self.actual
            ),
            _ => write!(
                f,
                "{}: expected {} but got {}",
                self.path, self.expected, self.actual
            ),
        }
    }
}

/// Accumulates the failures of one comparison run.
///
/// A result starts out passed; the first recorded failure flips it to failed
/// and nothing flips it back.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    passed: bool,
    failures: Vec<Failure>,
}

impl ComparisonResult {
    pub fn new() -> Self {
        Self {
            passed: true,
            failures: vec![],
        }
    }

    pub fn record(&mut self, failure: Failure) {
        self.passed = false;
        self.failures.push(failure);
    }

    /// Records a value mismatch at `path`.
    pub fn fail(&mut self, path: &Path, expected: impl fmt::Display, actual: impl fmt::Display) {
        self.push(FailureKind::ValueMismatch, path, expected, actual);
    }

    pub fn missing(&mut self, path: &Path, expected: impl fmt::Display) {
        self.push(FailureKind::MissingField, path, expected, "nothing");
    }

    pub fn unexpected(&mut self, path: &Path, actual: impl fmt::Display) {
        self.push(FailureKind::UnexpectedField, path, "nothing", actual);
    }

    pub fn type_mismatch(
        &mut self,
        path: &Path,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) {
        self.push(FailureKind::TypeMismatch, path, expected, actual);
    }

    pub fn array_length(&mut self, path: &Path, expected: usize, actual: usize) {
        self.push(
            FailureKind::ArrayLength,
            path,
            format!("{} values", expected),
            format!("{} values", actual),
        );
    }

    pub fn unmatched(&mut self, path: &Path, expected: impl fmt::Display, actual: impl fmt::Display) {
        self.push(FailureKind::Unmatched, path, expected, actual);
    }

    /// Records a matcher rejection with its own explanation.
    pub fn fail_with_detail(
        &mut self,
        path: &Path,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
        detail: impl fmt::Display,
    ) {
        self.record(Failure {
            kind: FailureKind::Matcher,
            path: path.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            detail: Some(detail.to_string()),
        });
    }

    fn push(
        &mut self,
        kind: FailureKind,
        path: &Path,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) {
        self.record(Failure {
            kind,
            path: path.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            detail: None,
        });
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn failed(&self) -> bool {
        !self.passed
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Failures that are neither missing nor unexpected fields.
    pub fn field_failures(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|f| {
            !matches!(
                f.kind,
                FailureKind::MissingField | FailureKind::UnexpectedField
            )
        })
    }

    pub fn field_missing(&self) -> impl Iterator<Item = &Failure> {
        self.of_kind(FailureKind::MissingField)
    }

    pub fn field_unexpected(&self) -> impl Iterator<Item = &Failure> {
        self.of_kind(FailureKind::UnexpectedField)
    }

    fn of_kind(&self, kind: FailureKind) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    /// All failures as one `" ; "`-joined line. Empty when passed.
    pub fn message(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(" ; ")
    }

    /// Multi-line rendering, one indented failure per line.
    pub fn report(&self) -> String {
        if self.passed {
            return "documents match".to_string();
        }

        let lines = self
            .failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{} failure{}:\n{}",
            self.failures.len(),
            if self.failures.len() == 1 { "" } else { "s" },
            lines.indent(4)
        )
    }
}

impl Default for ComparisonResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
