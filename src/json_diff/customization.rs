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

use super::matcher::ValueMatcher;
use super::path::{Path, PathPattern};
use crate::error::PatternSyntaxError;
use std::fmt;

/// A matcher bound to the paths selected by a pattern.
pub struct Customization {
    pattern: PathPattern,
    matcher: Box<dyn ValueMatcher>,
}

impl Customization {
    pub fn new(pattern: PathPattern, matcher: impl ValueMatcher + 'static) -> Self {
        Self {
            pattern,
            matcher: Box::new(matcher),
        }
    }

    /// Compiles `pattern` and binds `matcher` to it.
    pub fn parse(
        pattern: &str,
        matcher: impl ValueMatcher + 'static,
    ) -> Result<Self, PatternSyntaxError> {
        Ok(Self::new(PathPattern::compile(pattern)?, matcher))
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn matcher(&self) -> &dyn ValueMatcher {
        self.matcher.as_ref()
    }

    pub fn applies_to(&self, path: &Path) -> bool {
        self.pattern.matches(path)
    }
}

impl fmt::Debug for Customization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customization")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Ordered registry of customizations.
///
/// Lookup returns the first registered customization whose pattern matches;
/// there is no ranking by specificity, so register narrow patterns before
/// broad ones.
#[derive(Debug, Default)]
pub struct Customizations {
    entries: Vec<Customization>,
}

impl Customizations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, customization: Customization) {
        self.entries.push(customization);
    }

    pub fn with(mut self, customization: Customization) -> Self {
        self.add(customization);
        self
    }

    pub fn resolve(&self, path: &Path) -> Option<&Customization> {
        self.entries.iter().find(|c| c.applies_to(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customization> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Customization> for Customizations {
    fn from_iter<I: IntoIterator<Item = Customization>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Customizations {
    type Item = Customization;
    type IntoIter = std::vec::IntoIter<Customization>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<Customization> for Customizations {
    fn extend<I: IntoIterator<Item = Customization>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
