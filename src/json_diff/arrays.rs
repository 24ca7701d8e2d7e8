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

use super::misc::{canonical, summary};
use super::path::{Key, Path};
use super::result::ComparisonResult;
use super::{Comparator, NumericMode};
use crate::document::Node;
use log::debug;
use std::collections::{HashMap, HashSet};

pub(super) fn compare_arrays(
    comparator: &Comparator,
    path: &Path,
    expected: &[Node],
    actual: &[Node],
    acc: &mut ComparisonResult,
) {
    if comparator.config().has_strict_order() {
        positional(comparator, path, expected, actual, acc);
    } else {
        unordered(comparator, path, expected, actual, acc);
    }
}

/// Element `i` against element `i`; a length difference is reported once and
/// the overlapping prefix is still compared.
fn positional(
    comparator: &Comparator,
    path: &Path,
    expected: &[Node],
    actual: &[Node],
    acc: &mut ComparisonResult,
) {
    if expected.len() != actual.len() {
        acc.array_length(path, expected.len(), actual.len());
    }

    for (idx, (lhs, rhs)) in expected.iter().zip(actual).enumerate() {
        comparator.compare_values(&path.append(Key::Idx(idx)), lhs, rhs, acc);
    }
}

fn unordered(
    comparator: &Comparator,
    path: &Path,
    expected: &[Node],
    actual: &[Node],
    acc: &mut ComparisonResult,
) {
    if expected.len() != actual.len() {
        acc.array_length(path, expected.len(), actual.len());
        return;
    }
    if expected.is_empty() {
        return;
    }

    let numeric = comparator.config().numeric();
    if expected.iter().all(Node::is_scalar) {
        return cardinality(path, expected, actual, numeric, acc);
    }

    if expected.iter().all(Node::is_object) {
        if let Some(key) = find_unique_key(expected, actual, numeric) {
            debug!("{}: pairing elements by unique key '{}'", path, key);
            return by_unique_key(comparator, path, key, expected, actual, acc);
        }
        debug!("{}: no usable unique key", path);
    }

    debug!("{}: pairing elements by comparison", path);
    pair_elements(comparator, path, expected, actual, acc);
}

/// The first field of the first expected element that is a usable unique key
/// in both arrays.
fn find_unique_key<'a>(
    expected: &'a [Node],
    actual: &[Node],
    numeric: NumericMode,
) -> Option<&'a str> {
    let first = expected.first()?.as_object()?;

    first.keys().find(|key| {
        is_usable_unique_key(key, expected, numeric) && is_usable_unique_key(key, actual, numeric)
    })
}

/// Every element is an object holding a scalar under `key`, and no two
/// elements hold the same one.
fn is_usable_unique_key(key: &str, items: &[Node], numeric: NumericMode) -> bool {
    let mut seen = HashSet::new();

    items.iter().all(|item| match item.get(key) {
        Some(value) if value.is_scalar() => seen.insert(canonical(value, numeric)),
        _ => false,
    })
}

fn by_unique_key(
    comparator: &Comparator,
    path: &Path,
    key: &str,
    expected: &[Node],
    actual: &[Node],
    acc: &mut ComparisonResult,
) {
    let numeric = comparator.config().numeric();
    let actual_by_key = actual
        .iter()
        .filter_map(|item| item.get(key).map(|value| (canonical(value, numeric), item)))
        .collect::<HashMap<_, _>>();

    for lhs in expected {
        let Some(value) = lhs.get(key) else {
            continue;
        };
        let element_path = path.append(Key::unique(key, value.text()));

        match actual_by_key.get(&canonical(value, numeric)) {
            Some(rhs) => comparator.compare_values(&element_path, lhs, rhs, acc),
            None => acc.missing(&element_path, summary(lhs)),
        }
    }

    let expected_keys = expected
        .iter()
        .filter_map(|item| item.get(key))
        .map(|value| canonical(value, numeric))
        .collect::<HashSet<_>>();
    for rhs in actual {
        let Some(value) = rhs.get(key) else {
            continue;
        };
        if !expected_keys.contains(&canonical(value, numeric)) {
            acc.unexpected(&path.append(Key::unique(key, value.text())), summary(rhs));
        }
    }
}

/// Each distinct value must occur as often in the actual array as in the
/// expected one.
fn cardinality(
    path: &Path,
    expected: &[Node],
    actual: &[Node],
    numeric: NumericMode,
    acc: &mut ComparisonResult,
) {
    let expected_counts = count(expected, numeric);
    let actual_counts = count(actual, numeric);
    let mut reported = HashSet::new();

    for item in expected.iter().chain(actual) {
        let key = canonical(item, numeric);
        let want = expected_counts.get(&key).copied().unwrap_or(0);
        let got = actual_counts.get(&key).copied().unwrap_or(0);
        if want == got || !reported.insert(key) {
            continue;
        }

        acc.unmatched(
            path,
            format!("{} occurrence(s) of {}", want, summary(item)),
            format!("{} occurrence(s)", got),
        );
    }
}

fn count(items: &[Node], numeric: NumericMode) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(canonical(item, numeric)).or_insert(0) += 1;
    }
    counts
}

/// Pairs expected with actual elements that compare clean, as many as
/// possible, and reports what is left unpaired.
///
/// Candidates are compared with the full comparator so customizations and
/// nested order rules apply inside the elements.
fn pair_elements(
    comparator: &Comparator,
    path: &Path,
    expected: &[Node],
    actual: &[Node],
    acc: &mut ComparisonResult,
) {
    let fits = expected
        .iter()
        .map(|lhs| {
            actual
                .iter()
                .enumerate()
                .filter(|(candidate, rhs)| {
                    let mut scratch = ComparisonResult::new();
                    let element_path = path.append(Key::Idx(*candidate));
                    comparator.compare_values(&element_path, lhs, rhs, &mut scratch);
                    scratch.passed()
                })
                .map(|(candidate, _)| candidate)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut owner = vec![None; actual.len()];
    for lhs in 0..expected.len() {
        let mut visited = vec![false; actual.len()];
        augment(lhs, &fits, &mut owner, &mut visited);
    }

    let paired = owner.iter().flatten().copied().collect::<HashSet<_>>();
    for (idx, lhs) in expected.iter().enumerate() {
        if !paired.contains(&idx) {
            acc.unmatched(
                &path.append(Key::Idx(idx)),
                summary(lhs),
                "no matching element",
            );
        }
    }

    if comparator.config().is_extensible() {
        return;
    }
    for (idx, rhs) in actual.iter().enumerate() {
        if owner[idx].is_none() {
            acc.unexpected(&path.append(Key::Idx(idx)), summary(rhs));
        }
    }
}

/// Finds an actual element for `lhs`, moving earlier pairings along when
/// that frees one up.
fn augment(
    lhs: usize,
    fits: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &rhs in &fits[lhs] {
        if visited[rhs] {
            continue;
        }
        visited[rhs] = true;
        let free = match owner[rhs] {
            None => true,
            Some(other) => augment(other, fits, owner, visited),
        };
        if free {
            owner[rhs] = Some(lhs);
            return true;
        }
    }
    false
}
