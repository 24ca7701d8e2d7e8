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

use super::NumericMode;
use crate::document::{Node, Scalar};
use serde_json::Number;

const MAX_SUMMARY_LEN: usize = 60;

pub trait Indent {
    fn indent(&self, level: u32) -> String;
}

impl<T> Indent for T
where
    T: ToString,
{
    fn indent(&self, level: u32) -> String {
        let mut indent = String::new();
        for _ in 0..level {
            indent.push(' ');
        }

        self.to_string()
            .lines()
            .map(|line| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compact rendering of a node for failure messages, shortened when long.
pub fn summary(node: &Node) -> String {
    let full = node.to_string();
    if full.chars().count() <= MAX_SUMMARY_LEN {
        return full;
    }
    match node {
        Node::Object(fields) => format!("{{...{} fields}}", fields.len()),
        Node::Array(items) => format!("[...{} elements]", items.len()),
        Node::Scalar(_) => {
            let head: String = full.chars().take(MAX_SUMMARY_LEN - 3).collect();
            format!("{}...", head)
        }
    }
}

/// A number with integral floats folded into the integers, so that equality
/// and grouping agree on which representations denote the same value.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Numeric {
    Int(i128),
    Float(f64),
}

// Integral floats beyond this do not fit an i128.
const INTEGRAL_LIMIT: f64 = 1.0e38;

fn normalize(n: &Number) -> Numeric {
    if let Some(i) = n.as_i64() {
        return Numeric::Int(i128::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Numeric::Int(i128::from(u));
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < INTEGRAL_LIMIT => Numeric::Int(f as i128),
        Some(f) => Numeric::Float(f),
        None => Numeric::Float(f64::NAN),
    }
}

/// Numeric equality across integer and floating representations.
pub fn numbers_equal(a: &Number, b: &Number) -> bool {
    normalize(a) == normalize(b)
}

/// Grouping key under which structurally equal nodes collide: object keys
/// sorted and, under [`NumericMode::AssumeFloat`], integral floats written as
/// integers.
pub fn canonical(node: &Node, mode: NumericMode) -> String {
    let mut out = String::new();
    write_canonical(node, mode, &mut out);
    out
}

fn write_canonical(node: &Node, mode: NumericMode, out: &mut String) {
    match node {
        Node::Object(fields) => {
            let mut entries = fields.iter().collect::<Vec<_>>();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Node::Scalar(Scalar::String(key.to_string())).to_string());
                out.push(':');
                write_canonical(value, mode, out);
            }
            out.push('}');
        }
        Node::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, mode, out);
            }
            out.push(']');
        }
        Node::Scalar(Scalar::Number(n)) if mode == NumericMode::AssumeFloat => {
            out.push_str(&canonical_number(n))
        }
        Node::Scalar(_) => out.push_str(&node.to_string()),
    }
}

fn canonical_number(n: &Number) -> String {
    match normalize(n) {
        Numeric::Int(i) => i.to_string(),
        Numeric::Float(_) => n.to_string(),
    }
}
