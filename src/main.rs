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

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use log::debug;

use json_assert::{
    ArraySizeMatcher, AssertionError, CompareMode, Comparator, Error, JsonAssert, RegexMatcher,
};

#[doc(hidden)]
#[macro_export]
macro_rules! handle_error {
    ($code:expr, $msg:expr, $($arg:tt)*) => {
        println!($msg, $($arg)*);
        std::process::exit($code);
    };

    ($code:expr, $msg:expr) => {
        println!($msg);
        std::process::exit($code);
    };
}

#[doc(hidden)]
struct Code;

impl Code {
    const SUCCESS: i32 = 0;
    const INTERNAL_ERROR: i32 = 1;
    const INVALID_ARGUMENT: i32 = 2;
    const DOC_PARSING_ERROR: i32 = 3;
    const DOC_ASSERTION_ERROR: i32 = 4;
}

/// A `PATH=PATTERN` pair for a constant regular expression.
#[doc(hidden)]
#[derive(Debug, Clone)]
struct RegexRule {
    path: String,
    pattern: String,
}

impl FromStr for RegexRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // a path only holds '=' inside `[field=value]` selectors
        let mut depth = 0usize;
        let Some(eq) = s.char_indices().find_map(|(idx, c)| {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '=' if depth == 0 => return Some(idx),
                _ => {}
            }
            None
        }) else {
            return Err(format!("expected PATH=PATTERN, got '{}'", s));
        };

        Ok(RegexRule {
            path: s[..eq].to_string(),
            pattern: s[eq + 1..].to_string(),
        })
    }
}

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = None,
    after_help = "Customization flags apply in the order given: the first one whose path matches wins."
)]
struct Cli {
    /// Expected JSON document
    expected: PathBuf,

    /// Actual JSON document
    actual: PathBuf,

    /// Compare mode: strict, lenient, strict-order or non-extensible
    #[clap(short, long, default_value = "strict")]
    mode: CompareMode,

    /// Match the actual value at PATH against a constant regular expression
    #[clap(long = "regex", value_name = "PATH=PATTERN")]
    regexes: Vec<RegexRule>,

    /// Treat the expected value at PATH as a regular expression
    #[clap(long = "dynamic-regex", value_name = "PATH")]
    dynamic_regexes: Vec<String>,

    /// Treat the expected value at PATH as array size bounds
    #[clap(long = "array-size", value_name = "PATH")]
    array_sizes: Vec<String>,

    /// Accept any value at PATH
    #[clap(long = "ignore", value_name = "PATH")]
    ignored: Vec<String>,
}

fn read(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            handle_error!(
                Code::INVALID_ARGUMENT,
                "Error: no such file {}",
                path.display()
            );
        }
        Err(err) => {
            handle_error!(
                Code::INTERNAL_ERROR,
                "Error: cannot read {}: {}",
                path.display(),
                err
            );
        }
    }
}

/// One customization flag as given on the command line.
#[derive(Debug)]
enum Rule<'a> {
    Ignore(&'a str),
    Regex(&'a RegexRule),
    DynamicRegex(&'a str),
    ArraySize(&'a str),
}

/// Customization flags in command-line order, since the first registered
/// pattern matching a path wins.
fn rules<'a>(cli: &'a Cli, matches: &ArgMatches) -> Vec<Rule<'a>> {
    let indices = |id: &str| {
        matches
            .indices_of(id)
            .map(|indices| indices.collect::<Vec<_>>())
            .unwrap_or_default()
    };

    let mut rules = Vec::new();
    rules.extend(
        indices("ignored")
            .into_iter()
            .zip(&cli.ignored)
            .map(|(idx, path)| (idx, Rule::Ignore(path))),
    );
    rules.extend(
        indices("regexes")
            .into_iter()
            .zip(&cli.regexes)
            .map(|(idx, rule)| (idx, Rule::Regex(rule))),
    );
    rules.extend(
        indices("dynamic_regexes")
            .into_iter()
            .zip(&cli.dynamic_regexes)
            .map(|(idx, path)| (idx, Rule::DynamicRegex(path))),
    );
    rules.extend(
        indices("array_sizes")
            .into_iter()
            .zip(&cli.array_sizes)
            .map(|(idx, path)| (idx, Rule::ArraySize(path))),
    );

    rules.sort_by_key(|(idx, _)| *idx);
    rules.into_iter().map(|(_, rule)| rule).collect()
}

fn build_comparator(cli: &Cli, matches: &ArgMatches) -> Result<Comparator, Error> {
    let mut comparator = Comparator::with_mode(cli.mode);

    for rule in rules(cli, matches) {
        comparator = match rule {
            Rule::Ignore(path) => comparator.ignore(path)?,
            Rule::Regex(rule) => {
                let matcher = RegexMatcher::constant(&rule.pattern)?;
                comparator.customize_path(&rule.path, matcher)?
            }
            Rule::DynamicRegex(path) => comparator.customize_path(path, RegexMatcher::dynamic())?,
            Rule::ArraySize(path) => comparator.customize_path(path, ArraySizeMatcher)?,
        };
    }

    debug!(
        "comparing in {} mode with {} customizations",
        cli.mode,
        comparator.customizations().len()
    );
    Ok(comparator)
}

#[doc(hidden)]
fn main() {
    env_logger::init();

    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let comparator = match build_comparator(&cli, &matches) {
        Ok(comparator) => comparator,
        Err(err) => {
            handle_error!(Code::INVALID_ARGUMENT, "Error: {}", err);
        }
    };

    let expected = read(&cli.expected);
    let actual = read(&cli.actual);

    let result = JsonAssert::new()
        .with_comparator(comparator)
        .try_assert(&expected, &actual);

    match result {
        Ok(()) => {
            println!("documents match");
            std::process::exit(Code::SUCCESS);
        }
        Err(err) => match err {
            AssertionError::Malformed(Error::Parse { side, source }) => {
                handle_error!(
                    Code::DOC_PARSING_ERROR,
                    "Error parsing {} document: {}",
                    side,
                    source
                );
            }
            AssertionError::Malformed(Error::Config(err)) => {
                handle_error!(Code::INVALID_ARGUMENT, "Error: {}", err);
            }
            AssertionError::Mismatch(result) => {
                handle_error!(Code::DOC_ASSERTION_ERROR, "{}", result.report());
            }
        },
    }
}
