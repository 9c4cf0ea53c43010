// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rewrites Go i18n code to pass the request language explicitly.
//!
//! The functions here implement a one-shot migration from a global
//! language setting to a per-request language. Two rewrites exist:
//!
//! * [`signatures::rewrite_helpers`] adds a `lang string` parameter
//!   to the `T`-prefixed translation helpers and makes them call
//!   `i18n.TWithLang`.
//! * [`handlers::rewrite_handlers`] makes every MCP handler extract
//!   the language at the top of its body and pass it on to the
//!   helpers it calls.
//!
//! The rewrites are purely textual. Signatures spanning several lines
//! or parameter lists with nested parentheses are not recognized and
//! are passed through unchanged.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

pub mod handlers;
pub mod signatures;

/// Replacement for the opening of a single-argument `i18n.T` call.
const LANG_LOOKUP_CALL: &str = "i18n.TWithLang(lang, ";

/// The rewrite selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Rewrite translation helper definitions.
    Helpers,
    /// Rewrite request handlers and their helper calls.
    Handlers,
}

/// Returned when a mode name is neither `helpers` nor `handlers`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown mode: {0}")]
pub struct UnknownMode(pub String);

impl Mode {
    /// The name of this mode on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Helpers => "helpers",
            Mode::Handlers => "handlers",
        }
    }

    /// Apply the rewrite for this mode to a whole source file.
    ///
    /// # Examples
    ///
    /// ```
    /// use i18n_lang_refactor::Mode;
    ///
    /// assert_eq!(
    ///     Mode::Helpers.rewrite("func TFoo() string {"),
    ///     "func TFoo(lang string) string {"
    /// );
    /// ```
    pub fn rewrite(self, source: &str) -> String {
        match self {
            Mode::Helpers => signatures::rewrite_helpers(source),
            Mode::Handlers => handlers::rewrite_handlers(source),
        }
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "helpers" => Ok(Mode::Helpers),
            "handlers" => Ok(Mode::Handlers),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn lookup_call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"i18n\.T\(").expect("well-formed regex"))
}

/// Rewrite every `i18n.T(` call into `i18n.TWithLang(lang, `.
///
/// A call whose text is immediately preceded by `skip_after` is left
/// alone. The `regex` crate has no look-behind, so the preceding text
/// is checked by hand.
pub(crate) fn rewrite_lookup_calls(source: &str, skip_after: Option<&str>) -> String {
    let mut result = String::with_capacity(source.len());
    let mut last_end = 0;
    let mut count = 0;

    for m in lookup_call_regex().find_iter(source) {
        result.push_str(&source[last_end..m.start()]);
        if skip_after.is_some_and(|prefix| source[..m.start()].ends_with(prefix)) {
            result.push_str(m.as_str());
        } else {
            result.push_str(LANG_LOOKUP_CALL);
            count += 1;
        }
        last_end = m.end();
    }
    result.push_str(&source[last_end..]);

    debug!(count, "rewrote i18n.T calls");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("helpers".parse::<Mode>(), Ok(Mode::Helpers));
        assert_eq!("handlers".parse::<Mode>(), Ok(Mode::Handlers));
    }

    #[test]
    fn test_mode_from_str_unknown() {
        let err = "everything".parse::<Mode>().unwrap_err();
        assert_eq!(err, UnknownMode(String::from("everything")));
        assert_eq!(err.to_string(), "Unknown mode: everything");
    }

    #[test]
    fn test_mode_from_str_is_case_sensitive() {
        assert!("Helpers".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [Mode::Helpers, Mode::Handlers] {
            assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
        }
    }

    #[test]
    fn test_mode_dispatch() {
        let source = "func (h *Handlers) Ping(params map[string]interface{}) \
                      (*mcp.CallToolResult, error) {";
        // Handler definitions are not touched in helpers mode.
        assert_eq!(Mode::Helpers.rewrite(source), source);
        assert_ne!(Mode::Handlers.rewrite(source), source);
    }

    #[test]
    fn test_rewrite_lookup_calls() {
        assert_eq!(
            rewrite_lookup_calls(r#"return i18n.T("x")"#, None),
            r#"return i18n.TWithLang(lang, "x")"#
        );
    }

    #[test]
    fn test_rewrite_lookup_calls_multiple() {
        assert_eq!(
            rewrite_lookup_calls(r#"a := i18n.T("a") + i18n.T("b", nil)"#, None),
            r#"a := i18n.TWithLang(lang, "a") + i18n.TWithLang(lang, "b", nil)"#
        );
    }

    #[test]
    fn test_rewrite_lookup_calls_skip_after() {
        assert_eq!(
            rewrite_lookup_calls("Withi18n.T(x) i18n.T(y)", Some("With")),
            "Withi18n.T(x) i18n.TWithLang(lang, y)"
        );
    }

    #[test]
    fn test_rewrite_lookup_calls_ignores_other_functions() {
        let source = r#"i18n.TWithLang(lang, "x") i18n.TCommon("y") xi18n.Tr("z")"#;
        assert_eq!(rewrite_lookup_calls(source, None), source);
    }

    #[test]
    fn test_rewrite_lookup_calls_empty() {
        assert_eq!(rewrite_lookup_calls("", Some("With")), "");
    }
}
