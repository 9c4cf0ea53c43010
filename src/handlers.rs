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

//! Pass the request language from MCP handlers to the i18n helpers.
//!
//! This file contains the logic used by the `handlers` mode of
//! `refactor-i18n`. Running it on its own output changes nothing.

use crate::rewrite_lookup_calls;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::{debug, trace};

/// The translation helpers which take the language as first argument
/// once the `helpers` rewrite has been applied to their definitions.
pub const HELPER_NAMES: [&str; 28] = [
    "TCommon",
    "TParam",
    "TValidation",
    "TRequiredParam",
    "TRequiredArray",
    "TRequiredObject",
    "TEntityNotFound",
    "TEntityNotFoundByID",
    "TOperationFailed",
    "TSuccess",
    "TInvalidValue",
    "TInvalidStatus",
    "TInvalidPriority",
    "TInvalidDate",
    "TInvalidFormat",
    "TCreateFailed",
    "TUpdateFailed",
    "TDeleteFailed",
    "TFetchFailed",
    "TSaveFailed",
    "TLoadFailed",
    "TSearchFailed",
    "TMarkdownLabel",
    "TListItem",
    "TStatus",
    "TPriority",
    "TAddFailed",
    "TRemoveFailed",
];

/// Statement injected at the top of every handler body.
const LANG_BINDING: &str = "lang := h.extractLanguage()";

fn handler_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r"(?x)
              func\x20\(h\x20\*Handlers\)\x20
              (?<name>[A-Z]\w+)
              \(params\x20map\[string\]interface\{\}\)
              \x20\(\*mcp\.CallToolResult,\x20error\)\x20\{
              (?<existing>\r?\n[\x20\t]*lang\x20:=\x20h\.extractLanguage\(\))?
        ";
        Regex::new(pattern).expect("well-formed regex")
    })
}

fn helper_call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = HELPER_NAMES
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"i18n\.(?<name>{names})\((?<existing>lang\s*,)?");
        Regex::new(&pattern).expect("well-formed regex")
    })
}

/// Inject the language binding right after each handler's opening brace.
fn inject_language_binding(source: &str) -> String {
    let mut count = 0;
    let rewritten = handler_regex().replace_all(source, |caps: &Captures| {
        if caps.name("existing").is_some() {
            return caps[0].to_string();
        }
        count += 1;
        trace!(handler = &caps["name"], "injecting language binding");
        format!("{}\n\t{LANG_BINDING}", &caps[0])
    });
    debug!(count, "rewrote handler definitions");
    rewritten.into_owned()
}

/// Pass `lang` as first argument to every call of a [`HELPER_NAMES`] helper.
fn add_language_argument(source: &str) -> String {
    let mut count = 0;
    let rewritten = helper_call_regex().replace_all(source, |caps: &Captures| {
        if caps.name("existing").is_some() {
            return caps[0].to_string();
        }
        count += 1;
        format!("i18n.{}(lang, ", &caps["name"])
    });
    debug!(count, "rewrote helper calls");
    rewritten.into_owned()
}

/// Rewrite MCP handlers to look up the request language once and
/// pass it to every translation helper they call.
///
/// Three sweeps are applied in order:
///
/// 1. Every `func (h *Handlers) Name(params map[string]interface{})
///    (*mcp.CallToolResult, error) {` gets `lang := h.extractLanguage()`
///    on a new line after the opening brace.
/// 2. Every `i18n.Name(` call to one of the [`HELPER_NAMES`] becomes
///    `i18n.Name(lang, `.
/// 3. Every remaining `i18n.T(` call becomes `i18n.TWithLang(lang, `.
///
/// Handlers which already start with the binding and helper calls
/// which already pass `lang` first are left alone. Text that does not
/// match is returned unchanged.
pub fn rewrite_handlers(source: &str) -> String {
    let content = inject_language_binding(source);
    let content = add_language_argument(&content);
    rewrite_lookup_calls(&content, Some("With"))
}
