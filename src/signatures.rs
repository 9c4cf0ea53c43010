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

//! Add the language parameter to translation helper definitions.
//!
//! This file contains the logic used by the `helpers` mode of
//! `refactor-i18n`.

use crate::rewrite_lookup_calls;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::{debug, trace};

fn signature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = r"(?x)
              func\x20
              (?<name>T[A-Z]\w+)          # helper name, e.g. TEntityNotFound
              \((?<params>.*?)\)          # raw parameter list, same line only
              \x20string\x20\{            # string result and opening brace
        ";
        Regex::new(pattern).expect("well-formed regex")
    })
}

/// Rewrite helper definitions to take the language as first parameter.
///
/// Every `func TFoo(params) string {` becomes
/// `func TFoo(lang string, params) string {`, or
/// `func TFoo(lang string) string {` when `params` is blank. Calls to
/// `i18n.T` are then turned into calls to `i18n.TWithLang` with the
/// new parameter as first argument.
///
/// Text that does not match is returned unchanged.
pub fn rewrite_helpers(source: &str) -> String {
    let mut count = 0;
    let rewritten = signature_regex().replace_all(source, |caps: &Captures| {
        count += 1;
        let name = &caps["name"];
        trace!(helper = name, "adding language parameter");
        match caps["params"].trim() {
            "" => format!("func {name}(lang string) string {{"),
            params => format!("func {name}(lang string, {params}) string {{"),
        }
    });
    debug!(count, "rewrote helper signatures");

    rewrite_lookup_calls(&rewritten, None)
}
