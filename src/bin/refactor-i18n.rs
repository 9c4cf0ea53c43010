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

//! Thread a per-request language through Go i18n code.
//!
//! This program reads a single Go source file, rewrites it and prints
//! the result on stdout. The input file is never modified, so the
//! output can be redirected and reviewed as a diff:
//!
//! ```shell
//! refactor-i18n helpers internal/i18n/helpers.go > helpers.go.new
//! refactor-i18n handlers internal/mcp/handlers.go > handlers.go.new
//! ```
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) to see how many matches
//! each rewrite rule found.

use anyhow::Context;
use clap::Parser;
use i18n_lang_refactor::Mode;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Add a per-request language parameter to Go i18n code.")]
struct Args {
    /// Log the matches of each rewrite rule on stderr.
    #[arg(short, long)]
    verbose: bool,
    /// Either `helpers` (helper definitions) or `handlers` (MCP handlers).
    mode: String,
    /// The Go source file to rewrite.
    file: PathBuf,
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Reads `path` and returns its content rewritten for `mode`.
fn rewrite_file(mode: Mode, path: &Path) -> anyhow::Result<String> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Could not read {:?}", path))?;
    debug!(%mode, path = %path.display(), bytes = source.len(), "rewriting file");
    Ok(mode.rewrite(&source))
}

/// Exit status for a command line that clap rejected.
///
/// Usage errors exit with 1, `--help` and `--version` with 0.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

/// Rewrites the file named by `args` into `out` and returns the exit status.
///
/// An unknown mode is reported on stderr rather than stdout, so that
/// `out` only ever carries Go source.
fn run(args: &Args, out: &mut impl Write) -> anyhow::Result<i32> {
    let mode = match args.mode.parse::<Mode>() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("{err}");
            return Ok(1);
        }
    };

    let rewritten = rewrite_file(mode, &args.file)?;
    writeln!(out, "{rewritten}").context("Could not write rewritten source")?;
    out.flush().context("Could not write rewritten source")?;
    Ok(0)
}

fn main() -> anyhow::Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print()?;
            process::exit(usage_exit_code(&err));
        }
    };
    init_logging(args.verbose);

    let code = run(&args, &mut io::stdout().lock())?;
    if code != 0 {
        process::exit(code);
    }

    Ok(())
}
