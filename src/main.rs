//! Command-line interface for jinja2gotmpl
//!
//! Usage:
//!   jinja2gotmpl `<template>` [--strict] [--emit `<view>`] [-o `<file>`]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use clap::{Parser, ValueEnum};
use jinja2gotmpl::{lexer, Options};
use miette::{IntoDiagnostic, NamedSource, Report, WrapErr};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Parser)]
#[command(name = "jinja2gotmpl", version)]
#[command(about = "Transpile a Jinja-style template into Go text/template source")]
struct Args {
    /// Path to the template file
    template: PathBuf,

    /// Fail on blocks that would otherwise be dropped with a warning
    #[arg(long, env = "JINJA2GOTMPL_STRICT")]
    strict: bool,

    /// What to print
    #[arg(long, value_enum, default_value_t = Emit::Gotmpl)]
    emit: Emit,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The transpiled Go template
    Gotmpl,
    /// Token stream as JSON
    Tokens,
    /// Parsed tree as JSON
    Ast,
}

/// Install a stderr subscriber filtered by `RUST_LOG` (default: errors only;
/// dropped blocks are reported as diagnostics instead).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(filter),
        )
        .init();
}

fn main() -> miette::Result<()> {
    init_tracing();
    let args = Args::parse();

    let source = fs::read_to_string(&args.template)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", args.template.display()))?;
    let named = || NamedSource::new(args.template.display().to_string(), source.clone());
    let options = Options::new().strict(args.strict);

    let rendered = match args.emit {
        Emit::Tokens => serde_json::to_string_pretty(&lexer::tokenize(&source)).into_diagnostic()?,
        Emit::Ast => {
            let (root, _) = jinja2gotmpl::parse(&source, &options)
                .map_err(|e| Report::new(e).with_source_code(named()))?;
            serde_json::to_string_pretty(&root).into_diagnostic()?
        }
        Emit::Gotmpl => {
            let transpiled = jinja2gotmpl::transpile_with(&source, &options)
                .map_err(|e| Report::new(e).with_source_code(named()))?;
            for warning in transpiled.warnings {
                eprintln!("{:?}", Report::new(warning).with_source_code(named()));
            }
            transpiled.output
        }
    };

    match args.output {
        Some(path) => fs::write(&path, rendered)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
