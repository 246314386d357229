// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A demo read-eval-print loop. The evaluator here only reports what it was given, so
//! the binary is a way to try the editor: multi-line entry, auto-indentation, history
//! and the double-press keys.

use std::io::stdout;

use clap::{Args, Parser, ValueEnum};
use crossterm::{event::{DisableBracketedPaste, EnableBracketedPaste},
                execute, terminal};
use miette::IntoDiagnostic as _;
use r3bl_repl_editor::{DEFAULT_INDENT_UNIT, DEFAULT_PROMPT, EditorConfig, EditorEvent,
                       LineEditor, TracingConfig, count_lines,
                       try_initialize_logging_global};
use tracing_core::LevelFilter;

#[derive(Debug, Parser)]
#[command(bin_name = "repl")]
#[command(about = "Multi-line REPL prompt for a block structured language")]
#[command(version)]
#[command(next_line_help = true)]
/// More info: <https://docs.rs/clap/latest/clap/_derive/#overview>
pub struct CLIArg {
    #[arg(long, default_value = DEFAULT_PROMPT, help = "Prompt shown before the first line")]
    pub prompt: String,

    #[arg(
        long,
        default_value_t = DEFAULT_INDENT_UNIT.len(),
        help = "Spaces per indentation level"
    )]
    pub indent_width: usize,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file named `repl_editor.log` for debugging"
    )]
    pub enable_logging: bool,

    #[arg(global = true, long, value_enum, default_value_t = LogLevel::Debug)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

// Note: The `tokio::main` macro internally calls `.expect("Failed building the Runtime")`
// when initializing the Tokio runtime.
#[tokio::main]
#[allow(clippy::unwrap_in_result)]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    let enable_logging = cli_arg.global_options.enable_logging;
    if enable_logging {
        try_initialize_logging_global(TracingConfig::new_file(
            None,
            cli_arg.global_options.log_level.into(),
        ))?;
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    }

    let config = EditorConfig::default()
        .with_prompt(cli_arg.prompt)
        .with_indent_width(cli_arg.indent_width);

    terminal::enable_raw_mode().into_diagnostic()?;
    execute!(stdout(), EnableBracketedPaste).into_diagnostic()?;

    let result = run_repl(config).await;

    execute!(stdout(), DisableBracketedPaste).into_diagnostic()?;
    terminal::disable_raw_mode().into_diagnostic()?;
    println!();

    if enable_logging {
        tracing::debug!(message = "Stop logging...");
    }
    result
}

async fn run_repl(config: EditorConfig) -> miette::Result<()> {
    let mut editor = LineEditor::try_new_with_terminal(config)?;
    loop {
        match editor.readline().await? {
            EditorEvent::Command(text) => {
                let answer = evaluate(&text, editor.prompt_number());
                editor.print(&answer)?;
                editor.prompt()?;
            }
            EditorEvent::Close => break,
        }
    }
    Ok(())
}

/// Stands in for a real evaluator.
fn evaluate(text: &str, prompt_number: usize) -> String {
    format!(
        "[{prompt_number}] read {} line(s), {} char(s)",
        count_lines(text),
        text.chars().count()
    )
}
