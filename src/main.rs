//! Purpose: `hyperpage` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Commands emit JSON on stdout (pretty on a TTY, compact otherwise).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: All dataset access goes through `api::Pager` (load once, index once).
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;

mod command_dispatch;
mod serve;

use hyperpage::api::{DATA_FILE_ENV, Error, ErrorKind, default_data_file, to_exit_code};
use hyperpage::notice::{Notice, notice_json};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome { exit_code });
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `hyperpage --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let data_file = cli.file.unwrap_or_else(default_data_file);
    let color_mode = cli.color;

    command_dispatch::dispatch_command(cli.command, data_file, color_mode)
        .map_err(add_not_found_hint)
        .map_err(add_io_hint)
        .map_err(add_corrupt_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "hyperpage",
    version,
    about = "Deletion-resilient hypermedia pagination over CSV files",
    long_about = None,
    before_help = r#"Rows are read once from a CSV file (header row excluded) and served as pages.

Mental model:
  - `page`/`hyper` slice the file by 1-based page number
  - `index` walks stable positions and skips removed rows
  - `serve` exposes the same operations over HTTP
"#,
    after_help = r#"EXAMPLES
  $ hyperpage hyper --page 3 --page-size 20
  $ hyperpage index --index 10 --page-size 5 --delete 11 --delete 12
  $ hyperpage --file students.csv group --by field --list firstname
  $ hyperpage serve --bind 127.0.0.1:9710

NOTES
  - Default data file: Popular_Baby_Names.csv (override with HYPERPAGE_FILE or --file)"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "CSV data file (default: $HYPERPAGE_FILE or Popular_Baby_Names.csv)",
        value_hint = ValueHint::FilePath
    )]
    file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Print the [start, end) positions covered by a page")]
    Range {
        #[arg(allow_negative_numbers = true, help = "Page number (1-based)")]
        page: i64,
        #[arg(allow_negative_numbers = true, help = "Rows per page")]
        page_size: i64,
    },
    #[command(about = "Print the rows of one page")]
    Page {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true, help = "Page number (1-based)")]
        page: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true, help = "Rows per page")]
        page_size: i64,
    },
    #[command(
        about = "Print one page with hypermedia metadata",
        after_help = r#"OUTPUT
  {"page_size":10,"page":2,"data":[...],"next_page":3,"prev_page":1,"total_pages":101}"#
    )]
    Hyper {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true, help = "Page number (1-based)")]
        page: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true, help = "Rows per page")]
        page_size: i64,
    },
    #[command(
        about = "Print a deletion-resilient page starting at a stable position",
        long_about = r#"Walk stable row positions from --index, skipping removed positions.

Resume with the returned `next_index`. Positions listed with --delete are
removed before the walk, standing in for records deleted between requests."#,
        after_help = r#"EXAMPLES
  $ hyperpage index --index 3 --page-size 4
  $ hyperpage index --index 3 --page-size 4 --delete 4"#
    )]
    Index {
        #[arg(long, allow_negative_numbers = true, help = "Start position (default: 0)")]
        index: Option<i64>,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true, help = "Rows per page")]
        page_size: i64,
        #[arg(long = "delete", value_name = "POSITION", allow_negative_numbers = true, help = "Remove a position before paging (repeatable)")]
        delete: Vec<i64>,
    },
    #[command(about = "Walk every live row page by page, one JSON line per page")]
    Scan {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true, help = "Start position")]
        start: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true, help = "Rows per page")]
        page_size: i64,
        #[arg(long = "delete", value_name = "POSITION", allow_negative_numbers = true, help = "Remove a position before scanning (repeatable)")]
        delete: Vec<i64>,
    },
    #[command(about = "Group rows by one column and list another column per group")]
    Group {
        #[arg(long, help = "Column whose values form the groups")]
        by: String,
        #[arg(long, help = "Column whose values are listed in each group")]
        list: String,
    },
    #[command(about = "Show the data file, row count, and header")]
    Info,
    #[command(
        about = "Serve pages over HTTP",
        after_help = r#"ROUTES
  GET    /healthz
  GET    /v0/info
  GET    /v0/page?page=&page_size=
  GET    /v0/hyper?page=&page_size=
  GET    /v0/hyper_index?index=&page_size=
  DELETE /v0/rows/:position
  GET    /v0/groups?by=&list="#
    )]
    Serve {
        #[arg(long, default_value = "127.0.0.1:9710", help = "Bind address")]
        bind: String,
        #[arg(long, help = "Allow non-loopback binds")]
        allow_non_loopback: bool,
    },
    #[command(about = "Print version info")]
    Version,
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn parse_bind(bind: &str) -> Result<SocketAddr, Error> {
    bind.parse().map_err(|_| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid bind address")
            .with_hint("Use a host:port value like 127.0.0.1:9710.")
    })
}

fn add_not_found_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::NotFound || err.hint().is_some() || err.path().is_none() {
        return err;
    }
    err.with_hint(format!(
        "Data file not found. Pass --file or set {DATA_FILE_ENV}."
    ))
}

fn add_io_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Io || err.hint().is_some() {
        return err;
    }
    err.with_hint("I/O error. Check the path and file permissions.")
}

fn add_corrupt_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Corrupt || err.hint().is_some() {
        return err;
    }
    err.with_hint("The data file is not valid UTF-8 CSV. Check the encoding and quoting.")
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "Unexpected internal failure. Retry with RUST_BACKTRACE=1 and share command/context if it persists.",
    )
}

fn emit_version_output() {
    if io::stdout().is_terminal() {
        println!("hyperpage {}", env!("CARGO_PKG_VERSION"));
    } else {
        emit_json(json!({
            "name": "hyperpage",
            "version": env!("CARGO_PKG_VERSION"),
        }));
    }
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_json_line(value: &Value) {
    let json = serde_json::to_string(value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode output")
            .with_source(err)
    })
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn notice_time_now() -> String {
    use time::format_description::well_known::Rfc3339;
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| {
            time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()
        })
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_default()
}

fn emit_notice(notice: &Notice, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        let label = colorize_label("notice:", color_mode.use_color(is_tty), AnsiColor::Yellow);
        eprintln!("{label} {} (file: {})", notice.message, notice.file);
        return;
    }

    let json = serde_json::to_string(&notice_json(notice)).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::OutOfRange => "out of range".to_string(),
        ErrorKind::Corrupt => "corrupt data".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(position) = err.position() {
        inner.insert("position".to_string(), json!(position));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }
    json!({ "error": Value::Object(inner) })
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = vec![format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    )];

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(position) = err.position() {
        lines.push(format!(
            "{} {position}",
            colorize_label("position:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(cause) = error_causes(err).first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{Cli, error_json, parse_bind};
    use clap::CommandFactory;
    use hyperpage::api::{Error, ErrorKind};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bind_must_be_socket_addr() {
        assert!(parse_bind("127.0.0.1:9710").is_ok());
        assert_eq!(
            parse_bind("localhost").expect_err("bad bind").kind(),
            ErrorKind::Usage
        );
    }

    #[test]
    fn error_json_carries_position_and_hint() {
        let err = Error::new(ErrorKind::OutOfRange)
            .with_message("index out of range")
            .with_hint("Use an index in 0..3.")
            .with_position(7);
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "OutOfRange");
        assert_eq!(value["error"]["position"], 7);
        assert_eq!(value["error"]["hint"], "Use an index in 0..3.");
        assert!(value["error"].get("causes").is_none());
    }
}
