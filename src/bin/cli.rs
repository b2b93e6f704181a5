use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{CommandFactory, Parser as ClapParser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use reqscript::{
    CopyGuard, DEFAULT_HOST, ParserConfig, TEMPLATE, format_curl, format_debug, format_json,
    format_line, parse_request_with_config,
};

/// reqscript CLI: parse a request script (`METHOD URI` plus JSON body).
///
/// Reads a script from a file, --raw string, the bundled --template, or
/// stdin and prints a structured rendition in the chosen format. Nothing is
/// sent over the network.
///
/// Escape sequences (\r, \n, \t, \\) in the --raw value are interpreted so
/// you can pass a multi-line script as a single shell argument.
#[derive(ClapParser)]
#[command(name = "reqscript-cli", version, about, long_about = None)]
struct Cli {
    /// Path to a file containing a request script.
    /// Reads from stdin when neither FILE, --raw nor --template is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Raw script string (escape sequences \r \n \t \\ are expanded).
    #[arg(long, conflicts_with = "file")]
    raw: Option<String>,

    /// Use the bundled sample script as input.
    #[arg(long, conflicts_with_all = ["file", "raw"])]
    template: bool,

    /// Output format.
    #[arg(short, long, default_value = "json", value_enum)]
    format: OutputFormat,

    /// Pretty-print JSON output (ignored for other formats).
    #[arg(short, long)]
    pretty: bool,

    /// Target host (`host[:port]`) used to build the URL.
    #[arg(long, env = "REQSCRIPT_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Milliseconds to wait for stdin before giving up.
    #[arg(long, env = "REQSCRIPT_TIMEOUT_MS", default_value = "100")]
    timeout_ms: u64,

    /// Maximum allowed script size in bytes.
    #[arg(long, default_value = "10485760")]
    max_script_size: usize,

    /// Echo the script read from stdin to stderr.
    #[arg(long)]
    echo: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Human-readable debug output
    Debug,
    /// Method and URL on one line
    Line,
    /// Equivalent curl command
    Curl,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let from_stdin = cli.file.is_none() && cli.raw.is_none() && !cli.template;

    // When no input source is provided and stdin is a terminal (not piped),
    // show help instead of waiting on it.
    if from_stdin && io::stdin().is_terminal() {
        Cli::command().print_help().ok();
        println!();
        process::exit(0);
    }

    let config = ParserConfig {
        host: cli.host.clone(),
        max_script_size: cli.max_script_size,
        read_timeout: Duration::from_millis(cli.timeout_ms),
    };

    let data = match read_input(&cli, &config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(1);
        }
    };

    let request = match parse_request_with_config(&data[..], config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Parse error: {e}");
            process::exit(2);
        }
    };

    if let Err(e) = request.validate() {
        eprintln!("Invalid request: {e}");
        process::exit(3);
    }

    if let Err(e) = request.json() {
        eprintln!("Invalid body: {e}");
        process::exit(4);
    }

    let output = match cli.format {
        OutputFormat::Json => format_json(&request, cli.pretty),
        OutputFormat::Debug => format_debug(&request),
        OutputFormat::Line => format_line(&request),
        OutputFormat::Curl => format_curl(&request),
    };

    print!("{output}");
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read the script bytes from --raw, --template, a file, or stdin.
///
/// Stdin goes through a [`CopyGuard`] so an idle pipe fails fast instead of
/// hanging the tool.
fn read_input(cli: &Cli, config: &ParserConfig) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if let Some(raw) = &cli.raw {
        return Ok(unescape(raw).into_bytes());
    }
    if cli.template {
        return Ok(TEMPLATE.as_bytes().to_vec());
    }
    if let Some(path) = &cli.file {
        debug!(path = %path.display(), "reading script file");
        return Ok(std::fs::read(path)?);
    }

    let guard = CopyGuard::from_config(config);
    let mut stderr = io::stderr();
    let mut discard = io::sink();
    let sink: &mut dyn Write = if cli.echo { &mut stderr } else { &mut discard };
    Ok(guard.copy(io::stdin(), sink)?)
}

/// Expand C-style escape sequences (`\r`, `\n`, `\t`, `\\`) in a string.
///
/// Any other `\X` sequence is kept as-is (both the backslash and `X`).
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('r') => out.push('\r'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}
