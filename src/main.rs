//! CLI entry point for burrow

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use burrow::{
    Algorithm, AsyncWalked, Delivery, EntrySink, Execution, JsonFormatter, OutputConfig,
    OutputType, PlainFormatter, Summary, WalkItem, WalkRequest, Walked, Walker,
    walk::DEFAULT_STREAM_CAPACITY,
};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(about = "List everything below a directory, depth-first or breadth-first")]
#[command(version)]
struct Args {
    /// Directory to walk
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Visiting order
    #[arg(short, long, value_enum, default_value = "depth-first")]
    algorithm: Algorithm,

    /// Report entry records with their type instead of bare paths
    #[arg(short, long)]
    types: bool,

    /// Print entries as they are found instead of after the walk finishes
    #[arg(long)]
    stream: bool,

    /// Run the walk on a background runtime
    #[arg(long = "async")]
    run_async: bool,

    /// Output in JSON format (an array, or one value per line with --stream)
    #[arg(long)]
    json: bool,

    /// Separate paths with NUL bytes
    #[arg(short = '0', long = "null", conflicts_with = "delimiter")]
    null: bool,

    /// Separator written after each path (understands \n, \t, \0)
    #[arg(short, long, default_value = "\\n")]
    delimiter: String,

    /// Entries buffered between a background walk and the printer
    #[arg(long, value_name = "N", default_value_t = DEFAULT_STREAM_CAPACITY)]
    capacity: usize,

    /// Print a count of directories, files and other entries at the end
    #[arg(long)]
    summary: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log each directory as it is listed
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn request(&self) -> WalkRequest {
        WalkRequest {
            root: self.path.clone(),
            algorithm: self.algorithm,
            output_type: if self.types {
                OutputType::Entries
            } else {
                OutputType::Paths
            },
            delivery: if self.stream {
                Delivery::Streamed
            } else {
                Delivery::Materialized
            },
            execution: if self.run_async {
                Execution::Asynchronous
            } else {
                Execution::Synchronous
            },
            stream_capacity: self.capacity,
        }
    }

    fn sink(&self) -> Box<dyn EntrySink> {
        if self.json {
            return Box::new(JsonFormatter::stdout(self.stream));
        }
        let delimiter = if self.null {
            vec![0]
        } else {
            parse_delimiter(&self.delimiter)
        };
        Box::new(PlainFormatter::stdout(OutputConfig {
            use_color: should_use_color(self.color),
            delimiter,
            show_types: self.types,
            summary: self.summary,
        }))
    }
}

/// Expand the escapes accepted by `--delimiter`.
fn parse_delimiter(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('0') => out.push(0),
            Some('\\') => out.push(b'\\'),
            Some(other) => {
                out.push(b'\\');
                let mut buf = [0u8; 4];
                out.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => out.push(b'\\'),
        }
    }
    out
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("burrow: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let request = args.request();
    debug!(?request, "starting walk");

    let mut sink = args.sink();
    let mut printer = Printer {
        sink: sink.as_mut(),
        summary: Summary::default(),
    };

    match request.execution {
        Execution::Synchronous => run_sync(request, &mut printer)?,
        Execution::Asynchronous => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(run_async(request, &mut printer))?;
        }
    }

    printer.finish()
}

struct Printer<'a> {
    sink: &'a mut dyn EntrySink,
    summary: Summary,
}

impl Printer<'_> {
    fn print(&mut self, item: &WalkItem) -> Result<()> {
        self.summary.record(item);
        self.sink
            .write_item(item)
            .context("Failed to write output")
    }

    fn finish(&mut self) -> Result<()> {
        self.sink
            .finish(&self.summary)
            .context("Failed to write output")
    }
}

fn run_sync(request: WalkRequest, printer: &mut Printer<'_>) -> Result<()> {
    match Walker::new(request).walk()? {
        Walked::Listing(listing) => {
            for item in listing.into_items() {
                printer.print(&item)?;
            }
        }
        Walked::Stream(stream) => {
            for item in stream {
                printer.print(&item?)?;
            }
        }
    }
    Ok(())
}

async fn run_async(request: WalkRequest, printer: &mut Printer<'_>) -> Result<()> {
    match Walker::new(request).walk_async().await? {
        AsyncWalked::Listing(listing) => {
            for item in listing.into_items() {
                printer.print(&item)?;
            }
        }
        AsyncWalked::Stream(mut stream) => {
            while let Some(item) = stream.recv().await {
                printer.print(&item?)?;
            }
        }
    }
    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("BURROW_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("burrow=debug,warn")
        } else {
            EnvFilter::new("burrow=info,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}
