// cfgtree: flatten brace-nested configuration text into (id, parent, name, data) tuples

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cfgtree::parser::lexer::SliceSource;
use cfgtree::{convert, scan, Error, ScanOptions};

#[derive(clap::Parser)]
#[command(
    name = "cfgtree",
    version,
    about = "Parse brace-nested key/value text into (id, parent_id, name, data) tuples",
    after_help = "If no output file is specified, output goes to standard output."
)]
struct Cli {
    /// Source file to parse
    input: PathBuf,

    /// Write tuples here instead of standard output
    output: Option<PathBuf>,

    /// Treat `//` and `/* */` as comments
    #[arg(short = 'c', long)]
    strip_comments: bool,

    /// Print the scanned tokens instead of the tuples
    #[arg(long)]
    tokens: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let source = fs::read(&cli.input).map_err(|source| Error::Io {
        path: cli.input.clone(),
        source,
    })?;
    info!(path = %cli.input.display(), bytes = source.len(), "input read");

    let options = ScanOptions {
        strip_comments: cli.strip_comments,
    };

    if cli.tokens {
        let tokens = scan(SliceSource::new(&source), options)?;
        let mut out = open_output(cli.output.as_ref());
        for token in &tokens {
            writeln!(out, "{}", token).map_err(Error::Output)?;
        }
        return out.flush().map_err(Error::Output);
    }

    convert(&source, options, || open_output(cli.output.as_ref()))
}

/// Open the requested output file, falling back to stdout when it cannot be
/// created.
fn open_output(path: Option<&PathBuf>) -> Box<dyn Write> {
    if let Some(path) = path {
        match File::create(path) {
            Ok(file) => return Box::new(BufWriter::new(file)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open output file");
                eprintln!("No file specified or error occurred during opening {}", path.display());
                eprintln!("Output to standard output will be used instead.");
            }
        }
    }
    Box::new(io::stdout().lock())
}
