use access_log_analyzer::config::{Config, DEFAULT_FAILURE_THRESHOLD, DEFAULT_OUTPUT_FILE};
use access_log_analyzer::logging;
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Summarizes a web server access log and flags brute-force login attempts
#[derive(Parser, Debug)]
#[command(
    name = "access_log_analyzer",
    author,
    version,
    about = "Counts requests per IP, finds the most accessed endpoint and flags brute-force logins"
)]
struct Args {
    /// Path to the log file to analyze (prompted for when omitted)
    #[arg(value_name = "LOG_FILE")]
    file: Option<PathBuf>,

    /// Failed-login threshold; IPs with more failures than this are flagged
    #[arg(short = 't', long = "threshold", default_value_t = DEFAULT_FAILURE_THRESHOLD, value_name = "COUNT")]
    threshold: usize,

    /// Path of the CSV report
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_FILE, value_name = "OUTPUT_FILE")]
    output: PathBuf,

    /// List every endpoint in the CSV report, not just the most accessed one
    #[arg(short = 'a', long = "all-endpoints")]
    all_endpoints: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Increase diagnostic output on stderr (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    let log_file = match args.file {
        Some(path) => path,
        None => match prompt_for_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("{} could not read the log file path: {}", "error:".red().bold(), e);
                std::process::exit(1);
            }
        },
    };

    let config = Config {
        log_file,
        output: args.output,
        failure_threshold: args.threshold,
        all_endpoints: args.all_endpoints,
    };

    if let Err(e) = access_log_analyzer::run(&config, &mut io::stdout().lock()) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }

    println!(
        "{} CSV report saved to '{}'",
        "✓".green(),
        config.output.display()
    );
}

fn prompt_for_path() -> io::Result<PathBuf> {
    print!("Enter the path to the log file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim_end_matches(['\r', '\n'])))
}
