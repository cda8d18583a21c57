use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use protodts_compiler::DtsError;

mod commands;

#[derive(Parser)]
#[command(name = "protodts")]
#[command(about = "Build self-contained protocol declaration files and diagnostic tables", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append every external declaration the protocol file depends on and
    /// write the finished declaration file
    BuildProtocol {
        /// Program snapshot (JSON) produced by the front end
        #[arg(short, long)]
        program: PathBuf,

        /// Name of the protocol file inside the snapshot (overrides the config)
        #[arg(short, long)]
        root: Option<String>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output `.d.ts` file (if omitted, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the extracted declarations and stubbed types as JSON
    Extract {
        /// Program snapshot (JSON) produced by the front end
        #[arg(short, long)]
        program: PathBuf,

        /// Name of the protocol file inside the snapshot (overrides the config)
        #[arg(short, long)]
        root: Option<String>,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate the diagnostic information map and message lookup next to
    /// a `diagnosticMessages.json` table
    Diagnostics {
        /// Input diagnostic table
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("protodts=info,protodts_compiler=info"),
        1 => EnvFilter::new("protodts=debug,protodts_compiler=debug"),
        _ => EnvFilter::new("protodts=trace,protodts_compiler=trace"),
    }
}

fn main() -> Result<(), DtsError> {
    let cli = Cli::parse();

    // Logs go to stderr so generated output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::BuildProtocol { program, root, config, output } => {
            let config = commands::load_config(config.as_deref(), root.as_deref())?;
            let text = commands::build_protocol_file(program, &config, output.as_deref())?;
            if let Some(text) = text {
                print!("{}", text);
            }
            Ok(())
        }

        Commands::Extract { program, root, config } => {
            let config = commands::load_config(config.as_deref(), root.as_deref())?;
            let json = commands::extract_to_json(program, &config)?;
            println!("{}", json);
            Ok(())
        }

        Commands::Diagnostics { input } => {
            let cwd = std::env::current_dir()?;
            commands::process_diagnostic_messages(input, &cwd)?;
            Ok(())
        }
    }
}
