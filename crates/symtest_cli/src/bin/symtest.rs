//! symtest inspection tool

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "symtest")]
#[command(about = "Inspect recorded symtest test cases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every test case of a Test-Case file
    Inspect {
        /// Path to the Test-Case file
        file: PathBuf,
        /// One JSON object per test case
        #[arg(long)]
        json: bool,
    },
    /// Print an encoded assignment name
    EncodeName {
        /// Base variable name
        base: String,
        /// Kind letter
        #[arg(short, long, value_parser = ["i", "s"])]
        kind: Option<String>,
        /// Free-form hint
        #[arg(long)]
        hint: Option<String>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    symtest_cli::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file, json } => {
            let decoded = symtest_cli::inspect_file(&file, json, &mut io::stdout().lock())?;
            tracing::info!("Decoded {} test case(s) from {}", decoded, file.display());
            Ok(())
        }
        Commands::EncodeName { base, kind, hint } => {
            let name = symtest_cli::encode_name_command(&base, kind.as_deref(), hint.as_deref())?;
            println!("{}", name);
            Ok(())
        }
    }
}
