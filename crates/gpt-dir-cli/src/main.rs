use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use gpt_dir_cli::cli::{Repl, ReplOptions};
use gpt_dir_cli::context;
use gpt_dir_cli::tokens::{CostEstimator, PricingTable};
use gpt_dir_core::client::ChatClient;

/// Chat with a GPT model about the contents of local files
#[derive(Parser, Debug)]
#[command(name = "gpt-dir")]
#[command(version, about, long_about = None)]
struct Args {
    /// File or directory path containing input file(s)
    #[arg(short = 'd', long, value_name = "FILE OR DIR")]
    input_path: Option<PathBuf>,

    /// Files with these endings are included in directory traversal
    #[arg(short = 'e', long, num_args = 0.., value_name = "ENDING")]
    file_endings: Vec<String>,

    /// GPT model to use via the API, e.g.: 3.5-turbo-1106, 4, 4-32k, 4-1106-preview
    #[arg(short, long, default_value = "3.5-turbo-1106")]
    model: String,

    /// Sampling temperature to use, value between 0-2
    #[arg(long, default_value_t = 1.0)]
    temperature: f32,

    /// Maximum number of tokens to generate in the chat completion
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Set the behavior of the assistant
    #[arg(short, long, default_value = "You are a helpful assistant!")]
    system: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Pricing must resolve before any interaction; an unknown model is fatal.
    let pricing = PricingTable::builtin().get(&args.model)?;
    let estimator = CostEstimator::new(pricing)?;

    let context = match &args.input_path {
        Some(path) => {
            let text = context::load(path, &args.file_endings)?;
            if args.verbose {
                eprintln!(
                    "[verbose] Loaded {} bytes of context from {}",
                    text.len(),
                    path.display()
                );
            }
            Some(text)
        }
        None => None,
    };

    // A missing key only fails once a request is issued, not here.
    let client = ChatClient::new(std::env::var("OPENAI_API_KEY").ok());

    let repl = Repl::new(
        ReplOptions {
            model: args.model,
            temperature: args.temperature,
            max_tokens: args.max_tokens,
            system: args.system,
            context,
            verbose: args.verbose,
        },
        client,
        estimator,
    );
    repl.run()?;
    Ok(())
}
