use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::eval::DEFAULT_REQUIRED_PASS_RATE;

#[derive(Parser, Debug)]
#[command(
    name = "greenmatch",
    version,
    about = "Answer climate FAQ questions and search diary entries and memes"
)]
pub struct Cli {
    /// JSON Lines knowledge base; the built-in climate FAQ is used when absent.
    #[arg(long, global = true, env = "GREENMATCH_KB")]
    pub kb: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a question from the knowledge base.
    Ask {
        #[arg(long)]
        question: String,
    },
    /// Search diary entries and memes for a substring.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long)]
        diary: Option<PathBuf>,
        #[arg(long)]
        memes: Option<PathBuf>,
    },
    /// Print the normalized form of a text.
    Normalize {
        #[arg(long)]
        text: String,
    },
    /// Run question cases against the knowledge base.
    Eval {
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, default_value_t = DEFAULT_REQUIRED_PASS_RATE)]
        min_pass_rate: f32,
    },
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Ask { question } if question.trim().is_empty() => {
                Err("question must not be empty".to_string())
            }
            Command::Eval { min_pass_rate, .. } if !(0.0..=1.0).contains(min_pass_rate) => {
                Err("min-pass-rate must be within 0..=1".to_string())
            }
            _ => Ok(()),
        }
    }
}
