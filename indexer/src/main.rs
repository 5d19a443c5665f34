use anyhow::Result;
use clap::{Parser, Subcommand};
use lexis_core::persist::IndexPaths;
use lexis_indexer::{build_index, tokenize_corpus, write_tokenized};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Tokenize documents and build boolean/TF-IDF search artifacts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize raw .txt/.json/.jsonl documents into documents.txt, dict.txt and index.txt
    Tokenize {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
    },
    /// Build dictionary, inverted index, DF and TF-IDF files from tokenized documents
    Build {
        /// Tokenized documents file (defaults to <output>/documents.txt)
        #[arg(long)]
        documents: Option<PathBuf>,
        /// Existing dictionary file to take term ids from
        #[arg(long)]
        dictionary: Option<PathBuf>,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokenize { input, output } => {
            let corpus = tokenize_corpus(&input)?;
            write_tokenized(&corpus, &IndexPaths::new(output))
        }
        Commands::Build { documents, dictionary, output } => {
            let paths = IndexPaths::new(output);
            let documents = documents.unwrap_or_else(|| paths.documents());
            build_index(&documents, dictionary.as_deref(), &paths)?;
            Ok(())
        }
    }
}
