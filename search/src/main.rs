use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lexis_core::persist::IndexPaths;
use lexis_core::ArtifactPaths;
use lexis_search::Searcher;
use tracing_subscriber::{fmt, EnvFilter};

use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lexis-search")]
#[command(about = "Boolean and ranked search over a built index", long_about = None)]
struct Cli {
    #[command(flatten)]
    files: IndexFiles,
    /// Directory holding the raw documents named in index.txt, printed by `console`
    #[arg(long)]
    raw_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Either an index directory or explicit artifact paths overriding its defaults.
#[derive(Args)]
struct IndexFiles {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: PathBuf,
    #[arg(long)]
    dictionary: Option<PathBuf>,
    #[arg(long)]
    inverted_index: Option<PathBuf>,
    #[arg(long)]
    df: Option<PathBuf>,
    #[arg(long)]
    tf_idf: Option<PathBuf>,
    /// Document source index (`<doc_id>\t<source>` lines)
    #[arg(long)]
    sources: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a boolean query such as `кот^~собака|мышь`
    Boolean { query: String },
    /// Rank documents against free text
    Ranked {
        text: String,
        #[arg(long, default_value_t = 1)]
        top_k: usize,
    },
    /// Read free-text queries from stdin until `-1` or EOF
    Console,
}

fn open(files: IndexFiles, raw_dir: Option<PathBuf>) -> Result<Searcher> {
    let paths = IndexPaths::new(&files.index);
    let defaults = ArtifactPaths::from(&paths);
    let artifacts = ArtifactPaths {
        dictionary: files.dictionary.unwrap_or(defaults.dictionary),
        inverted_index: files.inverted_index.unwrap_or(defaults.inverted_index),
        df: files.df.unwrap_or(defaults.df),
        tfidf: files.tf_idf.unwrap_or(defaults.tfidf),
        meta: defaults.meta,
    };
    let sources = files.sources.unwrap_or_else(|| paths.doc_sources());
    Searcher::open(&artifacts, Some(&sources), raw_dir)
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    let searcher = open(cli.files, cli.raw_dir)?;
    let stdout = io::stdout();

    match cli.command {
        Commands::Boolean { query } => {
            let ids: Vec<String> = searcher.boolean(&query)?.iter().map(|d| d.to_string()).collect();
            println!("{}", ids.join(" "));
        }
        Commands::Ranked { text, top_k } => {
            let hits = searcher.ranked(&text, top_k.max(1));
            searcher.print_ranked(&mut stdout.lock(), &hits)?;
        }
        Commands::Console => searcher.console(io::stdin().lock(), stdout.lock())?,
    }
    Ok(())
}
