use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "emoframe", about = "Index an emotional speech corpus and frame its utterances")]
pub struct Cli {
    /// Config file (defaults to emoframe.toml or the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Corpus root containing the Session1..Session5 folders
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Sessions to index (comma-separated)
    #[arg(long, value_delimiter = ',', global = true)]
    pub sessions: Vec<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print utterance counts per emotion and session
    Summary,

    /// Write the utterance index as JSON
    Export {
        #[arg(short, long, default_value = "index.json")]
        output: PathBuf,
    },

    /// Load one utterance and print its labels and shape
    Show { index: usize },

    /// Load a batch of utterances and frame them
    Frames {
        /// First utterance of the batch
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Utterances per batch (defaults to the config value)
        #[arg(short, long)]
        batch_size: Option<usize>,
    },
}
