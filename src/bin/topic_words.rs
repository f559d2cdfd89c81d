use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use topdocs::indices::TopicWords;

/// Build the topic-to-words JSON index from the model's XML word export.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// XML word-weight export (topic elements wrapping word elements)
    word_export: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let words = TopicWords::read_export(&args.word_export)?;
    serde_json::to_writer(io::stdout().lock(), &words)?;
    Ok(())
}
