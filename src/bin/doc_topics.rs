use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use topdocs::indices::{self, DocTopics};

/// Build the document-to-topics JSON index from a ranked assignment table.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of topics in the model run
    n_topics: u32,
    /// Ranked assignment table (topic id, doc id, doc name, proportion)
    assignments: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    if args.n_topics == 0 {
        return Err("the model must have at least one topic".into());
    }
    let assignments = indices::read_assignments(&args.assignments)?;
    let groups = indices::group_by_topic(assignments);
    let index = DocTopics::build(&groups, indices::docs_per_topic(args.n_topics));
    serde_json::to_writer(io::stdout().lock(), &index)?;
    Ok(())
}
