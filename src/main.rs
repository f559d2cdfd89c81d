use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use topdocs::indices::{self, DocTopics, TopicWords};
use topdocs::paths::DocPaths;
use topdocs::report::Report;

/// Generate the per-topic top-document report pages for one model run.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of topics in the model run
    n_topics: u32,
    /// Ranked assignment table (topic id, doc id, doc name, proportion)
    assignments: PathBuf,
    /// Document-to-topics index as JSON
    doc_topics: PathBuf,
    /// Topic-to-words index as JSON
    topic_words: PathBuf,
    /// Tab-separated txt-to-pdf path mapping table
    path_mappings: PathBuf,
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

    let paths = DocPaths::from_current_dir()?;
    let doc_topics = DocTopics::read(&args.doc_topics)?;
    let topic_words = TopicWords::read(&args.topic_words)?;
    let txt_pdf = indices::read_path_mappings(&args.path_mappings)?;
    let assignments = indices::read_assignments(&args.assignments)?;
    let groups = indices::group_by_topic(assignments);

    let report = Report {
        n_topics: args.n_topics,
        docs: indices::docs_per_topic(args.n_topics),
        doc_topics: &doc_topics,
        topic_words: &topic_words,
        txt_pdf: &txt_pdf,
        paths: &paths,
    };
    report.generate(&groups)?;

    println!(
        "Wrote {} topic pages to {}",
        groups.len(),
        report.out_dir().display()
    );
    Ok(())
}
