use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use regex::Regex;

use topdocs::indices::DocTopics;
use topdocs::paths::{quote, DocPaths};

/// Find and open the topic pages that list a given document.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Document-to-topics index as JSON, under its {n}-topics directory
    doc_topics: PathBuf,
    /// Published artifact path, e.g. "pdf/board/Annual Report.pdf"
    pdf_path: String,
    /// Report server host
    host: String,
    /// Report server port
    port: u16,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    // the model name comes from the index's own directory
    let index_path = args.doc_topics.display().to_string();
    let model = Regex::new(r".*/(\d+-topics)/.*")
        .unwrap()
        .captures(&index_path)
        .and_then(|c| c.get(1))
        .ok_or_else(|| format!("no {{n}}-topics segment in {index_path}"))?
        .as_str()
        .to_string();

    let doc_topics = DocTopics::read(&args.doc_topics)?;
    let paths = DocPaths::from_current_dir()?;
    let doc_name = paths.doc_name_from_pdf(&args.pdf_path);

    let Some(memberships) = doc_topics.get(&doc_name) else {
        println!(
            "{} is not among the top documents for any topic in this model",
            args.pdf_path
        );
        return Ok(());
    };

    let fragment = quote(&paths.fragment_id(&doc_name));
    for &(_, topic_num) in memberships {
        let url = format!(
            "http://{}:{}/topdocs/{model}/{topic_num}.html#{fragment}",
            args.host, args.port
        );
        println!("{url}");
        // best effort: without a system opener the printed URL still works
        let _ = open::that(&url);
    }
    Ok(())
}
