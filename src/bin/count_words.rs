use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use topdocs::indices;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <path_mapping_table>  (txt paths on stdin)", args[0]);
        eprintln!("Example: find txt -name '*.txt' | count_words txt-pdf.tsv");
        std::process::exit(1);
    }

    // the txt paths arriving on stdin have not been normalized, so the
    // mapping keys must stay byte-for-byte as read
    let txt_pdf = indices::read_path_mappings(Path::new(&args[1]))?;

    println!("word count,file");

    for line in io::stdin().lock().lines() {
        let txt_path = line?;
        let file = File::open(&txt_path).map_err(|e| format!("{txt_path}: {e}"))?;
        let mut count = 0usize;
        for text in BufReader::new(file).lines() {
            count += text?.split_whitespace().count();
        }
        let pdf_path = txt_pdf
            .get(&txt_path)
            .ok_or_else(|| format!("no artifact path mapped for {txt_path}"))?;
        println!("{},{}", count, csv_field(pdf_path));
    }

    Ok(())
}

// quote a field only when a delimiter, quote, or newline forces it
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
