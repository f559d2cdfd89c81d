//! Static report pages: one page of ranked documents per topic, plus an
//! index page linking them together.

use std::collections::HashMap;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::indices::{DocTopics, TopicAssignment, TopicGroup, TopicWords};
use crate::paths::{quote, strip_fixes, DocPaths};

const STYLE: &str = "<style>
.link {
  display: inline-block;
  padding-left: 1em;
}
.pt { padding-top: 1em }
.pw { padding: 0 0.25em }
.mb { margin-bottom: 1em }
.nav {
  display: flex;
  width: 300px;
  justify-content: space-between;
  align-items: center;
}
.spacer { height: 1000px }
.hidden { visibility: hidden }
.words {
  list-style: none;
  padding: 0;
}
.words li { display: inline }
.words li::after { content: \", \" }
.words li:last-child::after { content: \"\" }
h3 {
  display: inline-block;
  margin: 0;
  text-align: center;
}
a { text-decoration: none; }
</style>";

fn header(n_topics: u32, docs: usize, title: &str) -> String {
    format!(
        "<!doctype html>\n\
         <head>\n\
         <meta charset=utf-8>\n\
         <title>{title}</title>\n\
         {STYLE}\n\
         <body>\n\
         <div>\n\
         <a href=\"/{n_topics}-topics.html\">topic visualization and diagnostics</a>\n\
         </div>\n\
         <h1><a href=\"./\">{n_topics} topics</a></h1>\n\
         <h2>top {docs} documents per topic</h2>\n"
    )
}

/// White at 0, pure red at 1.
pub fn red(proportion: f64) -> String {
    let scale = (255.0 * proportion).round() as i64;
    format!("rgb(255,{},{})", 255 - scale, 255 - scale)
}

// Sequential navigation, with hidden placeholders at the ends so the
// heading stays centered. The heading's id anchors cross-topic links.
fn nav(topic_num: u32, n_topics: u32) -> String {
    let mut html = String::from("<div class=\"nav mb\">");
    if topic_num > 1 {
        html.push_str(&format!(
            "<a href=\"{}.html\">&lt; topic {}</a>",
            topic_num - 1,
            topic_num - 1
        ));
    } else {
        html.push_str("<span class=\"hidden\">&lt; topic x</span>");
    }
    html.push_str(&format!("<h3 id=\"{topic_num}\">topic {topic_num}</h3>"));
    if topic_num < n_topics {
        html.push_str(&format!(
            "<a href=\"{}.html\">topic {} &gt;</a>",
            topic_num + 1,
            topic_num + 1
        ));
    } else {
        html.push_str("<span class=\"hidden\">topic x &gt;</span>");
    }
    html.push_str("</div>");
    html
}

fn word_list(words: &[String]) -> String {
    let items: String = words.iter().map(|w| format!("<li>{w}</li>")).collect();
    format!("<ol class=\"words mb\">{items}</ol>")
}

fn viz_link(n_topics: u32, topic_num: u32) -> String {
    format!(
        "<div class=\"mb\">\
         <a target=\"_blank\" href=\"/viz/{n_topics}-topics/#topic={topic_num}&lambda=1&term=\">\
         open topic in visualization\
         </a>\
         </div>"
    )
}

/// A topic page being written. Exactly one is open at a time; finishing
/// writes the trailing spacer and flushes before the next page is created.
struct TopicPage {
    out: BufWriter<File>,
}

impl TopicPage {
    fn create(path: &Path) -> Result<TopicPage, Box<dyn Error>> {
        let file = File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
        Ok(TopicPage {
            out: BufWriter::new(file),
        })
    }

    fn write(&mut self, html: &str) -> std::io::Result<()> {
        self.out.write_all(html.as_bytes())
    }

    fn finish(mut self) -> std::io::Result<()> {
        self.write("<div class=\"spacer\"></div>")?;
        self.out.flush()
    }
}

/// Everything the generator joins: both indices, the artifact mapping,
/// and the path translations that connect them.
pub struct Report<'a> {
    pub n_topics: u32,
    pub docs: usize,
    pub doc_topics: &'a DocTopics,
    pub topic_words: &'a TopicWords,
    pub txt_pdf: &'a HashMap<String, String>,
    pub paths: &'a DocPaths,
}

impl Report<'_> {
    pub fn out_dir(&self) -> PathBuf {
        PathBuf::from(format!("topdocs/{}-topics", self.n_topics))
    }

    /// Write the index page and one page per topic group, in the table's
    /// ascending topic order.
    pub fn generate(&self, groups: &[TopicGroup]) -> Result<(), Box<dyn Error>> {
        let dir = self.out_dir();
        fs::create_dir_all(&dir).map_err(|e| format!("{}: {e}", dir.display()))?;
        self.write_index(&dir)?;
        for group in groups {
            let mut page = self.open_topic_page(&dir, group.topic_num)?;
            for assignment in group.assignments.iter().take(self.docs) {
                page.write(&self.doc_block(assignment)?)?;
            }
            page.finish()?;
        }
        Ok(())
    }

    fn write_index(&self, dir: &Path) -> Result<(), Box<dyn Error>> {
        let path = dir.join("index.html");
        let file = File::create(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        let mut out = BufWriter::new(file);
        out.write_all(header(self.n_topics, self.docs, "top documents per topic").as_bytes())?;
        out.write_all(b"topics:<div style=\"max-width: 600px\">")?;
        for topic_num in 1..=self.n_topics {
            writeln!(
                out,
                "<span class=\"link pt\"><a href=\"{topic_num}.html\">{topic_num}</a></span>"
            )?;
        }
        out.write_all(b"</div>")?;
        out.flush()?;
        Ok(())
    }

    fn open_topic_page(&self, dir: &Path, topic_num: u32) -> Result<TopicPage, Box<dyn Error>> {
        let words = self
            .topic_words
            .get(topic_num)
            .ok_or_else(|| format!("no word list for topic {topic_num}"))?;
        let mut page = TopicPage::create(&dir.join(format!("{topic_num}.html")))?;
        page.write(&header(self.n_topics, self.docs, &format!("topic {topic_num}")))?;
        page.write(&nav(topic_num, self.n_topics))?;
        page.write(&word_list(words))?;
        page.write(&viz_link(self.n_topics, topic_num))?;
        Ok(page)
    }

    /// One document's block: color-coded proportion, the artifact link,
    /// and a color-coded cross-link for each other topic the document
    /// appears under.
    fn doc_block(&self, assignment: &TopicAssignment) -> Result<String, Box<dyn Error>> {
        let txt_path = self.paths.txt_path(&assignment.doc_name);
        let pdf_path = self.txt_pdf.get(&txt_path).ok_or_else(|| {
            format!(
                "no artifact path mapped for {txt_path} (document {})",
                assignment.doc_name
            )
        })?;
        let fragment = quote(&self.paths.fragment_id(&assignment.doc_name));
        let label = strip_fixes(pdf_path, "pdf/", ".pdf").replace('/', " / ");

        let mut html = format!(
            "<div id=\"{fragment}\">\
             <span style=\"background-color: {}\">{:.3}</span>\
             <span class=\"link\"><a target=\"_blank\" href=\"/{}\">{label}</a></span>",
            red(assignment.proportion),
            assignment.proportion,
            quote(pdf_path)
        );
        for &(p, t) in self.doc_topics.get(&assignment.doc_name).unwrap_or_default() {
            if t == assignment.topic_num {
                continue;
            }
            html.push_str(&format!(
                "<span class=\"link\">\
                 <a href=\"{t}.html#{t}\" class=\"pw\" style=\"background-color: {}\">{t}</a>\
                 </span>",
                red(p)
            ));
        }
        html.push_str("</div>");
        Ok(html)
    }
}
