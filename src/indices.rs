//! Indices built from the model's output tables: which topics each
//! document belongs to, and which words describe each topic.

use std::collections::HashMap;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

// Ranked listings stay readable at around this many documents total, so
// each topic keeps its leading floor(5000 / n_topics) assignments.
pub const TARGET_TOTAL: u32 = 5000;

pub fn docs_per_topic(n_topics: u32) -> usize {
    (TARGET_TOTAL / n_topics) as usize
}

/// One row of the model's ranked assignment table. `topic_num` is
/// one-based; the table's zero-based topic ids are converted on parse.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicAssignment {
    pub topic_num: u32,
    pub doc_name: String,
    pub proportion: f64,
}

/// A contiguous run of assignment rows for one topic, in the table's
/// proportion-descending order.
#[derive(Debug, PartialEq)]
pub struct TopicGroup {
    pub topic_num: u32,
    pub assignments: Vec<TopicAssignment>,
}

/// Parse the assignment table: one header line, then whitespace-delimited
/// rows of `topic_id doc_id doc_name proportion ...`. Malformed rows are
/// fatal; dropping them would silently corrupt the ranking.
pub fn parse_assignments(input: impl BufRead) -> Result<Vec<TopicAssignment>, Box<dyn Error>> {
    let mut lines = input.lines();
    lines.next().transpose()?;

    let mut assignments = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        let line_num = i + 2;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(format!(
                "line {line_num}: expected at least 4 columns, got {}",
                fields.len()
            )
            .into());
        }
        let topic_id: u32 = fields[0]
            .parse()
            .map_err(|_| format!("line {line_num}: bad topic id {:?}", fields[0]))?;
        let proportion: f64 = fields[3]
            .parse()
            .map_err(|_| format!("line {line_num}: bad proportion {:?}", fields[3]))?;
        assignments.push(TopicAssignment {
            topic_num: topic_id + 1,
            doc_name: fields[2].to_string(),
            proportion,
        });
    }
    Ok(assignments)
}

pub fn read_assignments(path: &Path) -> Result<Vec<TopicAssignment>, Box<dyn Error>> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    parse_assignments(BufReader::new(file))
}

/// Split assignments into contiguous topic groups. A change in topic
/// number between consecutive rows starts a new group; the rows within a
/// group keep their table order.
pub fn group_by_topic(assignments: Vec<TopicAssignment>) -> Vec<TopicGroup> {
    let mut groups: Vec<TopicGroup> = Vec::new();
    for assignment in assignments {
        match groups.last_mut() {
            Some(group) if group.topic_num == assignment.topic_num => {
                group.assignments.push(assignment);
            }
            _ => groups.push(TopicGroup {
                topic_num: assignment.topic_num,
                assignments: vec![assignment],
            }),
        }
    }
    groups
}

/// Document name to ranked topic memberships, one `(proportion, topic)`
/// entry per topic where the document made that topic's retained subset.
/// Documents retained nowhere have no entry at all, which is how the
/// locator tells "unranked" apart from "unknown".
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocTopics(HashMap<String, Vec<(f64, u32)>>);

impl DocTopics {
    pub fn build(groups: &[TopicGroup], cap: usize) -> DocTopics {
        let mut index: HashMap<String, Vec<(f64, u32)>> = HashMap::new();
        for group in groups {
            for a in group.assignments.iter().take(cap) {
                index
                    .entry(a.doc_name.clone())
                    .or_default()
                    .push((a.proportion, a.topic_num));
            }
        }
        // stable, so equal proportions keep their topic-ascending order
        for memberships in index.values_mut() {
            memberships.sort_by(|a, b| b.0.total_cmp(&a.0));
        }
        DocTopics(index)
    }

    pub fn get(&self, doc_name: &str) -> Option<&[(f64, u32)]> {
        self.0.get(doc_name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn read(path: &Path) -> Result<DocTopics, Box<dyn Error>> {
        let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Topic number to its descriptive words, most probable first. Emission
/// order from the model is meaningful and kept verbatim.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicWords(HashMap<u32, Vec<String>>);

impl TopicWords {
    /// Stream the model's XML word-weight export: `topic` elements carry a
    /// zero-based id attribute, each `word` element's text is one token.
    pub fn parse_export(xml: &str) -> Result<TopicWords, Box<dyn Error>> {
        let mut reader = Reader::from_str(xml);
        let mut topics: HashMap<u32, Vec<String>> = HashMap::new();
        let mut topic_num = 0;
        let mut in_word = false;
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"topic" => topic_num = topic_id(e)? + 1,
                    b"word" => in_word = true,
                    _ => {}
                },
                Ok(Event::Text(ref e)) if in_word => {
                    topics
                        .entry(topic_num)
                        .or_default()
                        .push(e.unescape()?.into_owned());
                    in_word = false;
                }
                Ok(Event::End(ref e)) if e.name().as_ref() == b"word" => in_word = false,
                Ok(Event::Eof) => break,
                Err(e) => return Err(format!("malformed word export: {e}").into()),
                _ => {}
            }
        }
        Ok(TopicWords(topics))
    }

    pub fn read_export(path: &Path) -> Result<TopicWords, Box<dyn Error>> {
        let xml = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
        TopicWords::parse_export(&xml)
    }

    pub fn get(&self, topic_num: u32) -> Option<&[String]> {
        self.0.get(&topic_num).map(Vec::as_slice)
    }

    pub fn read(path: &Path) -> Result<TopicWords, Box<dyn Error>> {
        let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

fn topic_id(e: &BytesStart) -> Result<u32, Box<dyn Error>> {
    let id = e
        .try_get_attribute("id")?
        .ok_or("topic element without an id attribute")?
        .unescape_value()?;
    id.parse()
        .map_err(|_| format!("bad topic id {id:?}").into())
}

/// Load the tab-separated txt-to-pdf mapping table. Keys must match the
/// paths recovered from document names byte for byte, so no normalization
/// is applied to either column.
pub fn read_path_mappings(path: &Path) -> Result<HashMap<String, String>, Box<dyn Error>> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    parse_path_mappings(BufReader::new(file))
}

pub fn parse_path_mappings(input: impl BufRead) -> Result<HashMap<String, String>, Box<dyn Error>> {
    let mut mappings = HashMap::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            return Err(format!("line {}: expected two tab-separated columns", i + 1).into());
        }
        mappings.insert(fields[0].to_string(), fields[1].to_string());
    }
    Ok(mappings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(topic_num: u32, doc_name: &str, proportion: f64) -> TopicAssignment {
        TopicAssignment {
            topic_num,
            doc_name: doc_name.to_string(),
            proportion,
        }
    }

    #[test]
    fn docs_per_topic_floors() {
        assert_eq!(docs_per_topic(1), 5000);
        assert_eq!(docs_per_topic(3), 1666);
        assert_eq!(docs_per_topic(7), 714);
    }

    #[test]
    fn parses_assignment_table_skipping_header() {
        let table = "#doc name topic proportion ...\n\
                     0 1 file:/corpus/txt/a.txt 0.9 1 0.05\n\
                     1 2 file:/corpus/txt/b.txt 0.4\n";
        let assignments = parse_assignments(table.as_bytes()).unwrap();
        assert_eq!(
            assignments,
            vec![
                assignment(1, "file:/corpus/txt/a.txt", 0.9),
                assignment(2, "file:/corpus/txt/b.txt", 0.4),
            ]
        );
    }

    #[test]
    fn rejects_short_rows() {
        let table = "#header\n0 1 file:/corpus/txt/a.txt\n";
        let err = parse_assignments(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn rejects_non_numeric_proportions() {
        let table = "#header\n0 1 file:/corpus/txt/a.txt high\n";
        let err = parse_assignments(table.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("bad proportion"));
    }

    #[test]
    fn groups_split_on_topic_change() {
        let groups = group_by_topic(vec![
            assignment(1, "a", 0.9),
            assignment(1, "b", 0.1),
            assignment(2, "a", 0.4),
            // a reappearing topic number starts a fresh group
            assignment(1, "c", 0.3),
        ]);
        let shapes: Vec<(u32, usize)> = groups
            .iter()
            .map(|g| (g.topic_num, g.assignments.len()))
            .collect();
        assert_eq!(shapes, vec![(1, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn build_caps_each_topic_group() {
        let groups = group_by_topic(vec![
            assignment(1, "a", 0.9),
            assignment(1, "b", 0.5),
            assignment(1, "c", 0.1),
        ]);
        let index = DocTopics::build(&groups, 2);
        assert_eq!(index.len(), 2);
        assert!(index.get("c").is_none());
    }

    #[test]
    fn multi_topic_documents_merge_into_one_ranked_entry() {
        let groups = group_by_topic(vec![
            assignment(1, "docA", 0.9),
            assignment(1, "docB", 0.1),
            assignment(2, "docA", 0.4),
        ]);
        let index = DocTopics::build(&groups, 2500);
        assert_eq!(index.get("docA"), Some(&[(0.9, 1), (0.4, 2)][..]));
        assert_eq!(index.get("docB"), Some(&[(0.1, 1)][..]));
    }

    #[test]
    fn memberships_sort_by_proportion_descending() {
        let groups = group_by_topic(vec![
            assignment(1, "a", 0.2),
            assignment(2, "a", 0.9),
            assignment(3, "a", 0.5),
        ]);
        let index = DocTopics::build(&groups, 10);
        assert_eq!(index.get("a"), Some(&[(0.9, 2), (0.5, 3), (0.2, 1)][..]));
    }

    #[test]
    fn equal_proportions_keep_topic_order() {
        let groups = group_by_topic(vec![
            assignment(1, "a", 0.5),
            assignment(2, "a", 0.5),
            assignment(3, "a", 0.5),
        ]);
        let index = DocTopics::build(&groups, 10);
        assert_eq!(index.get("a"), Some(&[(0.5, 1), (0.5, 2), (0.5, 3)][..]));
    }

    #[test]
    fn doc_topics_serialize_as_proportion_topic_pairs() {
        let groups = group_by_topic(vec![assignment(1, "docA", 0.9)]);
        let index = DocTopics::build(&groups, 10);
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json, serde_json::json!({ "docA": [[0.9, 1]] }));
    }

    #[test]
    fn parses_word_export_in_emission_order() {
        let xml = r#"<?xml version="1.0"?>
            <topics>
            <topic id="0" alpha="0.3">
            <word weight="0.5" count="10">budget</word>
            <word weight="0.2" count="4">minutes</word>
            <word weight="0.1" count="2">budget</word>
            </topic>
            <topic id="1" alpha="0.3">
            <word weight="0.4" count="8">zoning</word>
            </topic>
            </topics>"#;
        let words = TopicWords::parse_export(xml).unwrap();
        // zero-based ids become one-based topics; duplicates are kept
        assert_eq!(
            words.get(1),
            Some(&["budget".to_string(), "minutes".to_string(), "budget".to_string()][..])
        );
        assert_eq!(words.get(2), Some(&["zoning".to_string()][..]));
        assert_eq!(words.get(3), None);
    }

    #[test]
    fn word_export_topics_serialize_with_string_keys() {
        let xml = r#"<topics><topic id="0"><word>budget</word></topic></topics>"#;
        let words = TopicWords::parse_export(xml).unwrap();
        let json = serde_json::to_value(&words).unwrap();
        assert_eq!(json, serde_json::json!({ "1": ["budget"] }));
    }

    #[test]
    fn rejects_word_export_without_topic_id() {
        let xml = "<topics><topic><word>budget</word></topic></topics>";
        assert!(TopicWords::parse_export(xml).is_err());
    }

    #[test]
    fn path_mappings_keep_exact_keys() {
        let table = "txt/a b.txt\tpdf/a b.pdf\nfile:/corpus/txt/c.txt\tpdf/c.pdf\n";
        let mappings = parse_path_mappings(table.as_bytes()).unwrap();
        assert_eq!(mappings["txt/a b.txt"], "pdf/a b.pdf");
        assert_eq!(mappings["file:/corpus/txt/c.txt"], "pdf/c.pdf");
    }

    #[test]
    fn rejects_mapping_rows_without_a_tab() {
        let table = "txt/a.txt pdf/a.pdf\n";
        assert!(parse_path_mappings(table.as_bytes()).is_err());
    }
}
