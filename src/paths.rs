//! Translations between the three names a document goes by: the model's
//! URI-style document name, its plain-text source path, and the published
//! PDF it was extracted from.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// The model emits document names as file: URIs run through java.net.URI,
// which escapes exactly these characters. '%' comes first so existing
// percent signs are escaped before any escape sequences are introduced.
const ENCODINGS: [(&str, &str); 14] = [
    ("%", "%25"),
    ("\"", "%22"),
    ("#", "%23"),
    ("<", "%3C"),
    (">", "%3E"),
    ("?", "%3F"),
    ("[", "%5B"),
    ("\\", "%5C"),
    ("]", "%5D"),
    ("^", "%5E"),
    ("`", "%60"),
    ("{", "%7B"),
    ("|", "%7C"),
    ("}", "%7D"),
];

/// Reproduce the model's idiosyncratic URI escaping.
pub fn escape(s: &str) -> String {
    let mut escaped = s.to_string();
    for (character, encoded) in ENCODINGS {
        escaped = escaped.replace(character, encoded);
    }
    escaped
}

/// Standard percent-decoding; the left inverse of [`escape`].
pub fn unescape(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

// Everything a URL path segment may carry unescaped: alphanumerics plus
// the characters urllib's quote() leaves alone by default.
const URL_UNSAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Percent-encode a string for use in a URL path or fragment.
pub fn quote(s: &str) -> String {
    utf8_percent_encode(s, URL_UNSAFE).to_string()
}

/// Remove `prefix` from the front of `s` if present, ignoring ASCII case.
pub fn strip_prefix(s: &str, prefix: &str) -> String {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => s[prefix.len()..].to_string(),
        _ => s.to_string(),
    }
}

/// Remove `suffix` from the end of `s` if present, ignoring ASCII case.
pub fn strip_suffix(s: &str, suffix: &str) -> String {
    if suffix.len() > s.len() {
        return s.to_string();
    }
    let cut = s.len() - suffix.len();
    match s.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(suffix) => s[..cut].to_string(),
        _ => s.to_string(),
    }
}

pub fn strip_fixes(s: &str, prefix: &str, suffix: &str) -> String {
    strip_suffix(&strip_prefix(s, prefix), suffix)
}

// convert a relative pdf path to a relative txt path
pub fn txt_path_from_pdf(pdf_path: &str) -> String {
    let path = strip_fixes(pdf_path, "pdf/", ".pdf");
    format!("txt/{}.txt", path.replace(' ', "_"))
}

/// Document-name translations rooted at the corpus directory the model ran
/// in. The model embeds that absolute directory in every document name, so
/// the same root must be used to recover relative paths from them.
#[derive(Debug, Clone)]
pub struct DocPaths {
    root: String,
}

impl DocPaths {
    pub fn new(root: impl Into<String>) -> DocPaths {
        DocPaths { root: root.into() }
    }

    /// Root the translations at the process working directory, which is
    /// where the reports are generated from.
    pub fn from_current_dir() -> std::io::Result<DocPaths> {
        Ok(DocPaths::new(std::env::current_dir()?.display().to_string()))
    }

    // file:{root}/txt/a.txt -> txt/a.txt
    pub fn txt_path(&self, doc_name: &str) -> String {
        strip_prefix(&unescape(doc_name), &format!("file:{}/", self.root))
    }

    /// Fragment identifier for a document's block on a topic page. The
    /// name is left in its escaped form; callers URL-escape the result.
    pub fn fragment_id(&self, doc_name: &str) -> String {
        strip_fixes(doc_name, &format!("file:{}/txt/", self.root), ".txt")
    }

    // txt/a.txt -> file:{root}/txt/a.txt, escaped the way the model does it
    pub fn doc_name_from_txt(&self, txt_path: &str) -> String {
        format!("file:{}", escape(&format!("{}/{}", self.root, txt_path)))
    }

    pub fn doc_name_from_pdf(&self, pdf_path: &str) -> String {
        self.doc_name_from_txt(&txt_path_from_pdf(pdf_path))
    }
}
