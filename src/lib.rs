//! Browsable, cross-linked reports over a topic model run: per-topic
//! top-document pages, per-document topic lookups, and the path
//! translations that keep every generated link resolvable on disk.

pub mod indices;
pub mod paths;
pub mod report;
