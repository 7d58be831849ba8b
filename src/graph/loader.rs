//! Whitespace-delimited input readers
//!
//! Both inputs are two-column integer tables, one record per line. Blank
//! lines and lines starting with `#` are skipped.

use super::store::{GraphError, GraphResult};
use super::types::{EmailEdge, GroupLabel, NodeId};
use indexmap::IndexMap;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::debug;

/// Read `node group` records. Group indices are 0-based in the file and
/// become 1-based `GroupLabel`s.
pub fn load_labels<R: BufRead>(
    reader: R,
    file: &str,
    group_count: u16,
) -> GraphResult<IndexMap<NodeId, GroupLabel>> {
    let mut labels = IndexMap::new();
    let mut first_seen: IndexMap<NodeId, usize> = IndexMap::new();

    for_each_record(reader, file, |line, node, index| {
        let label = GroupLabel::from_index(index, group_count).ok_or_else(|| {
            GraphError::LabelOutOfRange {
                file: file.to_string(),
                line,
                index,
                group_count,
            }
        })?;

        if let Some(&first_line) = first_seen.get(&node) {
            return Err(GraphError::DuplicateNode {
                file: file.to_string(),
                line,
                node,
                first_line,
            });
        }

        first_seen.insert(node, line);
        labels.insert(node, label);
        Ok(())
    })?;

    debug!("Read {} node labels from {}", labels.len(), file);
    Ok(labels)
}

/// Read `from to` records, keeping duplicates and self-loops.
pub fn load_edges<R: BufRead>(reader: R, file: &str) -> GraphResult<Vec<EmailEdge>> {
    let mut edges = Vec::new();

    for_each_record(reader, file, |line, from, to| {
        edges.push(EmailEdge { from, to, line });
        Ok(())
    })?;

    debug!("Read {} edges from {}", edges.len(), file);
    Ok(edges)
}

fn for_each_record<R, F>(reader: R, file: &str, mut handle: F) -> GraphResult<()>
where
    R: BufRead,
    F: FnMut(usize, u64, u64) -> GraphResult<()>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| GraphError::Io {
            path: PathBuf::from(file),
            source,
        })?;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 2 {
            return Err(parse_error(
                file,
                line_no,
                format!("expected 2 columns, found {}", fields.len()),
            ));
        }

        let first = parse_field(file, line_no, fields[0])?;
        let second = parse_field(file, line_no, fields[1])?;
        handle(line_no, first, second)?;
    }
    Ok(())
}

fn parse_field(file: &str, line: usize, field: &str) -> GraphResult<u64> {
    field
        .parse::<u64>()
        .map_err(|e| parse_error(file, line, format!("invalid integer '{}': {}", field, e)))
}

fn parse_error(file: &str, line: usize, message: String) -> GraphError {
    GraphError::Parse {
        file: file.to_string(),
        line,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_load_labels_shifts_groups() {
        let input = "# node group\n0 1\n1 1\n\n2 21\n";
        let labels = load_labels(Cursor::new(input), "labels.txt", 42).unwrap();

        assert_eq!(labels.len(), 3);
        assert_eq!(labels[&0], GroupLabel::new(2));
        assert_eq!(labels[&2], GroupLabel::new(22));
        // Declaration order is kept
        assert_eq!(labels.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_load_labels_rejects_out_of_range() {
        let err = load_labels(Cursor::new("0 0\n1 42\n"), "labels.txt", 42).unwrap_err();
        assert!(matches!(
            err,
            GraphError::LabelOutOfRange { line: 2, index: 42, .. }
        ));
    }

    #[test]
    fn test_load_labels_rejects_duplicates() {
        let err = load_labels(Cursor::new("5 0\n6 0\n5 3\n"), "labels.txt", 42).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DuplicateNode { node: 5, line: 3, first_line: 1, .. }
        ));
    }

    #[test]
    fn test_load_edges_keeps_duplicates() {
        let edges = load_edges(Cursor::new("0 1\n0 1\n\t2   2 \n"), "edges.txt").unwrap();

        assert_eq!(edges.len(), 3);
        assert_eq!(edges[1], EmailEdge { from: 0, to: 1, line: 2 });
        assert_eq!(edges[2], EmailEdge { from: 2, to: 2, line: 3 });
    }

    #[test]
    fn test_malformed_lines() {
        let err = load_edges(Cursor::new("0 1\n0 1 2\n"), "edges.txt").unwrap_err();
        assert_eq!(err.to_string(), "edges.txt:2: expected 2 columns, found 3");

        let err = load_edges(Cursor::new("0 x\n"), "edges.txt").unwrap_err();
        assert!(matches!(err, GraphError::Parse { line: 1, .. }));

        let err = load_edges(Cursor::new("-1 2\n"), "edges.txt").unwrap_err();
        assert!(matches!(err, GraphError::Parse { .. }));
    }
}
