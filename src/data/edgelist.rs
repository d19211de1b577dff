//! Tab-separated edge list ingestion

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::PipelineError;

/// A single sender → receiver communication from the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEdge {
    /// Raw sender identifier as it appears in the file.
    pub sender: i64,

    /// Raw receiver identifier as it appears in the file.
    pub receiver: i64,
}

/// Outcome of ingesting one edge-list file.
#[derive(Debug, Clone)]
pub struct EdgeList {
    /// Valid edges in file order.
    pub edges: Vec<RawEdge>,

    /// Number of malformed data rows that were dropped.
    pub rejected_rows: usize,
}

/// Load an edge list from a tab-separated text file.
///
/// Lines starting with `#` are comments; blank lines are ignored. A data row
/// is valid iff it has exactly two tab-separated integer fields. Malformed
/// rows are dropped and counted, never fatal; a file with no valid rows at
/// all is an [`PipelineError::EmptyInput`] error.
pub fn load_edge_list(path: &Path) -> Result<EdgeList, PipelineError> {
    log::info!("Reading edge list file: {}", path.display());

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut edges = Vec::new();
    let mut rejected_rows = 0;

    for line in reader.lines() {
        let line = line?;
        let row = line.trim();

        if row.is_empty() || row.starts_with('#') {
            continue;
        }

        match parse_row(row) {
            Some(edge) => edges.push(edge),
            None => {
                rejected_rows += 1;
                log::debug!("Dropping malformed row: {row:?}");
            }
        }
    }

    if edges.is_empty() {
        return Err(PipelineError::EmptyInput(format!(
            "no valid rows in {}",
            path.display()
        )));
    }

    log::info!(
        "Parsed {} valid edges ({} rows rejected)",
        edges.len(),
        rejected_rows
    );

    Ok(EdgeList {
        edges,
        rejected_rows,
    })
}

/// Parse one data row: exactly two tab-separated integer fields.
fn parse_row(row: &str) -> Option<RawEdge> {
    let mut fields = row.split('\t');
    let sender = fields.next()?.trim().parse().ok()?;
    let receiver = fields.next()?.trim().parse().ok()?;

    if fields.next().is_some() {
        return None;
    }

    Some(RawEdge { sender, receiver })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "edgelist-{}-{}.tsv",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).expect("fixture write");
        path
    }

    #[test]
    fn parses_valid_rows_and_drops_malformed_ones() {
        let path = write_fixture("mixed", "1\t2\n2\t3\n#comment\n3\tbadval\n");
        let list = load_edge_list(&path).expect("load");

        assert_eq!(
            list.edges,
            vec![
                RawEdge { sender: 1, receiver: 2 },
                RawEdge { sender: 2, receiver: 3 },
            ]
        );
        assert_eq!(list.rejected_rows, 1);
    }

    #[test]
    fn skips_comments_and_blank_lines_without_counting_them() {
        let path = write_fixture("comments", "# header\n\n10\t20\n\n# trailer\n");
        let list = load_edge_list(&path).expect("load");

        assert_eq!(list.edges.len(), 1);
        assert_eq!(list.rejected_rows, 0);
    }

    #[test]
    fn rejects_rows_with_missing_or_extra_fields() {
        let path = write_fixture("fields", "1\n1\t2\t3\n4\t5\n");
        let list = load_edge_list(&path).expect("load");

        assert_eq!(list.edges, vec![RawEdge { sender: 4, receiver: 5 }]);
        assert_eq!(list.rejected_rows, 2);
    }

    #[test]
    fn accepts_negative_identifiers() {
        let path = write_fixture("negative", "-7\t12\n");
        let list = load_edge_list(&path).expect("load");

        assert_eq!(list.edges, vec![RawEdge { sender: -7, receiver: 12 }]);
    }

    #[test]
    fn empty_input_is_fatal() {
        let path = write_fixture("empty", "# only a comment\nnot\tnumeric\n");
        let err = load_edge_list(&path).expect_err("should fail");

        assert!(matches!(err, PipelineError::EmptyInput(_)));
    }
}
