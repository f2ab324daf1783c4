//! The replacement ledger: every accepted edit for one file.

use std::collections::BTreeMap;
use std::fmt;

use crate::span::Span;
use crate::stats::Statistics;

/// Replace the bytes in `span` with `text`. An empty span is an insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replacement {
    pub span: Span,
    pub text: String,
}

impl Replacement {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    pub fn insertion(at: u32, text: impl Into<String>) -> Self {
        Self::new(Span::empty(at), text)
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} => {:?}", self.span.start, self.span.end, self.text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("replacement {rejected} overlaps accepted replacement {existing}")]
    Conflict {
        existing: Replacement,
        rejected: Replacement,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    /// Byte-for-byte the same as an edit already in the ledger.
    Duplicate,
}

/// Non-overlapping edits, ordered by position.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    accepted: BTreeMap<(u32, u32), Replacement>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `rep` unless it overlaps an earlier edit.
    ///
    /// `line` is the expansion line the edit is attributed to. A rejected
    /// edit leaves both the ledger and `stats` untouched.
    pub fn submit(
        &mut self,
        rep: Replacement,
        line: u32,
        stats: &mut Statistics,
    ) -> Result<Submission, LedgerError> {
        if let Some(existing) = self.find_overlap(&rep) {
            if *existing == rep {
                return Ok(Submission::Duplicate);
            }
            return Err(LedgerError::Conflict {
                existing: existing.clone(),
                rejected: rep,
            });
        }
        stats.line_touched(line);
        stats.bytes_changed(rep.span.len());
        self.accepted.insert((rep.span.start, rep.span.end), rep);
        Ok(Submission::Accepted)
    }

    fn find_overlap(&self, rep: &Replacement) -> Option<&Replacement> {
        let span = rep.span;
        // Accepted spans are disjoint, so their ends grow with their starts:
        // walk back from the last candidate until one ends before `span`.
        for existing in self.accepted.range(..=(span.end, u32::MAX)).rev().map(|(_, r)| r) {
            if existing.span.end < span.start {
                break;
            }
            let same_point = span.is_empty() && existing.span == span;
            if same_point || existing.span.overlaps(span) || *existing == *rep {
                return Some(existing);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Replacement> {
        self.accepted.values()
    }

    pub fn into_replacements(self) -> Vec<Replacement> {
        self.accepted.into_values().collect()
    }
}

/// Apply non-overlapping `edits` to `source`.
///
/// Edits are applied in position order; an insertion sorts before a
/// replacement starting at the same offset.
pub fn apply_edits(source: &str, edits: &[Replacement]) -> String {
    let mut sorted: Vec<&Replacement> = edits.iter().collect();
    sorted.sort_by_key(|r| (r.span.start, r.span.end));
    let mut out = String::with_capacity(source.len());
    let mut pos = 0usize;
    for rep in sorted {
        let start = rep.span.start as usize;
        let end = rep.span.end as usize;
        if start < pos || end > source.len() {
            // Only reachable with edits that did not come from a ledger.
            continue;
        }
        out.push_str(&source[pos..start]);
        out.push_str(&rep.text);
        pos = end;
    }
    out.push_str(&source[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(ledger: &mut Ledger, start: u32, end: u32, text: &str) -> Result<Submission, LedgerError> {
        let mut stats = Statistics::new();
        ledger.submit(Replacement::new(Span::new(start, end), text), 1, &mut stats)
    }

    #[test]
    fn test_disjoint_edits_accepted() {
        let mut ledger = Ledger::new();
        assert_eq!(submit(&mut ledger, 10, 20, "a"), Ok(Submission::Accepted));
        assert_eq!(submit(&mut ledger, 0, 10, "b"), Ok(Submission::Accepted));
        assert_eq!(submit(&mut ledger, 20, 25, "c"), Ok(Submission::Accepted));
        let spans: Vec<_> = ledger.iter().map(|r| r.span.start).collect();
        assert_eq!(spans, vec![0, 10, 20]);
    }

    #[test]
    fn test_overlap_is_a_conflict() {
        let mut ledger = Ledger::new();
        submit(&mut ledger, 10, 20, "a").unwrap();
        let err = submit(&mut ledger, 15, 30, "b").unwrap_err();
        let LedgerError::Conflict { existing, rejected } = err;
        assert_eq!(existing.span, Span::new(10, 20));
        assert_eq!(rejected.span, Span::new(15, 30));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_enclosing_range_conflicts() {
        let mut ledger = Ledger::new();
        submit(&mut ledger, 12, 14, "a").unwrap();
        assert!(submit(&mut ledger, 0, 40, "b").is_err());
    }

    #[test]
    fn test_identical_resubmission_is_duplicate() {
        let mut ledger = Ledger::new();
        let mut stats = Statistics::new();
        let rep = Replacement::new(Span::new(3, 8), "hipFoo");
        assert_eq!(ledger.submit(rep.clone(), 1, &mut stats), Ok(Submission::Accepted));
        assert_eq!(ledger.submit(rep, 4, &mut stats), Ok(Submission::Duplicate));
        assert_eq!(stats.bytes_changed, 5);
        assert_eq!(stats.lines_touched(), 1);
    }

    #[test]
    fn test_insertions() {
        let mut ledger = Ledger::new();
        submit(&mut ledger, 0, 10, "").unwrap();
        assert!(submit(&mut ledger, 0, 0, "x").is_ok());
        assert!(submit(&mut ledger, 10, 10, "y").is_ok());
        assert!(submit(&mut ledger, 5, 5, "z").is_err());
        assert!(submit(&mut ledger, 0, 0, "other").is_err());
    }

    #[test]
    fn test_rejected_edit_leaves_stats_alone() {
        let mut ledger = Ledger::new();
        let mut stats = Statistics::new();
        ledger
            .submit(Replacement::new(Span::new(0, 4), "abcd"), 1, &mut stats)
            .unwrap();
        let before = stats.clone();
        assert!(ledger
            .submit(Replacement::new(Span::new(2, 6), "x"), 2, &mut stats)
            .is_err());
        assert_eq!(stats, before);
    }

    #[test]
    fn test_apply_edits() {
        let src = "cudaMalloc(&p, n);";
        let edits = vec![
            Replacement::new(Span::new(0, 10), "hipMalloc"),
            Replacement::insertion(0, "// x\n"),
        ];
        assert_eq!(apply_edits(src, &edits), "// x\nhipMalloc(&p, n);");
    }
}
