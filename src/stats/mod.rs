//! Usage statistics: which CUDA names were seen, what changed, how much.
//!
//! One [`Statistics`] per file; batch runs fold them into a
//! [`SharedStatistics`], which only ever adds.

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::sync::Mutex;

use serde::Serialize;

use crate::rename::{ApiFamily, ConvKind, SupportTier};

/// Occurrences of one CUDA name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub kind: ConvKind,
    pub api: ApiFamily,
    pub support: SupportTier,
    pub unsupported: bool,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Keyed by the CUDA name (or a synthetic name for rule rewrites).
    pub counters: BTreeMap<String, Counter>,
    pub converted: u64,
    pub unsupported: u64,
    /// Length of the original text replaced by accepted edits.
    pub bytes_changed: u64,
    /// Distinct lines of the current file touched by an edit.
    pub touched_lines: BTreeSet<u32>,
    /// Touched-line counts of files already folded in by [`Statistics::merge`].
    pub merged_touched_lines: u64,
    pub total_bytes: u64,
    pub total_lines: u64,
    pub files_converted: u64,
    pub files_failed: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `name`.
    pub fn record(
        &mut self,
        name: &str,
        kind: ConvKind,
        api: ApiFamily,
        support: SupportTier,
        unsupported: bool,
    ) {
        let counter = self.counters.entry(name.to_string()).or_insert(Counter {
            kind,
            api,
            support,
            unsupported,
            count: 0,
        });
        counter.count += 1;
        if unsupported {
            self.unsupported += 1;
        } else {
            self.converted += 1;
        }
    }

    pub fn bytes_changed(&mut self, n: u32) {
        self.bytes_changed += u64::from(n);
    }

    pub fn line_touched(&mut self, line: u32) {
        self.touched_lines.insert(line);
    }

    pub fn lines_touched(&self) -> u64 {
        self.merged_touched_lines + self.touched_lines.len() as u64
    }

    /// Fold another accumulator into this one. Purely additive.
    pub fn merge(&mut self, other: &Statistics) {
        for (name, c) in &other.counters {
            self.counters
                .entry(name.clone())
                .and_modify(|mine| mine.count += c.count)
                .or_insert_with(|| c.clone());
        }
        self.converted += other.converted;
        self.unsupported += other.unsupported;
        self.bytes_changed += other.bytes_changed;
        self.merged_touched_lines += other.lines_touched();
        self.total_bytes += other.total_bytes;
        self.total_lines += other.total_lines;
        self.files_converted += other.files_converted;
        self.files_failed += other.files_failed;
    }

    /// Share of recognised references that were converted, in percent.
    pub fn conversion_percent(&self) -> f64 {
        let total = self.converted + self.unsupported;
        if total == 0 {
            return 100.0;
        }
        self.converted as f64 * 100.0 / total as f64
    }

    fn totals_by<K: Ord>(&self, key: impl Fn(&Counter) -> K) -> BTreeMap<K, u64> {
        let mut out = BTreeMap::new();
        for c in self.counters.values().filter(|c| !c.unsupported) {
            *out.entry(key(c)).or_insert(0) += c.count;
        }
        out
    }

    /// Human-readable report.
    pub fn render(&self, title: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[HIPIFY] statistics for {}:", title);
        let _ = writeln!(out, "  CONVERTED refs count: {}", self.converted);
        let _ = writeln!(out, "  UNCONVERTED refs count: {}", self.unsupported);
        let _ = writeln!(out, "  CONVERSION %: {:.1}", self.conversion_percent());
        let _ = writeln!(out, "  REPLACED bytes: {}", self.bytes_changed);
        let _ = writeln!(out, "  TOTAL bytes: {}", self.total_bytes);
        let _ = writeln!(out, "  CHANGED lines of code: {}", self.lines_touched());
        let _ = writeln!(out, "  TOTAL lines of code: {}", self.total_lines);
        if self.files_converted + self.files_failed > 1 || self.files_failed > 0 {
            let _ = writeln!(out, "  CONVERTED files: {}", self.files_converted);
            let _ = writeln!(out, "  FAILED files: {}", self.files_failed);
        }

        let by_kind = self.totals_by(|c| c.kind.name());
        if !by_kind.is_empty() {
            let _ = writeln!(out, "  CONVERTED refs by type:");
            for (kind, n) in by_kind {
                let _ = writeln!(out, "    {}: {}", kind, n);
            }
        }
        let by_api = self.totals_by(|c| c.api.name());
        if !by_api.is_empty() {
            let _ = writeln!(out, "  CONVERTED refs by API:");
            for (api, n) in by_api {
                let _ = writeln!(out, "    {}: {}", api, n);
            }
        }
        self.render_names(&mut out, false, "CONVERTED refs by names");
        self.render_names(&mut out, true, "UNCONVERTED refs by names");
        out
    }

    fn render_names(&self, out: &mut String, unsupported: bool, heading: &str) {
        let mut names: Vec<_> = self
            .counters
            .iter()
            .filter(|(_, c)| c.unsupported == unsupported)
            .collect();
        if names.is_empty() {
            return;
        }
        names.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        let _ = writeln!(out, "  {}:", heading);
        for (name, c) in names {
            let _ = writeln!(out, "    {}: {}", name, c.count);
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

/// Thread-safe, add-only aggregate for batch runs.
#[derive(Debug, Default)]
pub struct SharedStatistics {
    inner: Mutex<Statistics>,
}

impl SharedStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, stats: &Statistics) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.merge(stats);
    }

    pub fn into_inner(self) -> Statistics {
        self.inner.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}
