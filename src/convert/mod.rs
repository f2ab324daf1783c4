//! The rewrite engine: one primary file in, a conflict-free edit set out.
//!
//! Processing order for a file:
//! 1. every syntax rule reports the span it will overwrite wholesale, and
//!    include file names are set aside for the include policy;
//! 2. the raw token scan renames identifiers and string-literal words
//!    outside those spans;
//! 3. preprocessor events run the include policy and record guards;
//! 4. syntax rules rewrite the matched nodes;
//! 5. the mandatory runtime header is injected if nothing provided it.
//!
//! Every edit goes through the [`Ledger`]. A conflict aborts the file.

mod includes;
mod inject;
pub mod ledger;
pub mod ranges;
mod renamer;
mod rules;
mod scanner;


use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::config::ConvertOptions;
use crate::diagnostic::Diagnostic;
use crate::frontend::{ParsedFile, PpEvent};
use crate::rename::RenameTables;
use crate::span::Span;
use crate::stats::Statistics;

pub use includes::HeaderFamily;
pub use ledger::{apply_edits, Ledger, LedgerError, Replacement, Submission};
pub use ranges::{RangeMode, RangeResolver};

use includes::HeaderState;

/// The header every converted file must include exactly once.
pub const RUNTIME_HEADER: &str = "hip/hip_runtime.h";

/// Which part of the engine produced an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Scanner,
    Include,
    Rule(&'static str),
    Injector,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Scanner => write!(f, "token scanner"),
            Stage::Include => write!(f, "include policy"),
            Stage::Rule(name) => write!(f, "rule '{}'", name),
            Stage::Injector => write!(f, "header injector"),
        }
    }
}

/// Conversion of one file was abandoned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("conflicting edit from {stage}: {source}")]
pub struct ConvertError {
    pub stage: Stage,
    #[source]
    pub source: LedgerError,
}

impl ConvertError {
    pub fn span(&self) -> Span {
        let LedgerError::Conflict { rejected, .. } = &self.source;
        rejected.span
    }
}

trait StageExt<T> {
    fn at_stage(self, stage: Stage) -> Result<T, ConvertError>;
}

impl<T> StageExt<T> for Result<T, LedgerError> {
    fn at_stage(self, stage: Stage) -> Result<T, ConvertError> {
        self.map_err(|source| ConvertError { stage, source })
    }
}

/// The outcome of converting one file.
#[derive(Clone, Debug)]
pub struct FileConversion {
    /// Non-overlapping edits, in position order.
    pub edits: Vec<Replacement>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: Statistics,
}

impl FileConversion {
    pub fn apply(&self, source: &str) -> String {
        apply_edits(source, &self.edits)
    }
}

/// Convert one parsed file.
pub fn convert(
    file: &ParsedFile,
    tables: &RenameTables,
    options: &ConvertOptions,
) -> Result<FileConversion, ConvertError> {
    let mut cx = FileConverter::new(file, tables, options);
    let result = cx.run();
    if let Err(e) = &result {
        warn!("aborting file: {}", e);
    }
    result?;
    Ok(cx.finish())
}

/// Per-file engine state. Nothing here outlives the file.
pub(crate) struct FileConverter<'a> {
    file: &'a ParsedFile,
    tables: &'a RenameTables,
    options: &'a ConvertOptions,
    ledger: Ledger,
    stats: Statistics,
    diagnostics: Vec<Diagnostic>,
    headers: HeaderState,
    /// Macro name → offset just past its first `#ifndef` test.
    ifndefs: HashMap<String, u32>,
    /// End of the `once` token of the first `#pragma once`.
    pragma_once: Option<u32>,
    /// Spans syntax rules will overwrite, sorted by start.
    subsumed: Vec<Span>,
}

impl<'a> FileConverter<'a> {
    fn new(file: &'a ParsedFile, tables: &'a RenameTables, options: &'a ConvertOptions) -> Self {
        let mut stats = Statistics::new();
        stats.total_bytes = u64::from(file.source.len());
        stats.total_lines = file.source.line_count() as u64;
        Self {
            file,
            tables,
            options,
            ledger: Ledger::new(),
            stats,
            diagnostics: Vec::new(),
            headers: HeaderState::default(),
            ifndefs: HashMap::new(),
            pragma_once: None,
            subsumed: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<(), ConvertError> {
        let file = self.file;

        // Include file names belong to the include policy, never the scan.
        let mut subsumed = rules::subsumed_spans(self, &file.nodes);
        subsumed.extend(file.events.iter().filter_map(|event| match event {
            PpEvent::Include { filename_range, .. } => Some(*filename_range),
            _ => None,
        }));
        subsumed.sort();
        subsumed.dedup();
        self.subsumed = subsumed;
        self.scan_tokens().at_stage(Stage::Scanner)?;

        for event in &file.events {
            match event {
                PpEvent::Include {
                    hash,
                    file_name,
                    angled,
                    filename_range,
                } => self
                    .on_include(*hash, file_name, *angled, *filename_range)
                    .at_stage(Stage::Include)?,
                PpEvent::Pragma { name, .. } => self.on_pragma(*name),
                PpEvent::Ifndef { macro_name, .. } => self.on_ifndef(*macro_name),
            }
        }

        for node in &file.nodes {
            rules::rewrite(self, node)?;
        }

        self.inject_runtime_header().at_stage(Stage::Injector)
    }

    fn finish(self) -> FileConversion {
        let mut stats = self.stats;
        stats.files_converted = 1;
        FileConversion {
            edits: self.ledger.into_replacements(),
            diagnostics: self.diagnostics,
            stats,
        }
    }

    fn source(&self) -> &'a str {
        let file: &'a ParsedFile = self.file;
        file.source.as_str()
    }

    fn resolver(&self) -> RangeResolver<'a> {
        let file: &'a ParsedFile = self.file;
        RangeResolver::new(&file.source)
    }

    /// Submit an edit, attributing it to the line of `attribution`
    /// (the expansion site when the edit lands in a macro definition).
    fn insert_replacement(
        &mut self,
        rep: Replacement,
        attribution: u32,
    ) -> Result<Submission, LedgerError> {
        let line = self.file.source.line_of(attribution);
        let shown = rep.to_string();
        let submitted = self.ledger.submit(rep, line, &mut self.stats)?;
        debug!(line, edit = %shown, ?submitted, "replacement");
        Ok(submitted)
    }

    fn is_subsumed(&self, span: Span) -> bool {
        let idx = self.subsumed.partition_point(|s| s.start <= span.start);
        self.subsumed[..idx]
            .iter()
            .rev()
            .any(|s| span.start >= s.start && span.end <= s.end)
    }

    fn warn(&mut self, message: String, span: Span) {
        self.diagnostics.push(Diagnostic::warning(message, span));
    }
}
