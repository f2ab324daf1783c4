//! Lookup-and-decide for a single name. Shared by the token scanner, the
//! rules that re-emit copied text, and the device-call rule.

use tracing::trace;

use super::{FileConverter, Replacement};
use crate::convert::ledger::LedgerError;
use crate::lexer::{RawLexer, TokenKind};
use crate::rename::{ConvKind, RenameTable};
use crate::span::Span;

/// Where a candidate name was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Occurrence {
    /// An identifier token.
    Code,
    /// A whitespace-bounded word inside a string literal.
    Literal,
}

/// Candidate words inside string literals start with this.
const LITERAL_PREFIX: &str = "cu";

impl FileConverter<'_> {
    /// Look `name` up in `table`, count it, and decide its new spelling.
    ///
    /// `None` means leave the text alone: the name is unknown, the target
    /// cannot express it (a diagnostic is emitted), or the new spelling is
    /// the old one.
    pub(super) fn decide(
        &mut self,
        name: &str,
        at: u32,
        table: &RenameTable,
        occurrence: Occurrence,
    ) -> Option<String> {
        let entry = table.get(name)?;
        let flavor = self.options.flavor;
        let unsupported = entry.is_unsupported(flavor);
        let kind = match occurrence {
            Occurrence::Code => entry.kind,
            Occurrence::Literal => ConvKind::Literal,
        };
        self.stats
            .record(name, kind, entry.api, entry.support, unsupported);

        let span = Span::new(at, at + name.len() as u32);
        if unsupported {
            self.warn(
                format!("CUDA identifier `{}` is unsupported in {}", name, flavor),
                span,
            );
            return None;
        }
        let target = entry.target(flavor);
        if target == name {
            trace!(name, "identity mapping");
            return None;
        }
        Some(target.to_string())
    }

    /// Rename `name` at `at` in place.
    pub(super) fn find_and_replace(
        &mut self,
        name: &str,
        at: u32,
        table: &RenameTable,
        occurrence: Occurrence,
    ) -> Result<(), LedgerError> {
        if let Some(target) = self.decide(name, at, table, occurrence) {
            let span = Span::new(at, at + name.len() as u32);
            self.insert_replacement(Replacement::new(span, target), at)?;
        }
        Ok(())
    }

    /// Candidate words of a string literal token, with their offsets.
    pub(super) fn literal_words(literal: &str, start: u32) -> Vec<(&str, u32)> {
        let inner = literal
            .strip_prefix('"')
            .map(|s| s.strip_suffix('"').unwrap_or(s))
            .unwrap_or("");
        let base = start + 1;
        let mut words = Vec::new();
        let mut word_start = None;
        for (i, ch) in inner.char_indices().chain(std::iter::once((inner.len(), ' '))) {
            if ch.is_ascii_whitespace() {
                if let Some(s) = word_start.take() {
                    let word = &inner[s..i];
                    if word.starts_with(LITERAL_PREFIX) {
                        words.push((word, base + s as u32));
                    }
                }
            } else if word_start.is_none() {
                word_start = Some(i);
            }
        }
        words
    }

    /// Re-emit `text` with identifiers and literal words renamed.
    ///
    /// Used by rules that copy source text into a larger replacement, so
    /// the copy carries the same renames the scanner would have made.
    /// `origin` is the file offset `text` was read from.
    pub(super) fn rename_text(&mut self, text: &str, origin: u32) -> String {
        let tables = self.tables;
        let mut edits = Vec::new();
        for tok in RawLexer::new(text) {
            let at = origin + tok.span.start;
            match tok.kind {
                TokenKind::Ident => {
                    let name = tok.text(text);
                    if let Some(target) =
                        self.decide(name, at, &tables.identifiers, Occurrence::Code)
                    {
                        edits.push(Replacement::new(tok.span, target));
                    }
                }
                TokenKind::StringLit => {
                    for (word, word_at) in Self::literal_words(tok.text(text), tok.span.start) {
                        if let Some(target) = self.decide(
                            word,
                            origin + word_at,
                            &tables.identifiers,
                            Occurrence::Literal,
                        ) {
                            let span = Span::new(word_at, word_at + word.len() as u32);
                            edits.push(Replacement::new(span, target));
                        }
                    }
                }
                _ => {}
            }
        }
        super::apply_edits(text, &edits)
    }
}
