//! Raw token scan over the whole primary file.
//!
//! Runs on unexpanded text, so names inside macro definitions and inside
//! excluded conditional blocks are renamed too. Tokens inside a span a
//! syntax rule will overwrite are left to that rule.

use tracing::debug;

use super::renamer::Occurrence;
use super::FileConverter;
use crate::convert::ledger::LedgerError;
use crate::lexer::{RawLexer, TokenKind};

impl FileConverter<'_> {
    pub(super) fn scan_tokens(&mut self) -> Result<(), LedgerError> {
        let source = self.source();
        let tables = self.tables;
        let mut skipped = 0usize;
        for tok in RawLexer::new(source) {
            if !matches!(tok.kind, TokenKind::Ident | TokenKind::StringLit) {
                continue;
            }
            if self.is_subsumed(tok.span) {
                skipped += 1;
                continue;
            }
            let text = tok.text(source);
            if tok.kind == TokenKind::Ident {
                self.find_and_replace(text, tok.span.start, &tables.identifiers, Occurrence::Code)?;
                continue;
            }
            for (word, at) in Self::literal_words(text, tok.span.start) {
                self.find_and_replace(word, at, &tables.identifiers, Occurrence::Literal)?;
            }
        }
        debug!(skipped, "token scan finished");
        Ok(())
    }
}
