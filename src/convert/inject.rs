use tracing::debug;

use super::includes::HeaderFamily;
use super::{FileConverter, Replacement, RUNTIME_HEADER};
use crate::convert::ledger::LedgerError;

impl FileConverter<'_> {
    /// Make sure the file includes the runtime header.
    ///
    /// Placement, first match wins: after the include guard (the earlier of
    /// `#pragma once` and the `#ifndef` of the controlling macro), before
    /// the first include directive, at the start of the file.
    pub(super) fn inject_runtime_header(&mut self) -> Result<(), LedgerError> {
        if self.headers.is_inserted(HeaderFamily::Runtime) {
            return Ok(());
        }
        let guard = self
            .file
            .controlling_macro
            .as_ref()
            .and_then(|name| self.ifndefs.get(name))
            .copied();
        let at = match (self.pragma_once, guard) {
            (Some(p), Some(g)) => p.min(g),
            (Some(p), None) => p,
            (None, Some(g)) => g,
            (None, None) => self.headers.first_header.unwrap_or(0),
        };
        debug!(at, "injecting runtime header");
        let text = format!("\n#include <{}>\n", RUNTIME_HEADER);
        self.insert_replacement(Replacement::insertion(at, text), at)?;
        self.headers.mark(HeaderFamily::Runtime);
        Ok(())
    }
}
