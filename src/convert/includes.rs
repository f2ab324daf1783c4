//! Include policy and the other preprocessor callbacks.
//!
//! A recognised CUDA header is either rewritten to its HIP name or
//! excluded (the directive is erased). Each API family's main header
//! survives at most once per file; later ones are excluded.

use std::collections::BTreeSet;

use super::{FileConverter, Replacement};
use crate::convert::ledger::LedgerError;
use crate::rename::{ApiFamily, ConvKind, RenameEntry};
use crate::span::Span;

/// API families whose main header is tracked per file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderFamily {
    /// Driver and runtime share `hip/hip_runtime.h`.
    Runtime,
    Blas,
    Rand,
    /// The device-side random header, tracked apart from the host one.
    RandKernel,
    Dnn,
    Fft,
    Complex,
    Sparse,
}

impl HeaderFamily {
    pub fn of(entry: &RenameEntry) -> Self {
        match entry.api {
            ApiFamily::Driver | ApiFamily::Runtime => HeaderFamily::Runtime,
            ApiFamily::Blas => HeaderFamily::Blas,
            ApiFamily::Rand if entry.hip.ends_with("_kernel.h") => HeaderFamily::RandKernel,
            ApiFamily::Rand => HeaderFamily::Rand,
            ApiFamily::Dnn => HeaderFamily::Dnn,
            ApiFamily::Fft => HeaderFamily::Fft,
            ApiFamily::Complex => HeaderFamily::Complex,
            ApiFamily::Sparse => HeaderFamily::Sparse,
        }
    }
}

/// Per-file header bookkeeping.
#[derive(Debug, Default)]
pub(super) struct HeaderState {
    inserted: BTreeSet<HeaderFamily>,
    /// `#` of the first include directive in the file.
    pub(super) first_header: Option<u32>,
}

impl HeaderState {
    pub(super) fn is_inserted(&self, family: HeaderFamily) -> bool {
        self.inserted.contains(&family)
    }

    /// Set the flag; true if it was clear.
    pub(super) fn mark(&mut self, family: HeaderFamily) -> bool {
        self.inserted.insert(family)
    }
}

impl FileConverter<'_> {
    pub(super) fn on_include(
        &mut self,
        hash: u32,
        file_name: &str,
        angled: bool,
        filename_range: Span,
    ) -> Result<(), LedgerError> {
        self.headers.first_header.get_or_insert(hash);

        let tables = self.tables;
        let Some(entry) = tables.headers.get(file_name) else {
            return Ok(());
        };
        let flavor = self.options.flavor;
        let unsupported = entry.is_unsupported(flavor);
        self.stats
            .record(file_name, entry.kind, entry.api, entry.support, unsupported);
        if unsupported {
            self.warn(
                format!("CUDA header `{}` is unsupported in {}", file_name, flavor),
                filename_range,
            );
            return Ok(());
        }

        let rep = if self.exclude(entry) {
            Replacement::new(Span::new(hash, filename_range.end), "")
        } else {
            let target = entry.target(flavor);
            let text = if angled {
                format!("<{}>", target)
            } else {
                format!("\"{}\"", target)
            };
            if self.file.source.slice(filename_range) == Some(text.as_str()) {
                return Ok(());
            }
            Replacement::new(filename_range, text)
        };
        self.insert_replacement(rep, hash)?;
        Ok(())
    }

    /// Whether a recognised, supported header should be erased. A header
    /// with no target name always is.
    fn exclude(&mut self, entry: &RenameEntry) -> bool {
        if entry.target(self.options.flavor).is_empty() {
            return true;
        }
        let family = HeaderFamily::of(entry);
        match entry.kind {
            ConvKind::IncludeMain => !self.headers.mark(family),
            ConvKind::Include if family == HeaderFamily::RandKernel => {
                !self.headers.mark(family)
            }
            _ => false,
        }
    }

    pub(super) fn on_pragma(&mut self, name: Option<Span>) {
        if self.pragma_once.is_some() {
            return;
        }
        let Some(name) = name else { return };
        if self.file.source.slice(name) == Some("once") {
            self.pragma_once = Some(name.end);
        }
    }

    pub(super) fn on_ifndef(&mut self, macro_name: Span) {
        if let Some(name) = self.file.source.slice(macro_name) {
            self.ifndefs.entry(name.to_string()).or_insert(macro_name.end);
        }
    }
}
