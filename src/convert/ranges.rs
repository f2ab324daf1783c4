//! Turning front-end token ranges into byte spans of the primary file.
//!
//! Two modes. *Read* spans are for copying existing text into a new
//! replacement; *write* spans are for overwriting text in place. They
//! differ in how they treat ranges that start or end inside a macro body.

use crate::frontend::SourceRange;
use crate::lexer::token_end;
use crate::source::SourceText;
use crate::span::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeMode {
    Read,
    Write,
}

pub struct RangeResolver<'a> {
    source: &'a SourceText,
}

impl<'a> RangeResolver<'a> {
    pub fn new(source: &'a SourceText) -> Self {
        Self { source }
    }

    /// Offsets of the first and last token of `range`.
    ///
    /// Read: an endpoint inside a macro body that is not the start (or end)
    /// of the whole expansion would copy half-expanded text, so such ranges
    /// are read from the macro's spelling instead; otherwise from the file.
    ///
    /// Write: editing one use of a macro cannot change the others, so a
    /// range with both ends in a macro body is written at the definition.
    /// A range with only one end in a body has no single place to write
    /// and yields `None`.
    pub fn token_bounds(&self, range: SourceRange, mode: RangeMode) -> Option<(u32, u32)> {
        let (begin, end) = (range.begin, range.end);
        let use_spelling = match mode {
            RangeMode::Read => {
                let begin_safe = !begin.is_macro_body() || begin.at_expansion_start();
                let end_safe = !end.is_macro_body() || end.at_expansion_end();
                !(begin_safe && end_safe)
            }
            RangeMode::Write => match (begin.is_macro_body(), end.is_macro_body()) {
                (true, true) => true,
                (false, false) => false,
                _ => return None,
            },
        };
        if use_spelling {
            Some((begin.spelling_offset(), end.spelling_offset()))
        } else {
            Some((begin.file_offset(), end.file_offset()))
        }
    }

    /// Byte span from the first token's start to the last token's end.
    /// `None` if the endpoints are inverted, out of bounds or unwritable.
    pub fn span(&self, range: SourceRange, mode: RangeMode) -> Option<Span> {
        let (first, last) = self.token_bounds(range, mode)?;
        if first > last || last > self.source.len() {
            return None;
        }
        let end = token_end(self.source.as_str(), last).max(last);
        Some(Span::new(first, end))
    }

    pub fn read_span(&self, range: SourceRange) -> Option<Span> {
        self.span(range, RangeMode::Read)
    }

    pub fn write_span(&self, range: SourceRange) -> Option<Span> {
        self.span(range, RangeMode::Write)
    }

    /// Source text of `range`, read-mode.
    pub fn read_text(&self, range: SourceRange) -> Option<&'a str> {
        self.source.slice(self.read_span(range)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::SourceLoc;

    //            0         1         2         3
    //            0123456789012345678901234567890123456
    const SRC: &str = "#define K k<<<1,2>>>(x)\nK; foo(a+b);\n";

    fn body(spelling: u32, start: bool, end: bool) -> SourceLoc {
        SourceLoc::MacroBody {
            spelling,
            expansion: 24,
            at_expansion_start: start,
            at_expansion_end: end,
        }
    }

    #[test]
    fn test_file_range_measures_last_token() {
        let src = SourceText::new(SRC);
        let r = RangeResolver::new(&src);
        // `foo(a+b)`: last token `)` at 34.
        let span = r.read_span(SourceRange::file(27, 34)).unwrap();
        assert_eq!(src.slice(span), Some("foo(a+b)"));
    }

    #[test]
    fn test_read_whole_expansion_uses_file() {
        let src = SourceText::new(SRC);
        let r = RangeResolver::new(&src);
        let range = SourceRange::new(body(8, true, false), body(22, false, true));
        assert_eq!(r.token_bounds(range, RangeMode::Read), Some((24, 24)));
        assert_eq!(r.read_text(range), Some("K"));
    }

    #[test]
    fn test_read_partial_expansion_uses_spelling() {
        let src = SourceText::new(SRC);
        let r = RangeResolver::new(&src);
        // `1` .. `2` inside the body: neither is an expansion boundary.
        let range = SourceRange::new(body(14, false, false), body(16, false, false));
        assert_eq!(r.read_text(range), Some("1,2"));
    }

    #[test]
    fn test_write_in_macro_body_targets_definition() {
        let src = SourceText::new(SRC);
        let r = RangeResolver::new(&src);
        let range = SourceRange::new(body(10, true, false), body(22, false, true));
        let span = r.write_span(range).unwrap();
        assert_eq!(src.slice(span), Some("k<<<1,2>>>(x)"));
    }

    #[test]
    fn test_write_with_one_endpoint_in_body() {
        let src = SourceText::new(SRC);
        let r = RangeResolver::new(&src);
        let range = SourceRange::new(SourceLoc::File(24), body(22, false, true));
        assert_eq!(r.token_bounds(range, RangeMode::Write), None);
        assert_eq!(r.write_span(range), None);
    }

    #[test]
    fn test_write_from_body_to_use_site_is_refused() {
        // Starts inside the definition, ends at the `)` of `K; foo(a+b)`.
        let src = SourceText::new(SRC);
        let r = RangeResolver::new(&src);
        let range = SourceRange::new(body(10, true, false), SourceLoc::File(34));
        assert_eq!(r.write_span(range), None);
        // Reading the same range is still fine: it starts an expansion.
        assert!(r.read_span(range).is_some());
    }

    #[test]
    fn test_macro_argument_reads_at_use_site() {
        let src = SourceText::new(SRC);
        let r = RangeResolver::new(&src);
        let arg = SourceLoc::MacroArg {
            spelling: 31,
            expansion: 27,
        };
        let range = SourceRange::new(arg, arg);
        assert_eq!(r.read_text(range), Some("a"));
    }
}
