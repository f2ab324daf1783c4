//! What the converter needs from a C++/CUDA front-end.
//!
//! A front-end parses the primary file and hands over a [`ParsedFile`]:
//! the loaded text, preprocessor events seen in that file, and the syntax
//! nodes the rewrite rules care about. Everything is restricted to the
//! primary file; events and nodes from included headers are not reported.
//!
//! Locations follow the usual macro model. A token either sits in the file
//! as written, came from a macro's body (spelled in the `#define`, expanded
//! at the use site), or came from a macro argument (spelled at the use site).

pub mod lite;

use crate::source::SourceText;
use crate::span::Span;

/// Where a token came from. Offsets are into the primary file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceLoc {
    File(u32),
    MacroBody {
        /// Offset of the token inside the macro definition.
        spelling: u32,
        /// Offset of the macro name at the use site.
        expansion: u32,
        at_expansion_start: bool,
        at_expansion_end: bool,
    },
    MacroArg {
        /// Offset of the argument token at the use site.
        spelling: u32,
        expansion: u32,
    },
}

impl SourceLoc {
    /// The offset a reader of the file would point at.
    pub fn file_offset(self) -> u32 {
        match self {
            SourceLoc::File(o) => o,
            SourceLoc::MacroBody { expansion, .. } => expansion,
            SourceLoc::MacroArg { spelling, .. } => spelling,
        }
    }

    /// The offset where the token's characters are written.
    pub fn spelling_offset(self) -> u32 {
        match self {
            SourceLoc::File(o) => o,
            SourceLoc::MacroBody { spelling, .. } | SourceLoc::MacroArg { spelling, .. } => spelling,
        }
    }

    /// The offset of the outermost use site.
    pub fn expansion_offset(self) -> u32 {
        match self {
            SourceLoc::File(o) => o,
            SourceLoc::MacroBody { expansion, .. } | SourceLoc::MacroArg { expansion, .. } => {
                expansion
            }
        }
    }

    pub fn is_macro_body(self) -> bool {
        matches!(self, SourceLoc::MacroBody { .. })
    }

    pub fn at_expansion_start(self) -> bool {
        matches!(self, SourceLoc::MacroBody { at_expansion_start: true, .. })
    }

    pub fn at_expansion_end(self) -> bool {
        matches!(self, SourceLoc::MacroBody { at_expansion_end: true, .. })
    }
}

/// A token range: `end` is the location of the *first* byte of the last token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceRange {
    pub begin: SourceLoc,
    pub end: SourceLoc,
}

impl SourceRange {
    pub fn new(begin: SourceLoc, end: SourceLoc) -> Self {
        Self { begin, end }
    }

    /// A range of plain file tokens.
    pub fn file(begin: u32, end: u32) -> Self {
        Self {
            begin: SourceLoc::File(begin),
            end: SourceLoc::File(end),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub range: SourceRange,
    /// The argument was omitted and filled in from a parameter default.
    pub defaulted: bool,
}

impl Expr {
    pub fn new(range: SourceRange) -> Self {
        Self {
            range,
            defaulted: false,
        }
    }

    pub fn defaulted(at: SourceLoc) -> Self {
        Self {
            range: SourceRange::new(at, at),
            defaulted: true,
        }
    }
}

/// A resolved function declaration, as far as the rules need it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub device: bool,
    pub global: bool,
    pub host: bool,
    pub template_instantiation: bool,
}

impl FunctionDecl {
    /// Callable only from device code.
    pub fn is_device_side(&self) -> bool {
        (self.device || self.global) && !self.host
    }
}

/// `callee<<<grid, block, shmem, stream>>>(args)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelLaunch {
    pub range: SourceRange,
    pub callee: Option<Expr>,
    pub direct_callee: Option<FunctionDecl>,
    /// The four configuration arguments; omitted ones are `defaulted`.
    pub config: Vec<Expr>,
    pub args: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinType {
    Void,
    Bool,
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Half,
    Float,
    Double,
    LongDouble,
}

impl BuiltinType {
    /// Canonical spelling, as a CUDA-aware type printer renders it.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Void => "void",
            BuiltinType::Bool => "bool",
            BuiltinType::Char => "char",
            BuiltinType::SChar => "signed char",
            BuiltinType::UChar => "unsigned char",
            BuiltinType::Short => "short",
            BuiltinType::UShort => "unsigned short",
            BuiltinType::Int => "int",
            BuiltinType::UInt => "unsigned int",
            BuiltinType::Long => "long",
            BuiltinType::ULong => "unsigned long",
            BuiltinType::LongLong => "long long",
            BuiltinType::ULongLong => "unsigned long long",
            BuiltinType::Half => "__fp16",
            BuiltinType::Float => "float",
            BuiltinType::Double => "double",
            BuiltinType::LongDouble => "long double",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementType {
    /// The type as written (possibly a typedef name).
    pub spelling: String,
    /// Set when the type is, after stripping sugar, a builtin.
    pub canonical: Option<BuiltinType>,
    /// First token of the written type.
    pub start: SourceLoc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarType {
    /// `T name[]`.
    IncompleteArray(ElementType),
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub external_linkage: bool,
    /// Carries the `__shared__` attribute.
    pub shared: bool,
    pub ty: VarType,
    /// First token of the declaration, storage class included.
    pub outer_start: SourceLoc,
    /// Last token of the declarator's type (the `]`).
    pub type_end: SourceLoc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallExpr {
    pub range: SourceRange,
    pub callee: Option<FunctionDecl>,
}

/// A syntax node matched in the primary file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AstNode {
    KernelLaunch(KernelLaunch),
    VarDecl(VarDecl),
    Call(CallExpr),
}

/// Preprocessor callbacks, in the order the front-end saw them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PpEvent {
    Include {
        /// Offset of the `#`.
        hash: u32,
        /// The name between the delimiters.
        file_name: String,
        angled: bool,
        /// The name with its delimiters (`<...>` or `"..."`).
        filename_range: Span,
    },
    Pragma {
        introducer: u32,
        /// First token after `pragma`, if any.
        name: Option<Span>,
    },
    Ifndef {
        directive: u32,
        macro_name: Span,
    },
}

/// Everything the converter consumes for one primary file.
#[derive(Clone, Debug)]
pub struct ParsedFile {
    pub source: SourceText,
    pub events: Vec<PpEvent>,
    pub nodes: Vec<AstNode>,
    /// The macro guarding the whole file against re-inclusion, if any.
    pub controlling_macro: Option<String>,
}

impl ParsedFile {
    /// A file with no preprocessor events or syntax nodes.
    pub fn bare(source: impl Into<String>) -> Self {
        Self {
            source: SourceText::new(source),
            events: Vec::new(),
            nodes: Vec::new(),
            controlling_macro: None,
        }
    }
}
