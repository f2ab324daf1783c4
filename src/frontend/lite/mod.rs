//! A small front-end that works from raw tokens alone.
//!
//! It does not expand macros or look into headers. Directive lines become
//! preprocessor events; the remaining tokens are pattern-matched for kernel
//! launches, `__shared__` declarations and device-side calls. Every
//! location it reports is a plain file location.


use std::collections::{HashMap, HashSet};
use std::ops::Range;

use tracing::debug;

use super::{
    AstNode, BuiltinType, CallExpr, ElementType, Expr, FunctionDecl, KernelLaunch, ParsedFile,
    PpEvent, SourceLoc, SourceRange, VarDecl, VarType,
};
use crate::lexer::{RawLexer, RawToken, TokenKind};
use crate::rename::RenameTable;
use crate::source::SourceText;
use crate::span::Span;

const EXECUTION_SPACES: &[&str] = &["__device__", "__global__", "__host__"];
const DECL_QUALIFIERS: &[&str] = &["extern", "static", "volatile", "const", "__device__"];
/// Attribute macros that take a parenthesised argument.
const ATTRIBUTES: &[&str] = &["__launch_bounds__", "__align__", "__attribute__", "__declspec"];

/// Parse `source`. Names in `device_functions` count as `__device__`
/// functions even without a declaration in the file.
pub fn parse(source: &str, device_functions: &RenameTable) -> ParsedFile {
    let tokens = RawLexer::new(source).tokenize();
    let (directives, code) = split_directives(source, &tokens);

    let events = directives
        .iter()
        .filter_map(|d| directive_event(source, &tokens[d.clone()]))
        .collect();
    let controlling_macro = controlling_macro(source, &tokens, &directives);

    let mut parser = CodeParser::new(source, code, device_functions);
    let nodes = parser.nodes();
    debug!(
        directives = directives.len(),
        nodes = nodes.len(),
        "lite front-end"
    );

    ParsedFile {
        source: SourceText::new(source),
        events,
        nodes,
        controlling_macro,
    }
}

// ── Directives ──────────────────────────────────────────────────────

/// Token index ranges of directive lines, and every other token.
fn split_directives(source: &str, tokens: &[RawToken]) -> (Vec<Range<usize>>, Vec<RawToken>) {
    let mut directives = Vec::new();
    let mut code = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].starts_line && tokens[i].is_punct(source, "#") {
            let start = i;
            i += 1;
            while i < tokens.len() && !tokens[i].starts_line {
                i += 1;
            }
            directives.push(start..i);
        } else {
            code.push(tokens[i]);
            i += 1;
        }
    }
    (directives, code)
}

fn directive_name<'s>(source: &'s str, line: &[RawToken]) -> Option<&'s str> {
    line.get(1)
        .filter(|t| t.kind == TokenKind::Ident)
        .map(|t| t.text(source))
}

fn directive_event(source: &str, line: &[RawToken]) -> Option<PpEvent> {
    let hash = line[0].span.start;
    match directive_name(source, line)? {
        "include" | "include_next" | "import" => include_event(source, line, hash),
        "pragma" => Some(PpEvent::Pragma {
            introducer: hash,
            name: line.get(2).map(|t| t.span),
        }),
        "ifndef" => {
            let name = line.get(2).filter(|t| t.kind == TokenKind::Ident)?;
            Some(PpEvent::Ifndef {
                directive: hash,
                macro_name: name.span,
            })
        }
        _ => None,
    }
}

fn include_event(source: &str, line: &[RawToken], hash: u32) -> Option<PpEvent> {
    let target = line.get(2)?;
    if target.kind == TokenKind::StringLit {
        let quoted = target.text(source);
        return Some(PpEvent::Include {
            hash,
            file_name: quoted[1..quoted.len() - 1].to_string(),
            angled: false,
            filename_range: target.span,
        });
    }
    if !target.is_punct(source, "<") {
        return None;
    }
    let line_end = line.last()?.span.end as usize;
    let open = target.span.start as usize;
    let close = open + 1 + source[open + 1..line_end].find('>')?;
    Some(PpEvent::Include {
        hash,
        file_name: source[open + 1..close].to_string(),
        angled: true,
        filename_range: Span::new(open as u32, close as u32 + 1),
    })
}

/// The macro of an `#ifndef X` ... `#endif` pair that wraps the whole
/// file, with nothing but whitespace and comments outside.
fn controlling_macro(
    source: &str,
    tokens: &[RawToken],
    directives: &[Range<usize>],
) -> Option<String> {
    let first = directives.first().filter(|d| d.start == 0)?;
    let line = &tokens[first.clone()];
    if directive_name(source, line)? != "ifndef" {
        return None;
    }
    let name = line.get(2).filter(|t| t.kind == TokenKind::Ident)?;

    let mut depth = 0usize;
    for d in directives {
        match directive_name(source, &tokens[d.clone()]) {
            Some("if" | "ifdef" | "ifndef") => depth += 1,
            Some("else" | "elif" | "elifdef" | "elifndef") if depth == 1 => return None,
            Some("endif") => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return (d.end == tokens.len()).then(|| name.text(source).to_string());
                }
            }
            _ => {}
        }
    }
    None
}

// ── Code ────────────────────────────────────────────────────────────

/// Canonical builtin type for a sequence of type words, if it is one.
pub fn builtin_type(words: &[&str]) -> Option<BuiltinType> {
    let mut unsigned = false;
    let mut signed = false;
    let mut longs = 0;
    let mut base = None;
    for &w in words {
        match w {
            "const" | "volatile" => {}
            "unsigned" => unsigned = true,
            "signed" => signed = true,
            "long" => longs += 1,
            "int" if base.is_none() => base = Some("int"),
            "int" => {}
            "short" | "char" | "bool" | "void" | "float" | "double" | "__fp16" => {
                if matches!(base, Some(b) if b != "int") {
                    return None;
                }
                base = Some(w);
            }
            _ => return None,
        }
    }
    let ty = match (base, longs) {
        (Some("void"), 0) => BuiltinType::Void,
        (Some("bool"), 0) => BuiltinType::Bool,
        (Some("float"), 0) => BuiltinType::Float,
        (Some("__fp16"), 0) => BuiltinType::Half,
        (Some("double"), 0) => BuiltinType::Double,
        (Some("double"), 1) => BuiltinType::LongDouble,
        (Some("char"), 0) if unsigned => BuiltinType::UChar,
        (Some("char"), 0) if signed => BuiltinType::SChar,
        (Some("char"), 0) => BuiltinType::Char,
        (Some("short"), 0) if unsigned => BuiltinType::UShort,
        (Some("short"), 0) => BuiltinType::Short,
        (Some("int") | None, 1) if unsigned => BuiltinType::ULong,
        (Some("int") | None, 1) => BuiltinType::Long,
        (Some("int") | None, 2) if unsigned => BuiltinType::ULongLong,
        (Some("int") | None, 2) => BuiltinType::LongLong,
        (Some("int"), 0) if unsigned => BuiltinType::UInt,
        (Some("int"), 0) => BuiltinType::Int,
        (None, 0) if unsigned => BuiltinType::UInt,
        (None, 0) if signed => BuiltinType::Int,
        _ => return None,
    };
    Some(ty)
}

struct CodeParser<'s> {
    source: &'s str,
    toks: Vec<RawToken>,
    device_functions: &'s RenameTable,
    typedefs: HashMap<String, BuiltinType>,
    functions: HashMap<String, FunctionDecl>,
    /// Token indices of function names at their declarations.
    decl_sites: HashSet<usize>,
}

/// One comma-separated element: token index range, inclusive.
type Element = Option<(usize, usize)>;

impl<'s> CodeParser<'s> {
    fn new(source: &'s str, toks: Vec<RawToken>, device_functions: &'s RenameTable) -> Self {
        Self {
            source,
            toks,
            device_functions,
            typedefs: HashMap::new(),
            functions: HashMap::new(),
            decl_sites: HashSet::new(),
        }
    }

    fn text(&self, i: usize) -> &'s str {
        self.toks.get(i).map_or("", |t| t.text(self.source))
    }

    fn is_punct(&self, i: usize, p: &str) -> bool {
        self.toks.get(i).is_some_and(|t| t.is_punct(self.source, p))
    }

    fn is_ident(&self, i: usize) -> bool {
        self.toks.get(i).is_some_and(|t| t.kind == TokenKind::Ident)
    }

    fn loc(&self, i: usize) -> SourceLoc {
        SourceLoc::File(self.toks[i].span.start)
    }

    fn expr(&self, first: usize, last: usize) -> Expr {
        Expr::new(SourceRange::new(self.loc(first), self.loc(last)))
    }

    fn nodes(&mut self) -> Vec<AstNode> {
        self.collect_typedefs();
        self.collect_functions();

        let mut nodes = Vec::new();
        for i in 0..self.toks.len() {
            let node = if self.is_punct(i, "<<<") {
                self.kernel_launch(i).map(AstNode::KernelLaunch)
            } else if self.text(i) == "__shared__" && self.is_ident(i) {
                self.shared_decl(i).map(AstNode::VarDecl)
            } else if self.is_ident(i) && self.is_punct(i + 1, "(") {
                self.device_call(i).map(AstNode::Call)
            } else {
                None
            };
            nodes.extend(node);
        }
        nodes.sort_by_key(|n| match n {
            AstNode::KernelLaunch(l) => l.range.begin.file_offset(),
            AstNode::VarDecl(v) => v.outer_start.file_offset(),
            AstNode::Call(c) => c.range.begin.file_offset(),
        });
        nodes
    }

    // ── Declarations ──

    /// `typedef <builtin> name;` and `using name = <builtin>;`.
    fn collect_typedefs(&mut self) {
        for i in 0..self.toks.len() {
            let (name, words) = match self.text(i) {
                "typedef" => {
                    let Some(end) = self.find_semicolon(i + 1) else {
                        continue;
                    };
                    if end < i + 3 || !self.is_ident(end - 1) {
                        continue;
                    }
                    (self.text(end - 1), (i + 1)..(end - 1))
                }
                "using" if self.is_ident(i + 1) && self.is_punct(i + 2, "=") => {
                    let Some(end) = self.find_semicolon(i + 3) else {
                        continue;
                    };
                    (self.text(i + 1), (i + 3)..end)
                }
                _ => continue,
            };
            if !words.clone().all(|j| self.is_ident(j)) {
                continue;
            }
            let words: Vec<&str> = words.map(|j| self.text(j)).collect();
            let resolved = builtin_type(&words)
                .or_else(|| match words.as_slice() {
                    [alias] => self.typedefs.get(*alias).copied(),
                    _ => None,
                });
            if let Some(ty) = resolved {
                self.typedefs.insert(name.to_string(), ty);
            }
        }
    }

    fn find_semicolon(&self, from: usize) -> Option<usize> {
        (from..self.toks.len()).find(|&j| self.is_punct(j, ";"))
    }

    /// Functions declared with an execution-space qualifier.
    fn collect_functions(&mut self) {
        let mut i = 0;
        while i < self.toks.len() {
            if !EXECUTION_SPACES.contains(&self.text(i)) {
                i += 1;
                continue;
            }
            let is_template = self.declaration_is_template(i);
            let mut decl = FunctionDecl {
                template_instantiation: is_template,
                ..FunctionDecl::default()
            };
            let mut j = i;
            let mut name_at = None;
            while j < self.toks.len() {
                if ATTRIBUTES.contains(&self.text(j)) && self.is_punct(j + 1, "(") {
                    match self.split_list(j + 2, ")") {
                        Some((_, close)) => j = close + 1,
                        None => break,
                    }
                    continue;
                }
                match self.text(j) {
                    "__device__" => decl.device = true,
                    "__global__" => decl.global = true,
                    "__host__" => decl.host = true,
                    ";" | "{" | "}" | "=" => break,
                    _ if self.is_ident(j) && self.is_punct(j + 1, "(") => {
                        name_at = Some(j);
                        break;
                    }
                    _ => {}
                }
                j += 1;
            }
            if let Some(at) = name_at {
                let name = self.text(at);
                decl.name = name.to_string();
                let known = self.functions.entry(name.to_string()).or_default();
                known.name = decl.name;
                known.device |= decl.device;
                known.global |= decl.global;
                known.host |= decl.host;
                known.template_instantiation |= decl.template_instantiation;
                self.decl_sites.insert(at);
            }
            i = j.max(i + 1);
        }
    }

    /// Whether `template` appears earlier in the declaration holding `at`.
    fn declaration_is_template(&self, at: usize) -> bool {
        (0..at)
            .rev()
            .take_while(|&j| !matches!(self.text(j), ";" | "{" | "}"))
            .any(|j| self.text(j) == "template")
    }

    // ── Kernel launches ──

    fn kernel_launch(&self, open: usize) -> Option<KernelLaunch> {
        let before = open.checked_sub(1)?;
        let (name_at, explicit_targs) = if self.is_punct(before, ">") || self.is_punct(before, ">>")
        {
            (self.template_name_before(before)?, true)
        } else if self.is_ident(before) {
            (before, false)
        } else {
            return None;
        };
        let mut begin = name_at;
        while begin >= 2 && self.is_punct(begin - 1, "::") && self.is_ident(begin - 2) {
            begin -= 2;
        }
        if begin >= 1 && self.is_punct(begin - 1, "::") {
            begin -= 1;
        }

        let (config, close) = self.split_list(open + 1, ">>>")?;
        if !self.is_punct(close + 1, "(") {
            return None;
        }
        let (args, rparen) = self.split_list(close + 2, ")")?;
        // `()` splits into a single empty element.
        let args: Vec<Element> = if matches!(args.as_slice(), [None]) {
            Vec::new()
        } else {
            args
        };
        if config.iter().chain(&args).any(Option::is_none) {
            return None;
        }

        let mut config: Vec<Expr> = config
            .into_iter()
            .flatten()
            .map(|(a, b)| self.expr(a, b))
            .collect();
        if (2..4).contains(&config.len()) {
            let at = self.loc(close);
            config.resize(4, Expr::defaulted(at));
        }

        let name = self.text(name_at);
        let mut callee = self
            .functions
            .get(name)
            .cloned()
            .unwrap_or_else(|| FunctionDecl {
                name: name.to_string(),
                global: true,
                ..FunctionDecl::default()
            });
        callee.template_instantiation |= explicit_targs;

        Some(KernelLaunch {
            range: SourceRange::new(self.loc(begin), self.loc(rparen)),
            callee: Some(self.expr(begin, before)),
            direct_callee: Some(callee),
            config,
            args: args
                .into_iter()
                .flatten()
                .map(|(a, b)| self.expr(a, b))
                .collect(),
        })
    }

    /// Index of the template name for a `name<...>` ending at `close`.
    fn template_name_before(&self, close: usize) -> Option<usize> {
        let mut depth = 0i32;
        for j in (0..=close).rev() {
            match self.text(j) {
                ">" => depth += 1,
                ">>" => depth += 2,
                "<" => depth -= 1,
                ";" | "{" | "}" => return None,
                _ => {}
            }
            if depth == 0 {
                let name = j.checked_sub(1)?;
                return self.is_ident(name).then_some(name);
            }
        }
        None
    }

    /// Split a comma-separated list starting at `from` and running to the
    /// first top-level `close`. Returns the elements and the index of the
    /// closing token; an empty element is `None`.
    fn split_list(&self, from: usize, close: &str) -> Option<(Vec<Element>, usize)> {
        let mut elements = Vec::new();
        let mut depth = 0usize;
        let mut start = from;
        for j in from..self.toks.len() {
            let t = self.text(j);
            if depth == 0 && (t == close || t == ",") {
                elements.push((j > start).then(|| (start, j - 1)));
                if t == close {
                    return Some((elements, j));
                }
                start = j + 1;
                continue;
            }
            match t {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" if depth == 0 => return None,
                ")" | "]" | "}" => depth -= 1,
                ";" => return None,
                _ => {}
            }
        }
        None
    }

    // ── Shared memory ──

    fn shared_decl(&self, shared: usize) -> Option<VarDecl> {
        let mut start = shared;
        while start > 0 && DECL_QUALIFIERS.contains(&self.text(start - 1)) {
            start -= 1;
        }
        let external_linkage = (start..shared).any(|j| self.text(j) == "extern")
            && !(start..shared).any(|j| self.text(j) == "static");

        let mut j = shared + 1;
        let mut type_words = Vec::new();
        let mut pointer = false;
        while j < self.toks.len() {
            let t = self.text(j);
            if ATTRIBUTES.contains(&t) && self.is_punct(j + 1, "(") {
                let (_, close) = self.split_list(j + 2, ")")?;
                j = close + 1;
                continue;
            }
            if matches!(t, "[" | ";" | "=" | "," | "(" | ")" | "{" | "}") {
                break;
            }
            if t == "*" || t == "&" {
                pointer = true;
            } else if !DECL_QUALIFIERS.contains(&t) && t != "__shared__" {
                type_words.push(j);
            }
            j += 1;
        }
        let name_at = type_words.pop()?;
        if !self.is_ident(name_at) || type_words.is_empty() {
            return None;
        }
        let words: Vec<&str> = type_words.iter().map(|&k| self.text(k)).collect();
        let mut spelling = words.join(" ");
        if pointer {
            spelling.push_str(" *");
        }

        let (ty, type_end) = if self.is_punct(j, "[") {
            let close = self.matching_bracket(j)?;
            let elem = ElementType {
                canonical: if pointer { None } else { self.resolve_type(&words) },
                spelling,
                start: self.loc(type_words[0]),
            };
            let ty = if close == j + 1 {
                VarType::IncompleteArray(elem)
            } else {
                VarType::Other(format!("{}[]", elem.spelling))
            };
            (ty, close)
        } else {
            (VarType::Other(spelling), name_at)
        };

        Some(VarDecl {
            name: self.text(name_at).to_string(),
            external_linkage,
            shared: true,
            ty,
            outer_start: self.loc(start),
            type_end: self.loc(type_end),
        })
    }

    fn resolve_type(&self, words: &[&str]) -> Option<BuiltinType> {
        builtin_type(words).or_else(|| match words {
            [name] => self.typedefs.get(*name).copied(),
            _ => None,
        })
    }

    fn matching_bracket(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for j in open..self.toks.len() {
            match self.text(j) {
                "[" => depth += 1,
                "]" => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(j);
                    }
                }
                ";" => return None,
                _ => {}
            }
        }
        None
    }

    // ── Calls ──

    fn device_call(&self, name_at: usize) -> Option<CallExpr> {
        if self.decl_sites.contains(&name_at) {
            return None;
        }
        if name_at > 0 && (self.is_punct(name_at - 1, ".") || self.is_punct(name_at - 1, "->")) {
            return None;
        }
        let name = self.text(name_at);
        let callee = match self.functions.get(name) {
            Some(decl) => decl.clone(),
            None if self.device_functions.get(name).is_some() => FunctionDecl {
                name: name.to_string(),
                device: true,
                ..FunctionDecl::default()
            },
            None => return None,
        };
        let (_, rparen) = self.split_list(name_at + 2, ")")?;
        Some(CallExpr {
            range: SourceRange::new(self.loc(name_at), self.loc(rparen)),
            callee: Some(callee),
        })
    }
}
