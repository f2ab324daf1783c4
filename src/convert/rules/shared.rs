//! `extern __shared__ T name[];` becomes `HIP_DYNAMIC_SHARED(T, name);`.

use super::{RuleOutcome, SyntaxRule};
use crate::convert::ledger::LedgerError;
use crate::convert::{FileConverter, Replacement};
use crate::frontend::{AstNode, SourceRange, VarDecl, VarType};
use crate::rename::{ApiFamily, ConvKind, SupportTier};
use crate::span::Span;

pub(crate) struct SharedArrayRule;

const STATS_NAME: &str = "cudaSharedIncompleteArrayVar";
const SHARED_MACRO: &str = "HIP_DYNAMIC_SHARED";

/// The element type as written in the replacement: the builtin name for
/// builtin types, otherwise the spelling (typedef names stay as written).
fn element_type(var: &VarDecl) -> Option<String> {
    let VarType::IncompleteArray(elem) = &var.ty else {
        return None;
    };
    Some(match elem.canonical {
        Some(builtin) => builtin.name().to_string(),
        None => elem.spelling.trim().to_string(),
    })
}

/// Where the element type is written, for diagnostics on renamed words.
fn type_origin(var: &VarDecl) -> Option<u32> {
    let VarType::IncompleteArray(elem) = &var.ty else {
        return None;
    };
    Some(elem.start.spelling_offset())
}

fn is_dynamic_shared(var: &VarDecl) -> bool {
    var.external_linkage && var.shared && matches!(var.ty, VarType::IncompleteArray(_))
}

fn write_span(var: &VarDecl, cx: &FileConverter<'_>) -> Option<Span> {
    cx.resolver()
        .write_span(SourceRange::new(var.outer_start, var.type_end))
}

impl SyntaxRule for SharedArrayRule {
    fn name(&self) -> &'static str {
        "dynamic-shared"
    }

    fn subsumes(&self, node: &AstNode, cx: &FileConverter<'_>) -> Option<Span> {
        let AstNode::VarDecl(var) = node else {
            return None;
        };
        if !is_dynamic_shared(var) || element_type(var)?.is_empty() {
            return None;
        }
        write_span(var, cx)
    }

    fn apply(
        &self,
        node: &AstNode,
        cx: &mut FileConverter<'_>,
    ) -> Result<RuleOutcome, LedgerError> {
        let AstNode::VarDecl(var) = node else {
            return Ok(RuleOutcome::Declined);
        };
        if !is_dynamic_shared(var) {
            return Ok(RuleOutcome::Declined);
        }
        let Some(span) = write_span(var, cx) else {
            return Ok(RuleOutcome::Declined);
        };
        let ty = element_type(var).unwrap_or_default();
        if ty.is_empty() {
            cx.warn(
                format!(
                    "cannot determine the element type of dynamic shared array `{}`",
                    var.name
                ),
                span,
            );
            return Ok(RuleOutcome::Declined);
        }
        let ty = cx.rename_text(&ty, type_origin(var).unwrap_or(span.start));
        let text = format!("{}({}, {})", SHARED_MACRO, ty, var.name);
        cx.insert_replacement(Replacement::new(span, text), var.outer_start.expansion_offset())?;
        cx.stats.record(
            STATS_NAME,
            ConvKind::Memory,
            ApiFamily::Runtime,
            SupportTier::Full,
            false,
        );
        Ok(RuleOutcome::Claimed)
    }
}
