//! Renames the callee of calls to device-side functions.

use super::{RuleOutcome, SyntaxRule};
use crate::convert::ledger::LedgerError;
use crate::convert::renamer::Occurrence;
use crate::convert::{FileConverter, RangeMode};
use crate::frontend::AstNode;
use crate::span::Span;

pub(crate) struct DeviceCallRule;

impl SyntaxRule for DeviceCallRule {
    fn name(&self) -> &'static str {
        "device-call"
    }

    fn apply(
        &self,
        node: &AstNode,
        cx: &mut FileConverter<'_>,
    ) -> Result<RuleOutcome, LedgerError> {
        let AstNode::Call(call) = node else {
            return Ok(RuleOutcome::Declined);
        };
        let Some(callee) = call.callee.as_ref().filter(|decl| decl.is_device_side()) else {
            return Ok(RuleOutcome::Declined);
        };
        let Some((at, _)) = cx.resolver().token_bounds(call.range, RangeMode::Write) else {
            return Ok(RuleOutcome::Declined);
        };
        let name_span = Span::new(at, at + callee.name.len() as u32);
        // The call must start with the callee's own spelling, and a span
        // another rule rewrites wholesale is off limits.
        if cx.file.source.slice(name_span) != Some(callee.name.as_str()) || cx.is_subsumed(name_span)
        {
            return Ok(RuleOutcome::Declined);
        }
        let tables = cx.tables;
        cx.find_and_replace(&callee.name, at, &tables.device_functions, Occurrence::Code)?;
        Ok(RuleOutcome::Claimed)
    }
}
