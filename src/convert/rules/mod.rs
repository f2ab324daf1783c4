//! Syntax rules: rewrites that need more than one token of context.
//!
//! Rules are tried in a fixed order and the first to claim a node wins.
//! A rule that overwrites a whole construct reports that span up front so
//! the token scan stays out of it; the rule renames the text it copies.

mod device_call;
mod launch;
mod shared;

use tracing::trace;

use super::{ConvertError, FileConverter, Stage, StageExt};
use crate::convert::ledger::LedgerError;
use crate::frontend::AstNode;
use crate::span::Span;

pub(crate) use device_call::DeviceCallRule;
pub(crate) use launch::KernelLaunchRule;
pub(crate) use shared::SharedArrayRule;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RuleOutcome {
    Claimed,
    Declined,
}

pub(crate) trait SyntaxRule: Sync {
    fn name(&self) -> &'static str;

    /// The span this rule will overwrite wholesale for `node`, if any.
    /// Must agree with what [`SyntaxRule::apply`] does.
    fn subsumes(&self, _node: &AstNode, _cx: &FileConverter<'_>) -> Option<Span> {
        None
    }

    fn apply(
        &self,
        node: &AstNode,
        cx: &mut FileConverter<'_>,
    ) -> Result<RuleOutcome, LedgerError>;
}

pub(crate) static RULES: [&dyn SyntaxRule; 3] = [&KernelLaunchRule, &SharedArrayRule, &DeviceCallRule];

pub(super) fn subsumed_spans(cx: &FileConverter<'_>, nodes: &[AstNode]) -> Vec<Span> {
    let mut spans: Vec<Span> = nodes
        .iter()
        .filter_map(|node| RULES.iter().find_map(|rule| rule.subsumes(node, cx)))
        .collect();
    spans.sort();
    spans.dedup();
    spans
}

pub(super) fn rewrite(cx: &mut FileConverter<'_>, node: &AstNode) -> Result<(), ConvertError> {
    for rule in RULES {
        let outcome = rule.apply(node, cx).at_stage(Stage::Rule(rule.name()))?;
        if outcome == RuleOutcome::Claimed {
            trace!(rule = rule.name(), "claimed");
            break;
        }
    }
    Ok(())
}
