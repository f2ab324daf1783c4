//! `k<<<grid, block, shmem, stream>>>(args...)` becomes
//! `hipLaunchKernelGGL(k, dim3(grid), dim3(block), shmem, stream, args...)`.

use super::{RuleOutcome, SyntaxRule};
use crate::convert::ledger::LedgerError;
use crate::convert::{FileConverter, Replacement};
use crate::frontend::{AstNode, Expr, KernelLaunch, SourceRange};
use crate::rename::{ApiFamily, ConvKind, SupportTier};
use crate::span::Span;

pub(crate) struct KernelLaunchRule;

/// Counted under the runtime launch entry point.
const STATS_NAME: &str = "cudaLaunchKernel";
const LAUNCH_MACRO: &str = "hipLaunchKernelGGL";

/// Read spans of every piece a launch is rebuilt from.
struct LaunchPlan {
    write: Span,
    attribution: u32,
    callee: Span,
    template: bool,
    grid: Span,
    block: Span,
    /// Shared-memory size and stream; `None` when left to the default.
    optional: [Option<Span>; 2],
    args: Option<Span>,
}

impl LaunchPlan {
    fn build(launch: &KernelLaunch, cx: &FileConverter<'_>) -> Option<Self> {
        let callee = launch.callee.as_ref()?;
        let decl = launch.direct_callee.as_ref()?;
        if launch.config.len() != 4 {
            return None;
        }
        let r = cx.resolver();
        let read = |e: &Expr| r.read_span(e.range);
        let optional = |e: &Expr| -> Option<Option<Span>> {
            if e.defaulted {
                Some(None)
            } else {
                read(e).map(Some)
            }
        };
        let args = match (launch.args.first(), launch.args.last()) {
            (Some(first), Some(last)) => {
                Some(r.read_span(SourceRange::new(first.range.begin, last.range.end))?)
            }
            _ => None,
        };
        Some(Self {
            write: r.write_span(launch.range)?,
            attribution: launch.range.begin.expansion_offset(),
            callee: read(callee)?,
            template: decl.template_instantiation,
            grid: read(&launch.config[0])?,
            block: read(&launch.config[1])?,
            optional: [optional(&launch.config[2])?, optional(&launch.config[3])?],
            args,
        })
    }

    fn render(&self, cx: &mut FileConverter<'_>) -> String {
        let file = cx.file;
        let mut copy = |span: Span| {
            let text = file.source.slice(span).unwrap_or_default();
            cx.rename_text(text, span.start)
        };
        let callee = copy(self.callee);
        let mut out = format!("{}(", LAUNCH_MACRO);
        if self.template {
            out.push_str(&format!("({})", callee));
        } else {
            out.push_str(&callee);
        }
        out.push_str(&format!(", dim3({}), dim3({})", copy(self.grid), copy(self.block)));
        for span in self.optional {
            let text = span.map(&mut copy).unwrap_or_else(|| "0".to_string());
            out.push_str(", ");
            out.push_str(&text);
        }
        if let Some(args) = self.args {
            out.push_str(", ");
            out.push_str(&copy(args));
        }
        out.push(')');
        out
    }
}

impl SyntaxRule for KernelLaunchRule {
    fn name(&self) -> &'static str {
        "kernel-launch"
    }

    fn subsumes(&self, node: &AstNode, cx: &FileConverter<'_>) -> Option<Span> {
        let AstNode::KernelLaunch(launch) = node else {
            return None;
        };
        LaunchPlan::build(launch, cx).map(|plan| plan.write)
    }

    fn apply(
        &self,
        node: &AstNode,
        cx: &mut FileConverter<'_>,
    ) -> Result<RuleOutcome, LedgerError> {
        let AstNode::KernelLaunch(launch) = node else {
            return Ok(RuleOutcome::Declined);
        };
        let Some(plan) = LaunchPlan::build(launch, cx) else {
            return Ok(RuleOutcome::Declined);
        };
        let text = plan.render(cx);
        cx.insert_replacement(Replacement::new(plan.write, text), plan.attribution)?;
        cx.stats.record(
            STATS_NAME,
            ConvKind::Execution,
            ApiFamily::Runtime,
            SupportTier::Full,
            false,
        );
        Ok(RuleOutcome::Claimed)
    }
}
