use std::path::PathBuf;
use std::process;

use clap::Args;

use super::{load_tables, resolve_flavor};

#[derive(Args)]
pub struct LookupArgs {
    /// CUDA identifiers or header names to look up
    #[arg(required = true)]
    pub names: Vec<String>,
    /// Overlay a JSON rename table on the built-in one
    #[arg(long, value_name = "PATH")]
    pub renames: Option<PathBuf>,
    /// Show the ROC library spelling instead of the HIP one
    #[arg(long)]
    pub roc: bool,
}

pub fn cmd_lookup(args: LookupArgs) {
    let LookupArgs {
        names,
        renames,
        roc,
    } = args;
    let tables = load_tables(renames.as_deref());
    let flavor = resolve_flavor(roc);

    let mut missing = false;
    for name in &names {
        let found = tables.lookup(name);
        if found.is_empty() {
            println!("{}: no entry", name);
            missing = true;
            continue;
        }
        for (table, entry) in found {
            let target = if entry.is_unsupported(flavor) {
                format!("unsupported in {}", flavor)
            } else if entry.target(flavor).is_empty() {
                "(removed)".to_string()
            } else {
                entry.target(flavor).to_string()
            };
            println!(
                "{} -> {}  [{}, {}, {}, {:?}]",
                name,
                target,
                table,
                entry.kind.name(),
                entry.api.name(),
                entry.support
            );
        }
    }

    if missing {
        process::exit(1);
    }
}
