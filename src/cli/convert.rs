use std::path::{Path, PathBuf};
use std::process;

use clap::Args;

use hipify::diagnostic::Diagnostic;
use hipify::{ConvertOptions, ConvertedFile, FileError, OutputMode, Statistics};

use super::{load_tables, resolve_cuda_files, resolve_flavor};

#[derive(Args)]
pub struct ConvertArgs {
    /// CUDA source files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Output file (single input only; default: <input>.hip)
    #[arg(short, long, conflicts_with_all = ["inplace", "no_output"])]
    pub output: Option<PathBuf>,
    /// Overwrite the input, keeping the original as <input>.prehip
    #[arg(long, conflicts_with = "no_output")]
    pub inplace: bool,
    /// With --inplace, do not keep a backup copy
    #[arg(long, requires = "inplace")]
    pub no_backup: bool,
    /// Convert and report without writing anything
    #[arg(long)]
    pub no_output: bool,
    /// Print conversion statistics per file and for the whole run
    #[arg(long)]
    pub print_stats: bool,
    /// Save run statistics to a JSON file
    #[arg(long, value_name = "PATH")]
    pub stats_json: Option<PathBuf>,
    /// Overlay a JSON rename table on the built-in one
    #[arg(long, value_name = "PATH")]
    pub renames: Option<PathBuf>,
    /// Emit ROC library spellings (rocblas, miopen, ...) instead of HIP ones
    #[arg(long)]
    pub roc: bool,
}

#[derive(Args)]
pub struct ExamineArgs {
    /// CUDA source files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Save run statistics to a JSON file
    #[arg(long, value_name = "PATH")]
    pub stats_json: Option<PathBuf>,
    /// Overlay a JSON rename table on the built-in one
    #[arg(long, value_name = "PATH")]
    pub renames: Option<PathBuf>,
    /// Count against ROC library spellings
    #[arg(long)]
    pub roc: bool,
}

/// `examine` is `convert --no-output --print-stats`.
pub fn cmd_examine(args: ExamineArgs) {
    let ExamineArgs {
        inputs,
        stats_json,
        renames,
        roc,
    } = args;
    cmd_convert(ConvertArgs {
        inputs,
        output: None,
        inplace: false,
        no_backup: false,
        no_output: true,
        print_stats: true,
        stats_json,
        renames,
        roc,
    });
}

pub fn cmd_convert(args: ConvertArgs) {
    let files = resolve_cuda_files(&args.inputs);
    if files.is_empty() {
        eprintln!("No CUDA sources found");
        return;
    }

    let mode = match (&args.output, args.inplace, args.no_output) {
        (Some(_), _, _) if files.len() > 1 => {
            eprintln!("error: -o/--output needs exactly one input file");
            process::exit(1);
        }
        (Some(path), _, _) => OutputMode::File(path.clone()),
        (None, true, _) => OutputMode::InPlace {
            backup: !args.no_backup,
        },
        (None, false, true) => OutputMode::None,
        (None, false, false) => OutputMode::Sibling,
    };

    let tables = load_tables(args.renames.as_deref());
    let options = ConvertOptions {
        flavor: resolve_flavor(args.roc),
        print_stats: args.print_stats,
    };

    let report = hipify::convert_batch(&files, &tables, &options);

    let mut failed = report.failed();
    for result in &report.results {
        match result {
            Ok(file) => {
                if !report_file(file, &mode, &options) {
                    failed += 1;
                }
            }
            Err(e) => report_failure(e),
        }
    }

    if options.print_stats && files.len() > 1 {
        eprint!("{}", report.stats.render("all files"));
    }

    let stats_saved = match &args.stats_json {
        Some(path) => save_stats(&report.stats, path),
        None => true,
    };

    if failed > 0 {
        eprintln!("error: {} of {} files failed", failed, files.len());
        process::exit(1);
    }
    if !stats_saved {
        process::exit(1);
    }
}

/// Render diagnostics and write the output. Returns false if writing failed.
fn report_file(file: &ConvertedFile, mode: &OutputMode, options: &ConvertOptions) -> bool {
    let filename = file.path.to_string_lossy();
    for diag in &file.conversion.diagnostics {
        diag.render(&filename, &file.source);
    }

    let written = match hipify::write_output(file, mode) {
        Ok(Some(target)) => {
            eprintln!("Converted: {} -> {}", file.path.display(), target.display());
            true
        }
        Ok(None) => {
            eprintln!("Examined: {}", file.path.display());
            true
        }
        Err(e) => {
            eprintln!("error: {}", e);
            false
        }
    };

    if options.print_stats {
        eprint!("{}", file.conversion.stats.render(&filename));
    }
    written
}

fn report_failure(error: &FileError) {
    match error {
        FileError::Convert { path, text, source } => {
            let diag = Diagnostic::error(source.to_string(), source.span())
                .with_note("the file was left unconverted".to_string());
            diag.render(&path.to_string_lossy(), text);
        }
        other => eprintln!("error: {}", other),
    }
}

/// Returns false if the file could not be written.
fn save_stats(stats: &Statistics, path: &Path) -> bool {
    match std::fs::write(path, stats.to_json()) {
        Ok(()) => {
            eprintln!("Saved statistics to {}", path.display());
            true
        }
        Err(e) => {
            eprintln!("error: cannot write '{}': {}", path.display(), e);
            false
        }
    }
}
