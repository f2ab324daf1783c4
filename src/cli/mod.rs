pub mod convert;
pub mod lookup;

use std::path::{Path, PathBuf};
use std::process;

use hipify::{RenameTables, TargetFlavor};

/// Source extensions picked up when an input is a directory.
const CUDA_EXTENSIONS: &[&str] = &["cu", "cuh", "cpp", "cc", "cxx", "h", "hpp", "inl"];

/// Built-in tables, overlaid with a user table if one is given. Exits on error.
pub fn load_tables(renames: Option<&Path>) -> RenameTables {
    let mut tables = RenameTables::builtin();
    if let Some(path) = renames {
        match RenameTables::load(path) {
            Ok(user) => tables.extend(user),
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        }
    }
    tables
}

pub fn resolve_flavor(roc: bool) -> TargetFlavor {
    if roc {
        TargetFlavor::Roc
    } else {
        TargetFlavor::Hip
    }
}

/// Expand inputs into a list of files. Directories are walked recursively;
/// files named explicitly are taken whatever their extension.
pub fn resolve_cuda_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            collect_cuda_files(input, &mut found);
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}

fn collect_cuda_files(dir: &Path, result: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        // Skip hidden directories and build output
        if name.starts_with('.') || name == "build" || name == "target" {
            continue;
        }

        if path.is_dir() {
            collect_cuda_files(&path, result);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| CUDA_EXTENSIONS.contains(&e))
        {
            result.push(path);
        }
    }
}
