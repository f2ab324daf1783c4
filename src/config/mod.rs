use std::path::{Path, PathBuf};

use crate::rename::TargetFlavor;

/// Options resolved once per run and shared by every file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Which spelling family renamed names use.
    pub flavor: TargetFlavor,
    /// Print a statistics report after each file and for the whole run.
    pub print_stats: bool,
}

impl ConvertOptions {
    pub fn for_flavor(flavor: TargetFlavor) -> Self {
        Self {
            flavor,
            ..Self::default()
        }
    }
}

/// Where converted text goes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// `<input>.hip` next to the input.
    #[default]
    Sibling,
    /// An explicit path; only meaningful for a single input.
    File(PathBuf),
    /// Overwrite the input, optionally keeping `<input>.prehip`.
    InPlace { backup: bool },
    /// Convert, report, write nothing.
    None,
}

const OUTPUT_SUFFIX: &str = "hip";
const BACKUP_SUFFIX: &str = "prehip";

fn with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

impl OutputMode {
    /// The file converted text for `input` is written to, if any.
    pub fn output_path(&self, input: &Path) -> Option<PathBuf> {
        match self {
            OutputMode::Sibling => Some(with_suffix(input, OUTPUT_SUFFIX)),
            OutputMode::File(path) => Some(path.clone()),
            OutputMode::InPlace { .. } => Some(input.to_path_buf()),
            OutputMode::None => None,
        }
    }

    /// Where the original is copied before being overwritten, if anywhere.
    pub fn backup_path(&self, input: &Path) -> Option<PathBuf> {
        match self {
            OutputMode::InPlace { backup: true } => Some(with_suffix(input, BACKUP_SUFFIX)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.flavor, TargetFlavor::Hip);
        assert!(!opts.print_stats);
        assert_eq!(ConvertOptions::for_flavor(TargetFlavor::Roc).flavor, TargetFlavor::Roc);
    }

    #[test]
    fn test_output_paths() {
        let input = Path::new("src/kernel.cu");
        assert_eq!(
            OutputMode::Sibling.output_path(input),
            Some(PathBuf::from("src/kernel.cu.hip"))
        );
        assert_eq!(
            OutputMode::File(PathBuf::from("out.cpp")).output_path(input),
            Some(PathBuf::from("out.cpp"))
        );
        assert_eq!(OutputMode::None.output_path(input), None);
        assert_eq!(OutputMode::Sibling.backup_path(input), None);
    }

    #[test]
    fn test_inplace_backup() {
        let input = Path::new("kernel.cu");
        let keep = OutputMode::InPlace { backup: true };
        assert_eq!(keep.output_path(input), Some(PathBuf::from("kernel.cu")));
        assert_eq!(keep.backup_path(input), Some(PathBuf::from("kernel.cu.prehip")));
        assert_eq!(OutputMode::InPlace { backup: false }.backup_path(input), None);
    }
}
