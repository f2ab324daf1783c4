//! Rename tables: CUDA names and what they become in HIP.
//!
//! Tables are plain data. One [`RenameTable`] type serves every category
//! (identifiers, headers, device-side call targets); the kind of construct
//! an entry describes travels with the entry, not with the table it sits in.
//! Adding a mapping is a data change.

mod builtin;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Syntactic category of a renamed construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvKind {
    Version,
    Init,
    Device,
    Context,
    Module,
    Memory,
    Addressing,
    Stream,
    Event,
    Execution,
    Error,
    Type,
    Literal,
    Numeric,
    Math,
    DeviceFunc,
    /// Header with a replacement but no mandatory-family role.
    Include,
    /// The main header of an API family; at most one survives per file.
    IncludeMain,
    Other,
}

impl ConvKind {
    pub fn name(self) -> &'static str {
        match self {
            ConvKind::Version => "version",
            ConvKind::Init => "init",
            ConvKind::Device => "device",
            ConvKind::Context => "context",
            ConvKind::Module => "module",
            ConvKind::Memory => "memory",
            ConvKind::Addressing => "addressing",
            ConvKind::Stream => "stream",
            ConvKind::Event => "event",
            ConvKind::Execution => "execution",
            ConvKind::Error => "error",
            ConvKind::Type => "type",
            ConvKind::Literal => "literal",
            ConvKind::Numeric => "numeric",
            ConvKind::Math => "math",
            ConvKind::DeviceFunc => "device_func",
            ConvKind::Include => "include",
            ConvKind::IncludeMain => "include_cuda_main_header",
            ConvKind::Other => "other",
        }
    }
}

/// The CUDA library an entry comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiFamily {
    Driver,
    Runtime,
    Blas,
    Rand,
    Dnn,
    Fft,
    Complex,
    Sparse,
}

impl ApiFamily {
    pub fn name(self) -> &'static str {
        match self {
            ApiFamily::Driver => "CUDA Driver API",
            ApiFamily::Runtime => "CUDA RT API",
            ApiFamily::Blas => "CUBLAS API",
            ApiFamily::Rand => "CURAND API",
            ApiFamily::Dnn => "CUDNN API",
            ApiFamily::Fft => "CUFFT API",
            ApiFamily::Complex => "cuComplex API",
            ApiFamily::Sparse => "CUSPARSE API",
        }
    }
}

/// How well the target supports an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportTier {
    #[default]
    Full,
    Partial,
    /// Only the ROC spelling exists.
    HipUnsupported,
    /// Only the HIP spelling exists.
    RocUnsupported,
    Unsupported,
}

/// Which spelling a run produces; resolved once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFlavor {
    #[default]
    Hip,
    Roc,
}

impl fmt::Display for TargetFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFlavor::Hip => write!(f, "HIP"),
            TargetFlavor::Roc => write!(f, "ROC"),
        }
    }
}

impl std::str::FromStr for TargetFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "hip" => Ok(TargetFlavor::Hip),
            "roc" => Ok(TargetFlavor::Roc),
            other => Err(format!("unknown target flavor '{}' (expected hip or roc)", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    /// HIP spelling. Empty for headers that have no counterpart.
    pub hip: String,
    /// ROC library spelling; empty means "same as `hip`".
    #[serde(default)]
    pub roc: String,
    #[serde(default = "default_kind")]
    pub kind: ConvKind,
    #[serde(default = "default_api")]
    pub api: ApiFamily,
    #[serde(default)]
    pub support: SupportTier,
}

fn default_kind() -> ConvKind {
    ConvKind::Other
}

fn default_api() -> ApiFamily {
    ApiFamily::Runtime
}

impl RenameEntry {
    pub fn new(hip: &str, kind: ConvKind, api: ApiFamily) -> Self {
        Self {
            hip: hip.to_string(),
            roc: String::new(),
            kind,
            api,
            support: SupportTier::Full,
        }
    }

    pub fn with_roc(mut self, roc: &str) -> Self {
        self.roc = roc.to_string();
        self
    }

    pub fn with_support(mut self, support: SupportTier) -> Self {
        self.support = support;
        self
    }

    /// The spelling to emit for `flavor`.
    pub fn target(&self, flavor: TargetFlavor) -> &str {
        match flavor {
            TargetFlavor::Roc if !self.roc.is_empty() => &self.roc,
            _ => &self.hip,
        }
    }

    pub fn is_unsupported(&self, flavor: TargetFlavor) -> bool {
        match self.support {
            SupportTier::Full | SupportTier::Partial => false,
            SupportTier::Unsupported => true,
            SupportTier::HipUnsupported => flavor == TargetFlavor::Hip,
            SupportTier::RocUnsupported => flavor == TargetFlavor::Roc,
        }
    }
}

/// Name → entry map with O(1) lookup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameTable {
    entries: HashMap<String, RenameEntry>,
}

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RenameEntry> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: &str, entry: RenameEntry) -> Option<RenameEntry> {
        self.entries.insert(name.to_string(), entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenameEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overlay `other` on top of `self`; entries in `other` win.
    pub fn extend(&mut self, other: RenameTable) {
        self.entries.extend(other.entries);
    }
}

impl FromIterator<(String, RenameEntry)> for RenameTable {
    fn from_iter<I: IntoIterator<Item = (String, RenameEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The three tables the engine consults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenameTables {
    /// Identifiers and string-literal words, matched by the raw token scan.
    #[serde(default)]
    pub identifiers: RenameTable,
    /// Header names, matched by include directives.
    #[serde(default)]
    pub headers: RenameTable,
    /// Callee names, matched only for device-side calls.
    #[serde(default)]
    pub device_functions: RenameTable,
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("cannot read rename table '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid rename table '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("rename table '{}': entry '{name}' has an empty target but is not a header", .path.display())]
    EmptyTarget { path: PathBuf, name: String },
}

impl RenameTables {
    /// The table shipped with the converter.
    pub fn builtin() -> Self {
        builtin::tables()
    }

    pub fn from_json(text: &str, path: &Path) -> Result<Self, TableError> {
        let tables: RenameTables = serde_json::from_str(text).map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tables.validate(path)?;
        Ok(tables)
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Only headers may map to nothing (they are dropped from the output).
    fn validate(&self, path: &Path) -> Result<(), TableError> {
        let identifier_tables = [&self.identifiers, &self.device_functions];
        for table in identifier_tables {
            for (name, entry) in table.iter() {
                let missing = [TargetFlavor::Hip, TargetFlavor::Roc]
                    .into_iter()
                    .any(|flavor| !entry.is_unsupported(flavor) && entry.target(flavor).is_empty());
                if missing {
                    return Err(TableError::EmptyTarget {
                        path: path.to_path_buf(),
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn extend(&mut self, other: RenameTables) {
        self.identifiers.extend(other.identifiers);
        self.headers.extend(other.headers);
        self.device_functions.extend(other.device_functions);
    }

    /// Look a name up in every table, identifiers first.
    pub fn lookup(&self, name: &str) -> Vec<(&'static str, &RenameEntry)> {
        let mut found = Vec::new();
        if let Some(e) = self.identifiers.get(name) {
            found.push(("identifier", e));
        }
        if let Some(e) = self.headers.get(name) {
            found.push(("header", e));
        }
        if let Some(e) = self.device_functions.get(name) {
            found.push(("device function", e));
        }
        found
    }
}
