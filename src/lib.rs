pub mod api;
pub mod config;
pub mod convert;
pub mod diagnostic;
pub mod frontend;
pub mod rename;
pub mod stats;
pub mod syntax;

// Re-exports: short `crate::X` paths for the syntax layer
pub use syntax::lexer;
pub use syntax::source;
pub use syntax::span;

// Re-export public API: `hipify::convert_path()` etc.
pub use api::*;
pub use config::{ConvertOptions, OutputMode};
pub use convert::{ConvertError, FileConversion};
pub use rename::{RenameTables, TargetFlavor};
pub use stats::Statistics;
