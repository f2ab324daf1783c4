pub mod lexer;
pub mod source;
pub mod span;
