//! Keyword acceptance and categorization — pure, I/O-free heuristics.

pub mod classifier;
pub mod validator;

pub use classifier::categorize;
pub use validator::is_valid_keyword;
