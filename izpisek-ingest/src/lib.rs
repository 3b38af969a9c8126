//! izpisek-ingest: statement text sources and the bank-specific line parser.

pub mod parsers;
pub mod source;

pub use parsers::bks_si::{parse_bks_si_text, parse_bks_si_text_with_stats, ParseStats};
pub use source::{ExtractError, PlainTextFile, TextSource};
