//! vocabquiz-sources: vocabulary sources.
//!
//! Turns tabular files into `WordEntry` pools for the quiz engine.

pub mod csv_dir;

pub use csv_dir::{parse_words_str, CsvDirectorySource};
