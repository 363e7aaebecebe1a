//! A directory of CSV vocabulary sets.
//!
//! Each `*.csv` file is one set, named by its file name. Rows are
//! `word,translation[,phonetic]`; an optional header row is skipped.

use std::path::{Path, PathBuf};

use vocabquiz_core::error::{QuizError, Result};
use vocabquiz_core::model::WordEntry;
use vocabquiz_core::traits::VocabularySource;

/// First-cell values that mark a header row.
const HEADER_CELLS: &[&str] = &["word", "english", "英文", "en"];

/// Vocabulary sets stored as CSV files in one directory.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    data_dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve `name` inside the data directory, refusing anything that is
    /// not a bare file name.
    fn set_path(&self, name: &str) -> Option<PathBuf> {
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != ".."
            && Path::new(name).file_name().and_then(|f| f.to_str()) == Some(name);
        plain.then(|| self.data_dir.join(name))
    }
}

impl VocabularySource for CsvDirectorySource {
    fn list_sets(&self) -> Result<Vec<String>> {
        std::fs::create_dir_all(&self.data_dir).map_err(QuizError::storage)?;

        let mut sets = Vec::new();
        for entry in std::fs::read_dir(&self.data_dir).map_err(QuizError::storage)? {
            let path = entry.map_err(QuizError::storage)?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if !is_csv || !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                sets.push(name.to_string());
            }
        }
        sets.sort();
        Ok(sets)
    }

    fn load_words(&self, name: &str) -> Result<Vec<WordEntry>> {
        let path = match self.set_path(name) {
            Some(path) if path.is_file() => path,
            _ => return Err(QuizError::VocabularyNotFound(name.to_string())),
        };

        let content = std::fs::read_to_string(&path).map_err(|e| QuizError::MalformedVocabulary {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let words = parse_words_str(name, &content)?;
        tracing::debug!(set = name, words = words.len(), "loaded vocabulary set");
        Ok(words)
    }
}

/// Parse CSV text into word entries.
///
/// Rows missing a word or translation, and rows where neither cell contains
/// an ASCII letter, are skipped.
pub fn parse_words_str(name: &str, content: &str) -> Result<Vec<WordEntry>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut words = Vec::new();
    let mut skipped = 0usize;
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| QuizError::MalformedVocabulary {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let word = record.get(0).unwrap_or_default().trim();
        if index == 0 && is_header(word) {
            continue;
        }
        let translation = record.get(1).unwrap_or_default().trim();
        let phonetic = record.get(2).unwrap_or_default().trim();

        let has_letter = |s: &str| s.chars().any(|c| c.is_ascii_alphabetic());
        if word.is_empty() || translation.is_empty() || !(has_letter(word) || has_letter(translation))
        {
            skipped += 1;
            continue;
        }

        let translation = if phonetic.is_empty() {
            translation.to_string()
        } else {
            format!("{translation} {phonetic}")
        };
        words.push(WordEntry::new(word, translation));
    }

    if skipped > 0 {
        tracing::warn!(set = name, skipped, "skipped invalid vocabulary rows");
    }
    Ok(words)
}

fn is_header(first_cell: &str) -> bool {
    let lowered = first_cell.to_lowercase();
    HEADER_CELLS.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn parses_rows_and_skips_header() {
        let words = parse_words_str(
            "fruit.csv",
            "English,中文\napple,蘋果\nbanana,香蕉,/bəˈnɑːnə/\n",
        )
        .unwrap();
        assert_eq!(
            words,
            vec![
                WordEntry::new("apple", "蘋果"),
                WordEntry::new("banana", "香蕉 /bəˈnɑːnə/"),
            ]
        );
    }

    #[test]
    fn header_only_checked_on_first_row() {
        let words = parse_words_str("s.csv", "apple,蘋果\nword,字\n").unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1], WordEntry::new("word", "字"));
    }

    #[test]
    fn skips_invalid_rows() {
        let content = "\
apple,蘋果
,空
pear,
蘋果,苹果
  kiwi  ,  奇異果
single
";
        let words = parse_words_str("s.csv", content).unwrap();
        let names: Vec<&str> = words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["apple", "kiwi"]);
        assert_eq!(words[1].translation, "奇異果");
    }

    #[test]
    fn strips_byte_order_mark() {
        let words = parse_words_str("s.csv", "\u{feff}word,translation\ncat,貓\n").unwrap();
        assert_eq!(words, vec![WordEntry::new("cat", "貓")]);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let words = parse_words_str("s.csv", "run,\"跑, 奔跑\"\n").unwrap();
        assert_eq!(words[0].translation, "跑, 奔跑");
    }

    #[test]
    fn lists_csv_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.csv", "cat,貓\n");
        write(dir.path(), "a.CSV", "dog,狗\n");
        write(dir.path(), "notes.txt", "ignored");
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let source = CsvDirectorySource::new(dir.path());
        assert_eq!(source.list_sets().unwrap(), vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn list_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let source = CsvDirectorySource::new(&data);
        assert!(source.list_sets().unwrap().is_empty());
        assert!(data.is_dir());
    }

    #[test]
    fn load_missing_set_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectorySource::new(dir.path());
        let err = source.load_words("missing.csv").unwrap_err();
        assert!(matches!(err, QuizError::VocabularyNotFound(name) if name == "missing.csv"));
    }

    #[test]
    fn refuses_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();
        write(dir.path(), "secret.csv", "key,value\n");

        let source = CsvDirectorySource::new(&data);
        for name in ["../secret.csv", "..", ".", "", "sub/secret.csv", "..\\secret.csv"] {
            let err = source.load_words(name).unwrap_err();
            assert!(matches!(err, QuizError::VocabularyNotFound(_)), "{name}");
        }
    }

    #[test]
    fn loads_and_concatenates_sets() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "fruit.csv", "word,translation\napple,蘋果\n");
        write(dir.path(), "pets.csv", "cat,貓\ndog,狗\n");

        let source = CsvDirectorySource::new(dir.path());
        let pool = vocabquiz_core::traits::load_pool(
            &source,
            &["pets.csv".to_string(), "fruit.csv".to_string()],
        )
        .unwrap();
        let names: Vec<&str> = pool.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(names, vec!["cat", "dog", "apple"]);
    }
}
