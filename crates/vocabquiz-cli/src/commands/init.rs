//! The `vocabquiz init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("vocabquiz.toml").exists() {
        println!("vocabquiz.toml already exists, skipping.");
    } else {
        std::fs::write("vocabquiz.toml", SAMPLE_CONFIG)?;
        println!("Created vocabquiz.toml");
    }

    std::fs::create_dir_all("data")?;
    let sample_path = Path::new("data/sample.csv");
    if sample_path.exists() {
        println!("data/sample.csv already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_WORDS)?;
        println!("Created data/sample.csv");
    }

    println!("\nNext steps:");
    println!("  1. Add your own word lists to data/ as CSV (word,translation[,phonetic])");
    println!("  2. Run: vocabquiz exam --sets sample.csv --output exam.json");
    println!("  3. Run: vocabquiz submit --results results.json");
    println!("  4. Run: vocabquiz stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# vocabquiz configuration

data_dir = "data"

[store]
type = "sqlite"
path = "vocab.db"
busy_timeout_ms = 5000

[exam]
num_questions = 10
new_ratio_percent = 20.0
mistake_weight = 5.0
# seed = 42
"#;

const SAMPLE_WORDS: &str = "\
word,translation,phonetic
apple,蘋果,/ˈæp.əl/
banana,香蕉,/bəˈnɑː.nə/
cherry,櫻桃,/ˈtʃer.i/
grape,葡萄,/ɡreɪp/
lemon,檸檬,/ˈlem.ən/
orange,柳橙,/ˈɒr.ɪndʒ/
peach,桃子,/piːtʃ/
pear,梨子,/peər/
";
