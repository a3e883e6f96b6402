//! DWUG data fixtures

use std::fs;
use std::path::{Path, PathBuf};

use hlvgraph_kg::KgConfig;
use tempfile::TempDir;

pub const USES_HEADER: &str = "lemma\tpos\tdate\tgrouping\tidentifier\tdescription\tcontext\tindexes_target_token\tindexes_target_sentence\tcontext_tokenized\tindexes_target_token_tokenized\tindexes_target_sentence_tokenized";

pub const JUDGMENTS_HEADER: &str = "identifier1\tidentifier2\tannotator\tjudgment\tcomment\tlemma";

/// One `uses.csv` line: `"A {token} here."` with the token at offset 2
pub fn use_line(identifier: &str, token: &str, date: &str) -> String {
    let context = format!("A {} here.", token);
    let tokenized = format!("A {} here .", token);
    format!(
        "{lemma}\tNN\t{date}\t1\t{id}\t-\t{context}\t2:{end}\t0:{len}\t{tokenized}\t1\t0:4",
        lemma = token,
        date = date,
        id = identifier,
        context = context,
        end = 2 + token.len(),
        len = context.len(),
        tokenized = tokenized,
    )
}

/// One `judgments.csv` line
pub fn judgment_line(id1: &str, id2: &str, annotator: &str, judgment: &str) -> String {
    format!("{}\t{}\t{}\t{}\t-\tlemma", id1, id2, annotator, judgment)
}

/// A data root with a matching configuration whose outputs all live inside
/// the temporary directory
pub struct DwugFixture {
    pub dir: TempDir,
    pub config: KgConfig,
}

impl DwugFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path();
        let mut config = KgConfig {
            data_path: root.join("data"),
            ..KgConfig::default()
        };
        config.output.graph_dir = root.join("graphs");
        config.output.query_dir = root.join("query_results");
        config.output.resource_dir = root.join("resources");
        config.output.visualization_dir = root.join("visualizations");
        config.layout.iterations = 10;
        fs::create_dir_all(&config.data_path).expect("data dir");
        Self { dir, config }
    }

    pub fn data_path(&self) -> &Path {
        &self.config.data_path
    }

    pub fn item_dir(&self, item: &str) -> PathBuf {
        self.data_path().join(item)
    }

    pub fn write_item(&self, item: &str, uses: &[String], judgments: &[String]) {
        self.write_uses(item, uses);
        self.write_judgments(item, judgments);
    }

    pub fn write_uses(&self, item: &str, uses: &[String]) {
        write_table(&self.item_dir(item).join("uses.csv"), USES_HEADER, uses);
    }

    pub fn write_judgments(&self, item: &str, judgments: &[String]) {
        write_table(&self.item_dir(item).join("judgments.csv"), JUDGMENTS_HEADER, judgments);
    }

    /// The two-use, one-judgment item: s1 "foo", s2 "bar", annotator5 says 3
    pub fn write_single_judgment(&self, item: &str) {
        self.write_item(
            item,
            &[use_line("s1", "foo", "1850"), use_line("s2", "bar", "1851")],
            &[judgment_line("s1", "s2", "annotator5", "3")],
        );
    }

    pub fn with_single_judgment(self) -> Self {
        self.write_single_judgment("foo");
        self
    }
}

fn write_table(path: &Path, header: &str, lines: &[String]) {
    fs::create_dir_all(path.parent().expect("parent")).expect("item dir");
    let mut content = String::from(header);
    content.push('\n');
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).expect("write table");
}
