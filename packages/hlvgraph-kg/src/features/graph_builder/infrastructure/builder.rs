// Graph Builder - rows → annotation graph
//
// For every judgment row, in item order then row order:
// 1. resolve both use identifiers against the uses table
// 2. mint and write the two word occurrences and their sentences
// 3. write the annotation with its validated category
// 4. write the annotator on first sight and link it
// 5. advance the annotation counter

use std::collections::BTreeMap;

use hlvgraph_storage::{GraphStore, OxigraphStore};
use tracing::{debug, info};

use super::node_writer::NodeWriter;
use crate::errors::Result;
use crate::features::graph_builder::domain::{
    Annotation, Annotator, BuildContext, BuildStats, Sentence, WordOccurrence,
};
use crate::features::loader::{LexicalItemRows, UsesIndex};
use crate::shared::models::{Category, JudgmentRecord, TsvRecord, UseRecord};
use crate::shared::utils::{IdGenerator, WordKeyScheme};

/// Store plus what went into it
#[derive(Debug)]
pub struct BuiltGraph {
    pub store: OxigraphStore,
    pub stats: BuildStats,
}

#[derive(Debug, Clone)]
pub struct GraphBuilder {
    language: String,
    scheme: WordKeyScheme,
}

impl GraphBuilder {
    pub fn new(language: impl Into<String>, scheme: WordKeyScheme) -> Self {
        Self {
            language: language.into(),
            scheme,
        }
    }

    /// Build a fresh in-memory graph. Items are processed in key order.
    pub fn build(
        &self,
        dataset_name: &str,
        items: &BTreeMap<String, LexicalItemRows>,
    ) -> Result<BuiltGraph> {
        let mut store = OxigraphStore::new()?;
        let stats = self.build_into(&mut store, dataset_name, items)?;
        Ok(BuiltGraph { store, stats })
    }

    pub fn build_into<S: GraphStore>(
        &self,
        store: &mut S,
        dataset_name: &str,
        items: &BTreeMap<String, LexicalItemRows>,
    ) -> Result<BuildStats> {
        let mut ctx = BuildContext::new(self.scheme);
        let mut writer = NodeWriter::new(store, dataset_name, &self.language);
        writer.write_dataset()?;

        for item in items.values() {
            self.add_item(&mut ctx, &mut writer, item)?;
            ctx.finish_item();
        }
        drop(writer);

        let mut stats = ctx.into_stats();
        stats.triples = store.len()?;
        info!(
            dataset = dataset_name,
            items = stats.lexical_items,
            words = stats.word_occurrences,
            sentences = stats.sentences,
            annotations = stats.annotations,
            annotators = stats.annotators,
            triples = stats.triples,
            "graph built"
        );
        Ok(stats)
    }

    fn add_item<S: GraphStore>(
        &self,
        ctx: &mut BuildContext,
        writer: &mut NodeWriter<'_, S>,
        item: &LexicalItemRows,
    ) -> Result<()> {
        let index = item.uses_index();

        for (row_idx, judgment) in item.judgments.iter().enumerate() {
            let location = format!(
                "{}/{} line {}",
                item.name,
                JudgmentRecord::FILE_NAME,
                row_idx + 2
            );
            self.add_judgment(ctx, writer, item, &index, judgment, &location)?;
        }

        debug!(
            item = %item.name,
            judgments = item.judgments.len(),
            next_annotation_id = ctx.next_annotation_id(),
            "lexical item added"
        );
        Ok(())
    }

    fn add_judgment<S: GraphStore>(
        &self,
        ctx: &mut BuildContext,
        writer: &mut NodeWriter<'_, S>,
        item: &LexicalItemRows,
        index: &UsesIndex<'_>,
        judgment: &JudgmentRecord,
        location: &str,
    ) -> Result<()> {
        let use1 = index.resolve(&judgment.identifier1, location)?;
        let use2 = index.resolve(&judgment.identifier2, location)?;
        let category = Category::parse(&judgment.judgment, location)?;
        let annotator = Annotator {
            id: IdGenerator::annotator_id(&judgment.annotator)?,
            name: judgment.annotator.clone(),
        };

        let word1 = self.add_occurrence(ctx, writer, item, use1)?;
        let word2 = self.add_occurrence(ctx, writer, item, use2)?;

        let id = ctx.take_annotation_id();
        let annotation = Annotation {
            id,
            label: IdGenerator::annotation_label(&word1.id, &word2.id),
            category,
            comment: judgment.comment.clone(),
            words: [word1.id, word2.id],
            annotator_id: annotator.id.clone(),
        };
        writer.write_annotation(&annotation)?;

        if ctx.register_annotator(&annotator) {
            writer.write_annotator(&annotator)?;
        }
        Ok(())
    }

    fn add_occurrence<S: GraphStore>(
        &self,
        ctx: &mut BuildContext,
        writer: &mut NodeWriter<'_, S>,
        item: &LexicalItemRows,
        row: &UseRecord,
    ) -> Result<WordOccurrence> {
        let location = format!(
            "{}/{} identifier '{}'",
            item.name,
            UseRecord::FILE_NAME,
            row.identifier
        );

        let surface = row.target_token(&location)?;
        let token_span = row.token_range(&location)?;
        let sentence_span = row.sentence_range(&location)?;
        let sentence_id = IdGenerator::sentence_id(&row.identifier);

        let word = WordOccurrence {
            id: IdGenerator::word_id(ctx.scheme(), surface, &sentence_id, token_span),
            surface: surface.to_string(),
            lemma: item.name.clone(),
            pos_tag: row.pos.clone(),
            span: token_span,
            sentence_id: sentence_id.clone(),
        };

        if ctx.register_word(&word.id, &sentence_id) {
            writer.write_word(&word)?;
        }
        if ctx.register_sentence(&sentence_id) {
            writer.write_sentence(&Sentence {
                id: sentence_id.clone(),
                text: row.context.clone(),
                year: row.date.clone(),
                span: sentence_span,
            })?;
        }
        writer.link_reference_context(&word.id, &sentence_id)?;

        Ok(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use hlvgraph_storage::{vocab, Literal, Term};

    fn use_row(identifier: &str, token: &str) -> UseRecord {
        let context = format!("A {} here.", token);
        UseRecord {
            identifier: identifier.into(),
            context_tokenized: format!("A {} here .", token),
            indexes_target_token: format!("2:{}", 2 + token.len()),
            indexes_target_token_tokenized: "1".into(),
            indexes_target_sentence: format!("0:{}", context.len()),
            context,
            date: "1850".into(),
            pos: "NN".into(),
        }
    }

    fn judgment(id1: &str, id2: &str, value: &str, annotator: &str) -> JudgmentRecord {
        JudgmentRecord {
            identifier1: id1.into(),
            identifier2: id2.into(),
            judgment: value.into(),
            comment: "".into(),
            annotator: annotator.into(),
        }
    }

    fn items(item: LexicalItemRows) -> BTreeMap<String, LexicalItemRows> {
        let mut map = BTreeMap::new();
        map.insert(item.name.clone(), item);
        map
    }

    #[test]
    fn test_single_judgment() {
        let mut item = LexicalItemRows::new("foo");
        item.uses = vec![use_row("s1", "foo"), use_row("s2", "bar")];
        item.judgments = vec![judgment("s1", "s2", "3", "annotator5")];

        let built = GraphBuilder::new("en", WordKeyScheme::SentenceId)
            .build("dwug_en", &items(item))
            .unwrap();

        assert_eq!(built.stats.word_occurrences, 2);
        assert_eq!(built.stats.sentences, 2);
        assert_eq!(built.stats.annotations, 1);
        assert_eq!(built.stats.annotators, 1);
        assert_eq!(built.stats.next_annotation_id, 2);

        let annotation = vocab::HLV_ANNOTATION.term("1");
        assert_eq!(
            built
                .store
                .objects(&annotation, vocab::rdfs::LABEL)
                .unwrap(),
            vec![Term::from(Literal::string("foo_s1_bar_s2"))]
        );
        assert_eq!(
            built
                .store
                .objects(&annotation, vocab::rdaio::HAS_ANNOTATOR)
                .unwrap(),
            vec![vocab::HLV_ANNOTATOR.term("5")]
        );
    }

    #[test]
    fn test_repeated_sentence_written_once() {
        let mut item = LexicalItemRows::new("foo");
        item.uses = vec![use_row("s1", "foo"), use_row("s2", "foo"), use_row("s3", "foo")];
        item.judgments = vec![
            judgment("s1", "s2", "4", "annotator1"),
            judgment("s1", "s3", "2", "annotator1"),
            judgment("s1", "s2", "3", "annotator2"),
        ];

        let built = GraphBuilder::new("en", WordKeyScheme::SentenceId)
            .build("d", &items(item))
            .unwrap();

        assert_eq!(built.stats.sentences, 3);
        assert_eq!(built.stats.word_occurrences, 3);
        assert_eq!(built.stats.annotations, 3);
        assert_eq!(built.stats.annotators, 2);

        let s1 = vocab::HLV_SENTENCE.term("s1");
        assert_eq!(
            built.store.objects(&s1, vocab::nif::IS_STRING).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        let mut item = LexicalItemRows::new("foo");
        item.uses = vec![use_row("s1", "foo")];
        item.judgments = vec![judgment("s1", "s9", "3", "annotator5")];

        let err = GraphBuilder::new("en", WordKeyScheme::SentenceId)
            .build("d", &items(item))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert!(err.to_string().contains("foo/judgments.csv line 2"));
    }

    #[test]
    fn test_unrecognized_category() {
        let mut item = LexicalItemRows::new("foo");
        item.uses = vec![use_row("s1", "foo"), use_row("s2", "bar")];
        item.judgments = vec![judgment("s1", "s2", "7", "annotator5")];

        let err = GraphBuilder::new("en", WordKeyScheme::SentenceId)
            .build("d", &items(item))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_offsets_scheme_merges_same_position() {
        // same surface, same offsets, different sentences
        let mut item = LexicalItemRows::new("foo");
        let mut second = use_row("s2", "foo");
        second.context = "A foo there.".into();
        item.uses = vec![use_row("s1", "foo"), second];
        item.judgments = vec![judgment("s1", "s2", "4", "annotator5")];

        let built = GraphBuilder::new("en", WordKeyScheme::Offsets)
            .build("d", &items(item))
            .unwrap();
        assert_eq!(built.stats.word_occurrences, 1);
        assert_eq!(built.stats.sentences, 2);
        assert_eq!(built.stats.annotations, 1);

        let word = vocab::HLV_WORD.term("foo_2_5");
        let mut contexts = built
            .store
            .objects(&word, vocab::nif::REFERENCE_CONTEXT)
            .unwrap();
        contexts.sort();
        assert_eq!(
            contexts,
            vec![vocab::HLV_SENTENCE.term("s1"), vocab::HLV_SENTENCE.term("s2")]
        );
        // attributes written once
        assert_eq!(
            built.store.objects(&word, vocab::nif::BEGIN_INDEX).unwrap().len(),
            1
        );

        let annotation = vocab::HLV_ANNOTATION.term("1");
        assert_eq!(
            built
                .store
                .subjects(vocab::nif::ANNOTATION, &annotation)
                .unwrap(),
            vec![word]
        );
    }

    #[test]
    fn test_offsets_scheme_distinct_offsets() {
        let mut item = LexicalItemRows::new("foo");
        let mut second = use_row("s2", "foo");
        second.indexes_target_token = "10:13".into();
        item.uses = vec![use_row("s1", "foo"), second];
        item.judgments = vec![judgment("s1", "s2", "4", "annotator5")];

        let built = GraphBuilder::new("en", WordKeyScheme::Offsets)
            .build("d", &items(item))
            .unwrap();
        let annotation = vocab::HLV_ANNOTATION.term("1");
        assert_eq!(
            built
                .store
                .objects(&annotation, vocab::rdfs::LABEL)
                .unwrap(),
            vec![Term::from(Literal::string("foo_2_5_foo_10_13"))]
        );
    }
}
