// Node Writer - domain nodes → triples
//
// One method per node type. Each writes the full attribute set of its node;
// the builder decides whether a node is new.

use hlvgraph_storage::{vocab, GraphStore, Literal, Term, Triple};

use crate::errors::Result;
use crate::features::graph_builder::domain::{Annotation, Annotator, Sentence, WordOccurrence};
use crate::shared::utils::IdGenerator;

pub struct NodeWriter<'a, S: GraphStore> {
    store: &'a mut S,
    language: &'a str,
    dataset: Term,
}

impl<'a, S: GraphStore> NodeWriter<'a, S> {
    pub fn new(store: &'a mut S, dataset_name: &str, language: &'a str) -> Self {
        Self {
            store,
            language,
            dataset: vocab::HLV.term(dataset_name),
        }
    }

    fn add(&mut self, subject: &Term, predicate: &str, object: impl Into<Term>) -> Result<()> {
        self.store
            .insert(&Triple::new(subject.clone(), predicate, object))?;
        Ok(())
    }

    fn add_type(&mut self, subject: &Term, class: &str) -> Result<()> {
        self.add(subject, vocab::rdf::TYPE, Term::iri(class))
    }

    fn add_span(&mut self, subject: &Term, start: u32, end: u32) -> Result<()> {
        self.add(subject, vocab::nif::BEGIN_INDEX, Literal::integer(start.into()))?;
        self.add(subject, vocab::nif::END_INDEX, Literal::integer(end.into()))
    }

    pub fn write_dataset(&mut self) -> Result<()> {
        let dataset = self.dataset.clone();
        self.add_type(&dataset, vocab::schema::DATASET)
    }

    pub fn write_word(&mut self, word: &WordOccurrence) -> Result<()> {
        let node = vocab::HLV_WORD.term(&word.id);
        let dataset = self.dataset.clone();

        self.add_type(&node, vocab::nif::WORD)?;
        self.add(&node, vocab::nif::SOURCE_URL, dataset)?;
        self.add(&node, vocab::rdfs::LABEL, Literal::string(&word.id))?;
        self.add(
            &node,
            vocab::nif::ANCHOR_OF,
            Literal::lang_string(&word.surface, self.language),
        )?;
        self.add(&node, vocab::nif::LEMMA, Literal::string(&word.lemma))?;
        self.add(&node, vocab::nif::POS_TAG, Literal::string(&word.pos_tag))?;
        self.add_span(&node, word.span.start, word.span.end)
    }

    pub fn write_sentence(&mut self, sentence: &Sentence) -> Result<()> {
        let node = vocab::HLV_SENTENCE.term(&sentence.id);

        self.add_type(&node, vocab::nif::CONTEXT)?;
        self.add_type(&node, vocab::schema::OBSERVATION)?;
        self.add(&node, vocab::rdfs::LABEL, Literal::string(&sentence.id))?;
        self.add(
            &node,
            vocab::nif::IS_STRING,
            Literal::lang_string(&sentence.text, self.language),
        )?;
        self.add(
            &node,
            vocab::schema::OBSERVATION_DATE,
            Literal::year(&sentence.year),
        )?;
        self.add_span(&node, sentence.span.start, sentence.span.end)
    }

    /// `word nif:referenceContext sentence`
    pub fn link_reference_context(&mut self, word_id: &str, sentence_id: &str) -> Result<()> {
        let word = vocab::HLV_WORD.term(word_id);
        self.add(
            &word,
            vocab::nif::REFERENCE_CONTEXT,
            vocab::HLV_SENTENCE.term(sentence_id),
        )
    }

    /// The annotation node, both word links and the annotator link
    pub fn write_annotation(&mut self, annotation: &Annotation) -> Result<()> {
        let node = vocab::HLV_ANNOTATION.term(&IdGenerator::annotation_id(annotation.id));

        self.add_type(&node, vocab::nif::ANNOTATION_CLASS)?;
        self.add_type(&node, vocab::rdai::ITEM)?;
        self.add(&node, vocab::rdfs::LABEL, Literal::string(&annotation.label))?;
        self.add(
            &node,
            vocab::nif::CATEGORY,
            Literal::integer(annotation.category.code().into()),
        )?;
        self.add(
            &node,
            vocab::nif::CATEGORY,
            Literal::string(annotation.category.label()),
        )?;
        self.add(
            &node,
            vocab::rdai::NOTE,
            Literal::lang_string(&annotation.comment, self.language),
        )?;

        for word_id in &annotation.words {
            let word = vocab::HLV_WORD.term(word_id);
            self.add(&word, vocab::nif::ANNOTATION, node.clone())?;
        }

        self.add(
            &node,
            vocab::rdaio::HAS_ANNOTATOR,
            vocab::HLV_ANNOTATOR.term(&annotation.annotator_id),
        )
    }

    pub fn write_annotator(&mut self, annotator: &Annotator) -> Result<()> {
        let node = vocab::HLV_ANNOTATOR.term(&annotator.id);
        self.add_type(&node, vocab::rdaa::AGENT)?;
        self.add(&node, vocab::rdfs::LABEL, Literal::string(&annotator.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{Category, OffsetRange};
    use hlvgraph_storage::OxigraphStore;

    #[test]
    fn test_write_word_triples() {
        let mut store = OxigraphStore::new().unwrap();
        {
            let mut writer = NodeWriter::new(&mut store, "dwug_en", "en");
            writer
                .write_word(&WordOccurrence {
                    id: "foo_s1".into(),
                    surface: "foo".into(),
                    lemma: "foo_nn".into(),
                    pos_tag: "NN".into(),
                    span: OffsetRange::new(4, 7),
                    sentence_id: "s1".into(),
                })
                .unwrap();
        }

        let word = vocab::HLV_WORD.term("foo_s1");
        assert_eq!(
            store.objects(&word, vocab::nif::ANCHOR_OF).unwrap(),
            vec![Term::from(Literal::lang_string("foo", "en"))]
        );
        assert_eq!(
            store.objects(&word, vocab::nif::SOURCE_URL).unwrap(),
            vec![Term::iri("http://hlv.org/dwug_en")]
        );
        assert_eq!(
            store.objects(&word, vocab::nif::BEGIN_INDEX).unwrap(),
            vec![Term::from(Literal::integer(4))]
        );
        assert_eq!(store.len().unwrap(), 8);
    }

    #[test]
    fn test_write_annotation_links_both_words() {
        let mut store = OxigraphStore::new().unwrap();
        {
            let mut writer = NodeWriter::new(&mut store, "dwug_en", "en");
            writer
                .write_annotation(&Annotation {
                    id: 1,
                    label: "foo_s1_bar_s2".into(),
                    category: Category::Identical,
                    comment: "".into(),
                    words: ["foo_s1".into(), "bar_s2".into()],
                    annotator_id: "5".into(),
                })
                .unwrap();
        }

        let annotation = vocab::HLV_ANNOTATION.term("1");
        let words = store.subjects(vocab::nif::ANNOTATION, &annotation).unwrap();
        assert_eq!(words.len(), 2);

        let categories = store.objects(&annotation, vocab::nif::CATEGORY).unwrap();
        assert!(categories.contains(&Term::from(Literal::integer(4))));
        assert!(categories.contains(&Term::from(Literal::string("Identical"))));
    }
}
