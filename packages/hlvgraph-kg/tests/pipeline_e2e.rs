//! End-to-end: DWUG directory → graph → Turtle → queries → plots

mod common;

use common::*;
use hlvgraph_kg::features::query_engine::QueryKind;
use hlvgraph_kg::{
    load_graph, ColorMode, ErrorKind, GraphBuildUseCase, GraphStore, KgPipeline, QueryService,
    VisualizationService,
};
use hlvgraph_storage::{vocab, Literal, Term};
use pretty_assertions::assert_eq;

#[test]
fn test_single_judgment_graph() {
    let fixture = DwugFixture::new().with_single_judgment();
    let pipeline = KgPipeline::from_config(fixture.config.clone());

    let (built, report) = pipeline.build_graph().unwrap();
    assert_eq!(report.processed, vec!["foo"]);
    assert!(report.failed.is_empty());

    let stats = &built.stats;
    assert_eq!(stats.word_occurrences, 2);
    assert_eq!(stats.sentences, 2);
    assert_eq!(stats.annotations, 1);
    assert_eq!(stats.annotators, 1);
    assert_eq!(stats.next_annotation_id, 2);

    let annotation = vocab::HLV_ANNOTATION.term("1");
    let categories = built
        .store
        .objects(&annotation, vocab::nif::CATEGORY)
        .unwrap();
    assert!(categories.contains(&Term::from(Literal::string("Closely Related"))));
    assert!(categories.contains(&Term::from(Literal::integer(3))));

    // exactly two words and one annotator
    let words = built
        .store
        .subjects(vocab::nif::ANNOTATION, &annotation)
        .unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(
        built
            .store
            .objects(&annotation, vocab::rdaio::HAS_ANNOTATOR)
            .unwrap(),
        vec![vocab::HLV_ANNOTATOR.term("5")]
    );
}

#[test]
fn test_turtle_roundtrip() {
    let fixture = DwugFixture::new().with_single_judgment();
    let pipeline = KgPipeline::from_config(fixture.config.clone());

    let (built, report) = pipeline.build_and_save().unwrap();
    let output = report.output.expect("graph path");
    assert_eq!(output, fixture.config.graph_path());
    assert!(output.ends_with("graphs/dwug_en.ttl"));

    let reloaded = load_graph(&fixture.config).unwrap();
    assert_same_triples(&built.store, &reloaded);
    assert_eq!(
        built.store.content_digest().unwrap(),
        reloaded.content_digest().unwrap()
    );
}

#[test]
fn test_load_or_build_reuses_graph_file() {
    let fixture = DwugFixture::new().with_single_judgment();
    let pipeline = KgPipeline::from_config(fixture.config.clone());

    let first = pipeline.load_or_build(false).unwrap();
    assert!(fixture.config.graph_path().is_file());

    // Changing the data afterwards has no effect until a rebuild
    fixture.write_judgments(
        "foo",
        &[
            judgment_line("s1", "s2", "annotator5", "3"),
            judgment_line("s1", "s2", "annotator6", "4"),
        ],
    );
    let reused = pipeline.load_or_build(false).unwrap();
    assert_same_triples(&first, &reused);

    let rebuilt = pipeline.load_or_build(true).unwrap();
    assert!(rebuilt.len().unwrap() > first.len().unwrap());
}

#[test]
fn test_unreadable_item_is_isolated() {
    let fixture = DwugFixture::new().with_single_judgment();
    // judgments.csv missing
    fixture.write_uses("broken", &[use_line("b1", "broken", "1900")]);

    let (built, report) = KgPipeline::from_config(fixture.config.clone())
        .build_graph()
        .unwrap();
    assert_eq!(report.processed, vec!["foo"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].item, "broken");
    assert_eq!(built.stats.annotations, 1);
}

#[test]
fn test_malformed_rows_are_fatal() {
    let cases = [
        // token range without a colon
        (
            vec![
                use_line("s1", "foo", "1850").replace("\t2:5\t", "\t2-5\t"),
                use_line("s2", "bar", "1851"),
            ],
            judgment_line("s1", "s2", "annotator5", "3"),
            ErrorKind::Parse,
        ),
        (
            vec![use_line("s1", "foo", "1850"), use_line("s2", "bar", "1851")],
            judgment_line("s1", "s2", "annotator5", "7"),
            ErrorKind::Parse,
        ),
        (
            vec![use_line("s1", "foo", "1850"), use_line("s2", "bar", "1851")],
            judgment_line("s1", "s2", "anonymous", "2"),
            ErrorKind::Parse,
        ),
        (
            vec![use_line("s1", "foo", "1850")],
            judgment_line("s1", "s2", "annotator5", "2"),
            ErrorKind::Reference,
        ),
    ];

    for (uses, judgment, expected) in cases {
        let fixture = DwugFixture::new();
        fixture.write_item("foo", &uses, &[judgment.clone()]);
        let err = KgPipeline::from_config(fixture.config.clone())
            .build_graph()
            .unwrap_err();
        assert_eq!(err.kind(), expected, "{}: {}", judgment, err);
    }
}

#[test]
fn test_query_exports() {
    let fixture = DwugFixture::new().with_single_judgment();
    let (built, _) = KgPipeline::from_config(fixture.config.clone())
        .build_graph()
        .unwrap();
    let service = QueryService::new(&built.store, fixture.config.output.query_dir.clone());

    let paths = service.export_standard_suite().unwrap();
    assert_eq!(paths.len(), QueryService::<hlvgraph_kg::OxigraphStore>::standard_suite().len());

    let query_dir = &fixture.config.output.query_dir;
    assert_eq!(
        read_csv_lines(&query_dir.join("category_stats.csv")),
        vec!["category,category_lbl,count", "3,Closely Related,1"]
    );
    assert_eq!(
        read_csv_lines(&query_dir.join("annotators.csv")),
        vec!["annotator_lbl", "annotator5"]
    );
    assert_eq!(read_csv_lines(&query_dir.join("pos_tags.csv")), vec!["pos", "NN"]);

    let num_labels = read_csv_lines(&query_dir.join("num_labels.csv"));
    assert_eq!(num_labels[0], "annotation_lbl,num_distinct_lbls,num_total_lbls,range");
    assert!(num_labels[1].starts_with("foo_s1_bar_s2,1,"));
    assert!(num_labels[1].ends_with(",0"));

    let (table, _) = service
        .export(&QueryKind::AnnotationsPerAnnotator("annotator5".into()))
        .unwrap();
    assert_eq!(table.len(), 2);
    assert!(query_dir.join("annotator_annotator5.csv").is_file());
}

#[test]
fn test_visualizations() {
    let fixture = DwugFixture::new().with_single_judgment();
    let (built, _) = KgPipeline::from_config(fixture.config.clone())
        .build_graph()
        .unwrap();
    let service = VisualizationService::new(&built.store, &fixture.config);

    let written = service.run_all(&ColorMode::ALL).unwrap();
    assert_eq!(written.len(), 4);

    let vis = &fixture.config.output.visualization_dir;
    for path in [
        "full/full_annotations_distinct_dwug_en.svg",
        "full/full_annotations_range_dwug_en.svg",
        "annotator/distinct/annotator5_distinct_dwug_en.svg",
        "annotator/range/annotator5_range_dwug_en.svg",
    ] {
        assert!(vis.join(path).is_file(), "{}", path);
    }

    // second run hits the layout cache and writes identical plots
    let before = std::fs::read_to_string(vis.join("full/full_annotations_range_dwug_en.svg")).unwrap();
    service.run_all(&[ColorMode::Range]).unwrap();
    let after = std::fs::read_to_string(vis.join("full/full_annotations_range_dwug_en.svg")).unwrap();
    assert_eq!(before, after);
}
