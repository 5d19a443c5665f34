use lexis_core::persist::{self, IndexPaths};
use lexis_core::{ArtifactPaths, Dictionary, Error, SearchIndex};
use std::fs;
use tempfile::tempdir;

fn corpus() -> Vec<Vec<String>> {
    ["кот собака", "собака", "кот кот", "пёс кот собака пёс"]
        .iter()
        .map(|d| d.split_whitespace().map(str::to_string).collect())
        .collect()
}

#[test]
fn dictionary_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("dict.txt");
    let dict = Dictionary::build(&corpus());
    persist::save_dictionary(&path, &dict).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "кот\nсобака\nпёс\n");
    assert_eq!(persist::load_dictionary(&path).unwrap(), dict);
}

#[test]
fn text_artifacts_reload_identically() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let built = SearchIndex::build(&corpus()).unwrap();
    built.save(&paths, "2024-01-01T00:00:00Z".into()).unwrap();

    let loaded = SearchIndex::load(&paths).unwrap();
    assert_eq!(loaded, built);
    assert_eq!(SearchIndex::load_snapshot(&paths.snapshot()).unwrap(), built);

    let meta = persist::load_meta(&paths.meta()).unwrap();
    assert_eq!(meta.num_docs, 4);
    assert_eq!(meta.vocab_size, 3);
}

#[test]
fn file_formats() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    SearchIndex::build(&corpus()).unwrap().save(&paths, String::new()).unwrap();

    let inv = fs::read_to_string(paths.inverted_index()).unwrap();
    assert_eq!(inv, "0 2 3\n0 1 3\n3\n");

    let df = fs::read_to_string(paths.df()).unwrap();
    assert_eq!(df, "кот\t3\nсобака\t3\nпёс\t1\n");

    let tfidf = fs::read_to_string(paths.tfidf()).unwrap();
    let lines: Vec<&str> = tfidf.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[3].contains("пёс~~~4"));
}

#[test]
fn num_docs_inferred_without_meta() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let built = SearchIndex::build(&corpus()).unwrap();
    built.save(&paths, String::new()).unwrap();
    fs::remove_file(paths.meta()).unwrap();

    let artifacts = ArtifactPaths { meta: None, ..ArtifactPaths::from(&paths) };
    assert_eq!(SearchIndex::load_artifacts(&artifacts).unwrap(), built);
    assert_eq!(SearchIndex::load(&paths).unwrap().num_docs(), 4);
}

#[test]
fn out_of_range_posting_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    SearchIndex::build(&corpus()).unwrap().save(&paths, String::new()).unwrap();
    fs::write(paths.inverted_index(), "0 2 3\n0 1 3\n9\n").unwrap();
    assert!(matches!(SearchIndex::load(&paths), Err(Error::CorpusInconsistency(_))));
}

#[test]
fn df_disagreeing_with_postings_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    SearchIndex::build(&corpus()).unwrap().save(&paths, String::new()).unwrap();
    fs::write(paths.df(), "кот\t3\nсобака\t3\nпёс\t2\n").unwrap();
    assert!(matches!(SearchIndex::load(&paths), Err(Error::CorpusInconsistency(_))));
}

#[test]
fn malformed_lines_report_position() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    SearchIndex::build(&corpus()).unwrap().save(&paths, String::new()).unwrap();
    fs::write(paths.df(), "кот\t3\nсобака three\n").unwrap();
    match SearchIndex::load(&paths) {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn non_finite_or_negative_weights_are_rejected() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    SearchIndex::build(&corpus()).unwrap().save(&paths, String::new()).unwrap();
    for bad in ["NaN", "inf", "-0.5"] {
        fs::write(paths.tfidf(), format!("кот~~~0.5\n\nкот~~~{bad}\n\n")).unwrap();
        match SearchIndex::load(&paths) {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 3, "weight {bad}"),
            other => panic!("expected parse error for {bad}, got {other:?}"),
        }
    }
}

#[test]
fn missing_files_surface_io_errors() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("nowhere"));
    assert!(matches!(SearchIndex::load(&paths), Err(Error::Io(_))));
}

#[test]
fn documents_and_sources_round_trip() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let mut docs = corpus();
    docs.push(Vec::new());
    persist::save_documents(&paths.documents(), &docs).unwrap();
    assert_eq!(persist::load_documents(&paths.documents()).unwrap(), docs);

    let sources = vec!["a.txt".to_string(), "b/c.txt".to_string()];
    persist::save_doc_sources(&paths.doc_sources(), &sources).unwrap();
    assert_eq!(persist::load_doc_sources(&paths.doc_sources()).unwrap(), sources);
}
