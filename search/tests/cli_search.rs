use lexis_core::persist::{save_doc_sources, IndexPaths};
use lexis_core::{Error, SearchIndex};
use lexis_search::Searcher;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

fn build_tiny_index(dir: &std::path::Path) -> IndexPaths {
    let paths = IndexPaths::new(dir);
    let docs: Vec<Vec<&str>> = vec![vec!["кот", "собака"], vec!["собака"], vec!["кот", "кот"]];
    SearchIndex::build(&docs).unwrap().save(&paths, "2024-01-01T00:00:00Z".into()).unwrap();
    save_doc_sources(&paths.doc_sources(), &["r0.txt".into(), "r1.txt".into(), "r2.txt".into()]).unwrap();
    paths
}

#[test]
fn boolean_and_ranked_queries() {
    let dir = tempdir().unwrap();
    let searcher = Searcher::open_dir(&build_tiny_index(dir.path()), None).unwrap();
    assert_eq!(searcher.boolean("кот^~собака").unwrap(), vec![2]);
    assert_eq!(searcher.boolean("собака|кот").unwrap(), vec![0, 1, 2]);

    let hits = searcher.ranked("Кот!", 2);
    assert_eq!(hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), vec![2, 0]);
    assert_eq!(searcher.source(2), Some("r2.txt"));
}

#[test]
fn boolean_errors_surface() {
    let dir = tempdir().unwrap();
    let searcher = Searcher::open_dir(&build_tiny_index(dir.path()), None).unwrap();
    let err = searcher.boolean("мышь").unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownTerm(_))));
    let err = searcher.boolean("кот^").unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidQuery(_))));
}

#[test]
fn console_answers_until_exit() {
    let dir = tempdir().unwrap();
    let raw = tempdir().unwrap();
    fs::write(raw.path().join("r2.txt"), "Кот, кот.\n").unwrap();
    let searcher = Searcher::open_dir(&build_tiny_index(dir.path()), Some(raw.path().to_path_buf())).unwrap();

    let mut out = Vec::new();
    searcher.console(Cursor::new("кот\n\n-1\nсобака\n"), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("query: кот\ndocument: 2\nsource: r2.txt\n"));
    assert!(out.contains("---\nКот, кот.\n---"));
    assert!(!out.contains("query: собака"));
}

#[test]
fn missing_index_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(Searcher::open_dir(&IndexPaths::new(dir.path().join("none")), None).is_err());
}
