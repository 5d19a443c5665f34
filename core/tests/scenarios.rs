use lexis_core::{
    BooleanQuery, Dictionary, Error, InvertedIndexBuilder, QueryVectorizer, Ranker, SearchIndex, TfIdfBuilder,
};

fn corpus() -> Vec<Vec<String>> {
    ["кот собака", "собака", "кот кот"]
        .iter()
        .map(|d| d.split_whitespace().map(str::to_string).collect())
        .collect()
}

#[test]
fn boolean_scenario() {
    let docs = corpus();
    let dict = Dictionary::build(&docs);
    assert_eq!(dict.lookup("кот").unwrap(), 0);
    assert_eq!(dict.lookup("собака").unwrap(), 1);

    let index = InvertedIndexBuilder::build(&docs, &dict).unwrap();
    assert_eq!(index.postings(0).unwrap().as_slice(), &[0, 2]);
    assert_eq!(index.postings(1).unwrap().as_slice(), &[0, 1]);

    let hits = BooleanQuery::parse("кот^~собака").unwrap().resolve(&dict).unwrap().evaluate(&index).unwrap();
    assert_eq!(hits.as_slice(), &[2]);
}

#[test]
fn tfidf_scenario() {
    let docs = corpus();
    let dict = Dictionary::build(&docs);
    let (tf, df) = TfIdfBuilder::build(&docs, &dict).unwrap();
    assert_eq!(df.as_slice(), &[2, 2]);
    assert_eq!(tf.row(2).unwrap().get(0), 2);

    let idf = df.idf(3);
    assert!((idf[0] - 0.5849625007211562).abs() < 1e-12);

    let m = TfIdfBuilder::compute_tfidf(&tf, &df, 3).unwrap();
    assert!((m.row(2).unwrap().get(0) - 1.1699250014423124).abs() < 1e-12);
}

#[test]
fn ranked_scenario() {
    let docs = corpus();
    let dict = Dictionary::build(&docs);
    let (tf, df) = TfIdfBuilder::build(&docs, &dict).unwrap();
    let m = TfIdfBuilder::compute_tfidf(&tf, &df, 3).unwrap();
    let q = QueryVectorizer::vectorize(&["кот"], &dict, &df.idf(3));
    assert!((q.get(0) - 0.5849625007211562).abs() < 1e-12);

    let sims = Ranker::similarities(&q, &m);
    assert!(sims[2] > sims[0]);
    assert_eq!(Ranker::best_match(&q, &m).unwrap().doc_id, 2);
}

#[test]
fn unknown_term_asymmetry() {
    let idx = SearchIndex::build(&corpus()).unwrap();
    assert!(matches!(idx.boolean("лиса"), Err(Error::UnknownTerm(t)) if t == "лиса"));
    let q = idx.vectorize(&["лиса", "кот"]);
    assert_eq!(q.nnz(), 1);
    assert_eq!(idx.best_match(&["лиса", "кот"]).unwrap().doc_id, 2);
}

#[test]
fn term_in_every_document_contributes_nothing() {
    let docs: Vec<Vec<&str>> = vec![vec!["и", "и", "кот"], vec!["и"], vec!["и", "пёс"]];
    let idx = SearchIndex::build(&docs).unwrap();
    for row in idx.tfidf().rows() {
        assert_eq!(row.get(0), 0.0);
    }
    assert!(idx.similarities(&["и"]).iter().all(|&s| s == 0.0));
}
