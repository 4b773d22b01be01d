use std::sync::Arc;

use answerdb_core::traits::ContentStore;
use answerdb_core::types::{Collection, Keyword, Link, RawDocument, UnknownQueryRecord};
use answerdb_nlp::{EmptyLexicon, QueryExpander, RootReducer, RuleTagger, StopWords, SynonymStore, TextNormalizer};
use answerdb_text::TantivyContentStore;
use tempfile::TempDir;

fn normalizer() -> Arc<TextNormalizer> {
    Arc::new(TextNormalizer::new(
        Box::new(RuleTagger::new()),
        RootReducer::norwegian(),
        StopWords::from_words(["når", "er", "på", "hvem", "av", "i", "ut", "hver", "kommer"]),
    ))
}

fn store() -> TantivyContentStore {
    TantivyContentStore::in_memory(normalizer()).expect("store")
}

/// Search with the root forms of `text`, as the retriever does.
fn search(store: &TantivyContentStore, collection: Collection, text: &str, limit: usize) -> Vec<RawDocument> {
    let query = normalizer().tokenize(text).join(" ");
    store.search_text(collection, &query, limit).expect("search")
}

fn raw(id: &str, title: &str, texts: &[&str]) -> RawDocument {
    RawDocument {
        id: id.to_string(),
        url: format!("https://example.no/{id}"),
        title: Some(title.to_string()),
        texts: Some(texts.iter().map(|t| t.to_string()).collect()),
        links: vec![Link::new("Husebybadet", "https://example.no/huseby")],
        keywords: vec![Keyword { term: "svømming".into(), confidence: 0.4 }],
        manually_changed: false,
    }
}

fn ids(docs: &[RawDocument]) -> Vec<&str> {
    docs.iter().map(|d| d.id.as_str()).collect()
}

#[test]
fn search_matches_inflected_forms() {
    let store = store();
    store
        .upsert(
            Collection::Automatic,
            &[
                raw("bad", "Åpningstider for badene", &["Badene er åpne hverdager fra 07 til 21."]),
                raw("bib", "Bibliotek", &["Biblioteket låner ut bøker."]),
            ],
        )
        .expect("upsert");

    let hits = search(&store, Collection::Automatic, "badet", 10);
    assert_eq!(ids(&hits), vec!["bad"]);
    // Stored documents come back whole, links and keywords included.
    assert_eq!(hits[0], raw("bad", "Åpningstider for badene", &["Badene er åpne hverdager fra 07 til 21."]));

    let keyword_hits = search(&store, Collection::Automatic, "svømming", 10);
    assert_eq!(keyword_hits.len(), 2);
    assert_eq!(search(&store, Collection::Automatic, "svømming", 1).len(), 1);
}

#[test]
fn empty_query_or_zero_limit_yield_nothing() {
    let store = store();
    store.upsert(Collection::Automatic, &[raw("a", "Parkering", &["Parkering ved hovedinngangen."])]).unwrap();
    assert!(store.search_text(Collection::Automatic, "   ", 10).unwrap().is_empty());
    assert!(search(&store, Collection::Automatic, "parkering", 0).is_empty());
    // Stopwords are never indexed, so they match nothing even when passed through.
    assert!(store.search_text(Collection::Automatic, "når er", 10).unwrap().is_empty());
}

#[test]
fn upsert_replaces_by_id_and_delete_removes() {
    let store = store();
    store.upsert(Collection::Automatic, &[raw("a", "Parkering", &["Gammel tekst."])]).unwrap();
    store.upsert(Collection::Automatic, &[raw("a", "Parkering", &["Ny tekst."])]).unwrap();
    assert_eq!(store.count(Collection::Automatic), 1);
    let doc = store.get(Collection::Automatic, "a").unwrap().expect("present");
    assert_eq!(doc.texts, Some(vec!["Ny tekst.".to_string()]));

    assert!(store.delete(Collection::Automatic, "a").unwrap());
    assert!(!store.delete(Collection::Automatic, "a").unwrap());
    assert!(store.get(Collection::Automatic, "a").unwrap().is_none());
}

#[test]
fn malformed_documents_are_returned_as_stored() {
    let store = store();
    let mut broken = raw("x", "Garderobe", &[]);
    broken.texts = None;
    store.upsert(Collection::Automatic, &[broken.clone()]).unwrap();
    let hits = search(&store, Collection::Automatic, "garderobe", 5);
    assert_eq!(hits, vec![broken]);
}

#[test]
fn override_flags_automatic_copy_and_revert_clears_it() {
    let store = store();
    store.upsert(Collection::Automatic, &[raw("p", "Parkering", &["Automatisk svar."])]).unwrap();

    store.apply_override(raw("p", "Parkering", &["Redigert svar."])).unwrap();
    let automatic = store.get(Collection::Automatic, "p").unwrap().unwrap();
    let manual = store.get(Collection::Manual, "p").unwrap().unwrap();
    assert!(automatic.manually_changed);
    assert_eq!(manual.texts, Some(vec!["Redigert svar.".to_string()]));
    assert_eq!(ids(&search(&store, Collection::Manual, "parkering", 5)), vec!["p"]);

    assert!(store.revert_override("p").unwrap());
    assert!(!store.get(Collection::Automatic, "p").unwrap().unwrap().manually_changed);
    assert!(store.get(Collection::Manual, "p").unwrap().is_none());
}

#[test]
fn unknown_queries_are_unique_by_text() {
    let store = store();
    let record = UnknownQueryRecord::new("hvor er garderoben?");
    store.insert_once(&record).expect("first insert");
    let err = store.insert_once(&record).expect_err("second insert");
    assert!(err.is_duplicate_key());

    store.insert_once(&UnknownQueryRecord::new("har dere badstue?")).unwrap();
    let texts: Vec<String> = store.unknown_queries().unwrap().into_iter().map(|r| r.query_text).collect();
    assert_eq!(texts, vec!["har dere badstue?", "hvor er garderoben?"]);

    assert!(store.remove_unknown("hvor er garderoben?").unwrap());
    assert!(!store.remove_unknown("hvor er garderoben?").unwrap());
    store.insert_once(&record).expect("insert after removal");
}

#[test]
fn concurrent_duplicate_inserts_store_one_record() {
    let store = store();
    let record = UnknownQueryRecord::new("åpent i påsken?");
    let outcomes: Vec<bool> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| store.insert_once(&record).is_ok())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    assert_eq!(store.unknown_queries().unwrap().len(), 1);
}

#[test]
fn on_disk_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let store = TantivyContentStore::open(tmp.path(), normalizer()).expect("open");
        store.upsert(Collection::Automatic, &[raw("a", "Parkering", &["Parkering ved hovedinngangen."])]).unwrap();
        store.insert_once(&UnknownQueryRecord::new("hvor er kiosken?")).unwrap();
    }
    let store = TantivyContentStore::open(tmp.path(), normalizer()).expect("reopen");
    assert_eq!(store.count(Collection::Automatic), 1);
    assert_eq!(ids(&search(&store, Collection::Automatic, "parkering", 5)), vec!["a"]);
    assert!(store.insert_once(&UnknownQueryRecord::new("hvor er kiosken?")).unwrap_err().is_duplicate_key());
}

#[test]
fn expanded_queries_find_their_own_inflected_forms() {
    let tmp = TempDir::new().unwrap();
    let synonyms = tmp.path().join("synonyms.txt");
    std::fs::write(&synonyms, "regning, faktura\n").unwrap();
    let n = normalizer();
    let expander = QueryExpander::new(
        Arc::clone(&n),
        Arc::new(SynonymStore::load(synonyms, Arc::clone(&n)).unwrap()),
        Arc::new(EmptyLexicon),
    );
    let store = TantivyContentStore::in_memory(Arc::clone(&n)).unwrap();
    store
        .upsert(
            Collection::Automatic,
            &[
                raw("faktura", "Fakturaene", &["Fakturaene sendes ut hver måned."]),
                raw("levering", "Leveransene", &["Leveransene kommer på tirsdager."]),
                raw("vann", "Vannmåleren", &["Vannmåleren leses av i januar."]),
                raw("lys", "Gatelysene", &["Gatelysene skrus på om kvelden."]),
            ],
        )
        .unwrap();

    for (question, id) in [
        ("fakturaene", "faktura"),
        ("Når kommer leveransene?", "levering"),
        ("Hvem leser av vannmåleren?", "vann"),
        ("gatelysene", "lys"),
    ] {
        let expanded = expander.expand(question);
        let hits = store.search_text(Collection::Automatic, &expanded, 10).unwrap();
        assert!(ids(&hits).contains(&id), "{question:?} expanded to {expanded:?} missed {id}");
    }
}

#[test]
fn harvested_keywords_match_by_root() {
    let store = store();
    let mut doc = raw("bib", "Bibliotek", &["Åpent hver dag."]);
    doc.keywords = vec![Keyword { term: "Bøkene".into(), confidence: 0.8 }];
    store.upsert(Collection::Automatic, &[doc]).unwrap();
    assert_eq!(ids(&search(&store, Collection::Automatic, "bøkene", 5)), vec!["bib"]);
}
