use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use answerdb_core::traits::{LexicalNetwork, Tagger};
use answerdb_core::types::{LexicalPos, PartOfSpeech, TaggedToken};
use answerdb_nlp::synonyms::parse_groups;
use answerdb_nlp::{
    EmptyLexicon, QueryExpander, RootReducer, RuleTagger, StopWords, SynonymStore, TextNormalizer, WordNetLexicon,
};

const STOPWORDS: &[&str] = &["når", "på", "er", "og", "i", "det", "hva", "bad"];

fn normalizer() -> Arc<TextNormalizer> {
    Arc::new(TextNormalizer::new(
        Box::new(RuleTagger::new()),
        RootReducer::norwegian(),
        StopWords::from_words(STOPWORDS.iter().copied()),
    ))
}

/// Emits a fixed token sequence regardless of input.
struct FixedTagger(Vec<TaggedToken>);

impl Tagger for FixedTagger {
    fn tag(&self, _text: &str) -> Vec<TaggedToken> {
        self.0.clone()
    }
}

fn synonym_file(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("synonyms.txt");
    fs::write(&path, contents).unwrap();
    path
}

const LEXICON: &str = "# test wordnet\n\
00001-n\tnob:lemma\tsvømmehall\n\
00001-n\tnob:lemma\tsvømme_basseng\n\
00002-v\tnob:lemma\tåpne\n\
00002-v\tnob:lemma\tlåse_opp\n";

#[test]
fn normalize_drops_punctuation_digits_and_stopwords() {
    let n = normalizer();
    let r = RootReducer::norwegian();
    let roots = n.tokenize("Når åpner husebybadet? Klokken 07:00!");
    assert_eq!(
        roots,
        vec![
            r.reduce("åpner", PartOfSpeech::Noun),
            r.reduce("husebybadet", PartOfSpeech::Noun),
            r.reduce("Klokken", PartOfSpeech::Noun),
        ]
    );
}

#[test]
fn pipeline_steps_apply_in_order() {
    let tagger = FixedTagger(vec![
        TaggedToken::new("...", PartOfSpeech::Punctuation),
        TaggedToken::new("3d", PartOfSpeech::Noun),
        TaggedToken::new("   ", PartOfSpeech::Other),
        TaggedToken::new("'Badet'", PartOfSpeech::Noun),
        TaggedToken::new("(Det)", PartOfSpeech::Pronoun),
        TaggedToken::new("Hvilke", PartOfSpeech::Determiner),
    ]);
    let n = TextNormalizer::new(
        Box::new(tagger),
        RootReducer::norwegian(),
        StopWords::from_words(STOPWORDS.iter().copied()),
    );
    let tokens = n.normalize("ignored");
    let roots: Vec<&str> = tokens.iter().map(|t| t.root.as_str()).collect();
    // "Badet" survives: stopword "bad" is compared with the raw text, not the root.
    assert_eq!(roots, vec![RootReducer::norwegian().reduce("Badet", PartOfSpeech::Noun).as_str(), "hvilke"]);
    assert_eq!(tokens[1].pos, PartOfSpeech::Determiner);
}

#[test]
fn canonical_keeps_every_word_of_a_phrase() {
    let n = normalizer();
    assert_eq!(n.canonical("Når"), "når");
    assert_eq!(n.canonical("svømme basseng").split(' ').count(), 2);
}

#[test]
fn synonym_lookup_returns_an_independent_copy() {
    let tmp = TempDir::new().unwrap();
    let path = synonym_file(&tmp, "tlf, telefon, telefonnummer\n# kommentar\n\nbibliotek, bokhylle\n");
    let n = normalizer();
    let store = SynonymStore::load(&path, Arc::clone(&n)).expect("load");
    assert_eq!(store.len(), 2);

    let mut group = store.get_synset("tlf").expect("group for tlf");
    assert!(group.contains(&n.canonical("telefon")));
    assert!(group.remove("tlf"));

    let again = store.get_synset("tlf").expect("group still intact");
    assert!(again.contains("tlf"), "caller mutation must not leak into the store");
    assert!(store.get_synset("parkering").is_none());
}

#[test]
fn missing_synonym_file_fails_at_load() {
    let tmp = TempDir::new().unwrap();
    assert!(SynonymStore::load(tmp.path().join("absent.txt"), normalizer()).is_err());
}

#[test]
fn reload_picks_up_changes_and_failure_keeps_previous_groups() {
    let tmp = TempDir::new().unwrap();
    let path = synonym_file(&tmp, "tlf, telefon\n");
    let store = SynonymStore::load(&path, normalizer()).unwrap();

    fs::write(&path, "tlf, telefon, mobil\nbibliotek, bokhylle\n").unwrap();
    assert_eq!(store.reload().unwrap(), 2);
    assert_eq!(store.get_synset("tlf").unwrap().len(), 3);

    fs::remove_file(&path).unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get_synset("tlf").unwrap().len(), 3);
}

#[test]
fn lookups_during_reload_see_old_or_new_group() {
    let tmp = TempDir::new().unwrap();
    let old_contents = "tlf, telefon\n";
    let new_contents = "tlf, telefon, mobil, mobiltelefon\nbibliotek, bokhylle\n";
    let path = synonym_file(&tmp, old_contents);
    let n = normalizer();
    let store = SynonymStore::load(&path, Arc::clone(&n)).unwrap();
    let old_group = parse_groups(old_contents, &n).remove(0);
    let new_group = parse_groups(new_contents, &n).remove(0);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..500 {
                    let group = store.get_synset("tlf").expect("tlf is always present");
                    assert!(group == old_group || group == new_group, "partial group observed: {group:?}");
                }
            });
        }
        s.spawn(|| {
            for i in 0..50 {
                let contents = if i % 2 == 0 { new_contents } else { old_contents };
                fs::write(&path, contents).unwrap();
                store.reload().unwrap();
            }
        });
    });
}

#[test]
fn lexicon_indexes_lemmas_by_root_and_filters_by_class() {
    let n = normalizer();
    let lexicon = WordNetLexicon::parse(LEXICON, "nob", &n);
    assert_eq!(lexicon.len(), 2);
    let root = n.canonical("svømmehall");
    assert_eq!(lexicon.synsets(&root, None).len(), 1);
    assert_eq!(lexicon.synsets(&root, Some(LexicalPos::Noun))[0].lemmas, vec!["svømmehall", "svømme_basseng"]);
    assert!(lexicon.synsets(&root, Some(LexicalPos::Verb)).is_empty());
}

#[test]
fn lexicon_reads_only_the_configured_language() {
    let n = normalizer();
    let multilingual = "00001-n\tnob:lemma\tsvømmehall\n\
00001-n\teng:lemma\tswimming_pool\n\
00001-n\tnno:lemma\tsymjehall\n\
00003-n\teng:lemma\tlibrary\n\
00004-n\tlemma\tbibliotek\n";
    let lexicon = WordNetLexicon::parse(multilingual, "nob", &n);
    assert_eq!(lexicon.len(), 2);
    let root = n.canonical("svømmehall");
    assert_eq!(lexicon.synsets(&root, None)[0].lemmas, vec!["svømmehall"]);
    assert!(lexicon.synsets(&n.canonical("swimming pool"), None).is_empty());
    assert!(lexicon.synsets(&n.canonical("library"), None).is_empty());
    assert_eq!(lexicon.synsets(&n.canonical("bibliotek"), None).len(), 1);
}

#[test]
fn token_without_synonyms_passes_through() {
    let tmp = TempDir::new().unwrap();
    let n = normalizer();
    let store = Arc::new(SynonymStore::load(synonym_file(&tmp, "tlf, telefon\n"), Arc::clone(&n)).unwrap());
    let expander = QueryExpander::new(Arc::clone(&n), store, Arc::new(EmptyLexicon));
    assert_eq!(expander.expand("parkering?"), n.canonical("parkering"));
}

#[test]
fn custom_synonyms_do_not_include_the_token_itself() {
    let tmp = TempDir::new().unwrap();
    let n = normalizer();
    let store =
        Arc::new(SynonymStore::load(synonym_file(&tmp, "tlf, telefon, telefonnummer\n"), Arc::clone(&n)).unwrap());
    let expander = QueryExpander::new(Arc::clone(&n), store, Arc::new(EmptyLexicon));

    let expanded = expander.expand("tlf");
    let terms: Vec<&str> = expanded.split(' ').collect();
    assert_eq!(terms.iter().filter(|t| **t == "tlf").count(), 1);
    assert_eq!(terms[0], "tlf");
    assert!(terms.contains(&n.canonical("telefon").as_str()));
    assert!(terms.contains(&n.canonical("telefonnummer").as_str()));

    let both = expander.expand("tlf telefon");
    let terms: Vec<&str> = both.split(' ').collect();
    assert_eq!(terms.iter().filter(|t| **t == "tlf").count(), 1);
}

#[test]
fn lexical_network_replaces_token_with_synset_lemmas() {
    let tmp = TempDir::new().unwrap();
    let n = normalizer();
    let store = Arc::new(SynonymStore::load(synonym_file(&tmp, "svømmehall, basseng\n"), Arc::clone(&n)).unwrap());
    let lexicon = Arc::new(WordNetLexicon::parse(LEXICON, "nob", &n));
    let expander = QueryExpander::new(Arc::clone(&n), store, lexicon);

    let expanded = expander.expand("svømmehall");
    // Custom synonym first, then the lemma roots with underscores rewritten as spaces.
    assert_eq!(
        expanded,
        format!("{} {} {}", n.canonical("basseng"), n.canonical("svømmehall"), n.canonical("svømme basseng"))
    );
    assert!(!expanded.contains('_'));
}
