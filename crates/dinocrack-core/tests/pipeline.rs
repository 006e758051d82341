//! Analyse → persist → generate, checked end to end.

use std::collections::HashSet;

use dinocrack_core::{
    AnalyzeMode, CancellationToken, CandidateGenerator, CorpusAnalyzer, GenerationMode,
    GeneratorConfigBuilder, StopReason, Vocabulary, VocabularyPaths, WordlistWriter,
};
use dinocrack_dict::WordListDictionary;
use dinocrack_leet::LeetCodec;

const CORPUS: &[&str] = &[
    "wildLion42",
    "br@veEagle07",
    "]adeTiger13",
    "wildT!ger99",
    "jad3Lion00",
];

fn analysed_vocabulary(codec: &LeetCodec) -> Vocabulary {
    let mut analyzer = CorpusAnalyzer::new(codec);
    let mut vocab = Vocabulary::new();
    let summary = analyzer.analyze_corpus(&mut vocab, CORPUS, AnalyzeMode::Append);
    assert_eq!(summary.failed, 0, "{:?}", summary.failed_examples);
    vocab
}

#[test]
fn corpus_recovers_grammar_words() {
    let codec = LeetCodec::dinopass();
    let vocab = analysed_vocabulary(&codec);

    assert_eq!(
        vocab.adjectives().iter().collect::<Vec<_>>(),
        vec!["brave", "jade", "wild"]
    );
    assert_eq!(
        vocab.nouns().iter().collect::<Vec<_>>(),
        vec!["eagle", "lion", "tiger"]
    );
}

#[test]
fn generated_candidates_hold_grammar_properties() {
    let codec = LeetCodec::dinopass();
    let vocab = analysed_vocabulary(&codec);
    let config = GeneratorConfigBuilder::new()
        .mode(GenerationMode::Cartesian)
        .digits("00-99".parse().unwrap())
        .build()
        .unwrap();

    let mut out = Vec::new();
    let stats = CandidateGenerator::new(&codec, &config)
        .generate(&vocab, &mut out, &CancellationToken::new(), |_| {})
        .unwrap();

    assert_eq!(stats.stop, StopReason::Exhausted);
    assert!(!out.is_empty());

    let mut seen = HashSet::new();
    for candidate in &out {
        assert!(codec.is_valid_leet_combination(candidate), "{candidate}");
        let len = candidate.chars().count();
        assert!((7..=12).contains(&len), "{candidate} has length {len}");
        assert!(seen.insert(candidate), "{candidate} emitted twice");
    }
}

#[test]
fn generated_candidates_analyse_back_to_vocabulary() {
    let codec = LeetCodec::dinopass();
    let vocab = analysed_vocabulary(&codec);
    let config = GeneratorConfigBuilder::new()
        .digits("07,42".parse().unwrap())
        .build()
        .unwrap();

    let mut out = Vec::new();
    CandidateGenerator::new(&codec, &config)
        .generate(&vocab, &mut out, &CancellationToken::new(), |_| {})
        .unwrap();

    // Every symbol used by these words reads back unambiguously
    let mut analyzer = CorpusAnalyzer::new(&codec);
    let mut recovered = Vocabulary::new();
    let summary = analyzer.analyze_corpus(&mut recovered, &out, AnalyzeMode::Replace);
    assert_eq!(summary.failed, 0, "{:?}", summary.failed_examples);
    assert_eq!(recovered, vocab);
}

#[test]
fn dictionary_settles_ambiguous_nouns() {
    let codec = LeetCodec::dinopass();
    let dict = WordListDictionary::embedded();
    let mut analyzer = CorpusAnalyzer::new(&codec).with_dictionary(&dict);
    let mut vocab = Vocabulary::new();

    let summary = analyzer.analyze_corpus(
        &mut vocab,
        ["wild<ite42", "braveDu<k11", "calm<rab08"],
        AnalyzeMode::Append,
    );
    assert_eq!(summary.successful, 3);
    assert_eq!(summary.ambiguous_fallbacks, 0);
    assert!(vocab.contains_noun("kite"));
    assert!(vocab.contains_noun("duck"));
    assert!(vocab.contains_noun("crab"));
}

#[test]
fn persisted_vocabulary_generates_the_same_wordlist() {
    let codec = LeetCodec::dinopass();
    let vocab = analysed_vocabulary(&codec);
    let dir = tempfile::tempdir().unwrap();
    let paths = VocabularyPaths::new(dir.path().join("adj.txt"), dir.path().join("nouns.txt"));
    vocab.save(&paths).unwrap();
    let reloaded = Vocabulary::load(&paths).unwrap();
    assert_eq!(reloaded, vocab);

    let config = GeneratorConfigBuilder::new()
        .digits("42".parse().unwrap())
        .build()
        .unwrap();

    let mut in_memory = Vec::new();
    CandidateGenerator::new(&codec, &config)
        .generate(&vocab, &mut in_memory, &CancellationToken::new(), |_| {})
        .unwrap();

    let wordlist = dir.path().join("wordlist.txt");
    let mut writer = WordlistWriter::create(&wordlist).unwrap();
    let stats = CandidateGenerator::new(&codec, &config)
        .generate(&reloaded, &mut writer, &CancellationToken::new(), |_| {})
        .unwrap();
    writer.finish().unwrap();

    let written = std::fs::read_to_string(&wordlist).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), stats.written);
    assert_eq!(lines, in_memory.iter().map(String::as_str).collect::<Vec<_>>());
}
