use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::{IndexConfig, TokenizerConfig, TokenizerKind};
use crate::error::{IndexError, Result};

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
    // letters, digits, punctuation and whitespace survive normalization
    static ref DISALLOWED_RE: Regex = Regex::new(r"[^\p{L}\p{N}\p{P}\s[:punct:]]").expect("valid regex");
    static ref ATYPICAL_PUNCT_RE: Regex = Regex::new(r"[’…]").expect("valid regex");
    static ref SEPARATOR_RE: Regex = Regex::new(r"[\p{P}\p{N}[:punct:]]").expect("valid regex");
    static ref FRENCH_STEMMER: Stemmer = Stemmer::create(Algorithm::French);
}

const FRENCH_STOPWORDS: &[&str] = &[
    "au","aux","avec","ce","ces","dans","de","des","du","elle","en","et","eux","il","ils","je","la","le","les","leur","lui",
    "ma","mais","me","même","mes","moi","mon","ne","nos","notre","nous","on","ou","par","pas","pour","qu","que","qui",
    "sa","se","ses","son","sur","ta","te","tes","toi","ton","tu","un","une","vos","votre","vous",
    "c","d","j","l","à","m","n","s","t","y",
    "été","étée","étées","étés","étant","étante","étants","étantes",
    "suis","es","est","sommes","êtes","sont","serai","seras","sera","serons","serez","seront",
    "serais","serait","serions","seriez","seraient","étais","était","étions","étiez","étaient",
    "fus","fut","fûmes","fûtes","furent","sois","soit","soyons","soyez","soient",
    "fusse","fusses","fût","fussions","fussiez","fussent",
    "ayant","ayante","ayantes","ayants","eu","eue","eues","eus","ai","as","avons","avez","ont",
    "aurai","auras","aura","aurons","aurez","auront","aurais","aurait","aurions","auriez","auraient",
    "avais","avait","avions","aviez","avaient","eut","eûmes","eûtes","eurent",
    "aie","aies","ait","ayons","ayez","aient","eusse","eusses","eût","eussions","eussiez","eussent",
];

/// French Snowball stem of a single token.
pub fn french_stem(token: &str) -> String {
    FRENCH_STEMMER.stem(token).into_owned()
}

/// Splits text into an ordered sequence of tokens.
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Index-builder tokenizer: maximal runs of word characters, lowercased.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer;

impl Tokenize for SimpleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD_RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
    }
}

/// Stopword list, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    pub fn french() -> Self {
        Self { words: FRENCH_STOPWORDS.iter().map(|w| w.to_string()).collect() }
    }

    /// One word per line; blank lines and `#` comments are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| IndexError::io(path, e))?;
        let words = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Ok(Self { words })
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

/// Distinct tokens seen by the crawl tokenizer, in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    tokens: IndexSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self { Self::default() }

    pub fn observe(&mut self, token: &str) {
        if !self.tokens.contains(token) {
            self.tokens.insert(token.to_string());
        }
    }

    pub fn len(&self) -> usize { self.tokens.len() }

    pub fn is_empty(&self) -> bool { self.tokens.is_empty() }

    pub fn contains(&self, token: &str) -> bool { self.tokens.contains(token) }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

/// Crawl-time tokenizer.
///
/// Composes the text to NFC, drops every character that is neither a letter,
/// a digit, punctuation nor whitespace, turns punctuation and digits into
/// separators, lowercases and splits. Stopword removal and French stemming
/// are applied afterwards when configured.
pub struct CrawlTokenizer {
    stopwords: Option<Stopwords>,
    stemmer: Option<Stemmer>,
}

impl CrawlTokenizer {
    /// Loads the stopword list when `remove_stopwords` is set; this is the
    /// only place stopwords are read.
    pub fn new(config: &TokenizerConfig) -> Result<Self> {
        let stopwords = if config.remove_stopwords {
            let list = match &config.stopwords_path {
                Some(path) => Stopwords::from_file(path)?,
                None => Stopwords::french(),
            };
            if list.is_empty() {
                tracing::warn!("stopword list is empty, no token will be dropped");
                None
            } else {
                tracing::debug!(words = list.len(), "loaded stopwords");
                Some(list)
            }
        } else {
            None
        };
        let stemmer = config.stem.then(|| Stemmer::create(Algorithm::French));
        Ok(Self { stopwords, stemmer })
    }

    /// Normalization and splitting only, no stopwords or stemming.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let composed: String = text.nfc().collect();
        let kept = DISALLOWED_RE.replace_all(&composed, "");
        let spaced = ATYPICAL_PUNCT_RE.replace_all(&kept, " ");
        let separated = SEPARATOR_RE.replace_all(&spaced, " ").to_lowercase();
        separated.split_whitespace().map(str::to_string).collect()
    }

    /// Tokenizes and records every normalized token in `vocabulary` before
    /// stopwords and stemming are applied.
    pub fn tokenize_tracked(&self, text: &str, vocabulary: &mut Vocabulary) -> Vec<String> {
        let tokens = self.normalize(text);
        for token in &tokens {
            vocabulary.observe(token);
        }
        self.refine(tokens)
    }

    fn refine(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .into_iter()
            .filter(|t| self.stopwords.as_ref().map_or(true, |sw| !sw.contains(t)))
            .map(|t| match &self.stemmer {
                Some(stemmer) => stemmer.stem(&t).into_owned(),
                None => t,
            })
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Tokenize for CrawlTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.refine(self.normalize(text))
    }
}

/// A tokenizer strategy chosen by [`TokenizerKind`].
pub enum Tokenizer {
    Simple(SimpleTokenizer),
    Crawl(CrawlTokenizer),
}

impl Tokenizer {
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        Ok(match config.tokenizer {
            TokenizerKind::Simple => Tokenizer::Simple(SimpleTokenizer),
            TokenizerKind::Crawl => Tokenizer::Crawl(CrawlTokenizer::new(&config.crawl_tokenizer)?),
        })
    }

    pub fn kind(&self) -> TokenizerKind {
        match self {
            Tokenizer::Simple(_) => TokenizerKind::Simple,
            Tokenizer::Crawl(_) => TokenizerKind::Crawl,
        }
    }
}

impl Tokenize for Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        match self {
            Tokenizer::Simple(t) => t.tokenize(text),
            Tokenizer::Crawl(t) => t.tokenize(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawl(remove_stopwords: bool, stem: bool) -> CrawlTokenizer {
        CrawlTokenizer::new(&TokenizerConfig { remove_stopwords, stopwords_path: None, stem }).unwrap()
    }

    #[test]
    fn simple_matches_word_runs() {
        let t = SimpleTokenizer.tokenize("Le Chat, l'été 2024!");
        assert_eq!(t, vec!["le", "chat", "l", "été", "2024"]);
    }

    #[test]
    fn crawl_strips_punctuation_and_digits() {
        let t = crawl(false, false).tokenize("L’été, c’est 2024… déjà!");
        assert_eq!(t, vec!["l", "été", "c", "est", "déjà"]);
    }

    #[test]
    fn crawl_drops_symbols_and_composes_accents() {
        let t = crawl(false, false).tokenize("cafe\u{301} 🐱 noir");
        assert_eq!(t, vec!["café", "noir"]);
    }

    #[test]
    fn stopwords_are_case_insensitive() {
        let t = crawl(true, false).tokenize("Le chat ET la souris");
        assert_eq!(t, vec!["chat", "souris"]);
    }

    #[test]
    fn vocabulary_sees_tokens_before_filtering() {
        let mut vocab = Vocabulary::new();
        let t = crawl(true, true).tokenize_tracked("les chats les chats", &mut vocab);
        assert_eq!(t, vec!["chat", "chat"]);
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["les", "chats"]);
    }
}
