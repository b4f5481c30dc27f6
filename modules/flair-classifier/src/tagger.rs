use std::collections::HashMap;
use std::path::Path;

use crate::error::{ClassifierError, Result, TokenError};

/// The four WordNet parts of speech the lemmatizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimplePos {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl SimplePos {
    /// Collapse a Penn Treebank tag by its first letter. Unknown tags default to noun.
    pub fn from_treebank(tag: &str) -> Self {
        match tag.as_bytes().first() {
            Some(b'J') => SimplePos::Adjective,
            Some(b'V') => SimplePos::Verb,
            Some(b'N') => SimplePos::Noun,
            Some(b'R') => SimplePos::Adverb,
            _ => SimplePos::Noun,
        }
    }

    /// Parse a WordNet pos letter (`n`, `v`, `a`/`s`, `r`).
    pub fn from_wordnet(code: &str) -> Option<Self> {
        match code {
            "n" => Some(SimplePos::Noun),
            "v" => Some(SimplePos::Verb),
            "a" | "s" => Some(SimplePos::Adjective),
            "r" => Some(SimplePos::Adverb),
            _ => None,
        }
    }
}

/// Assigns a Penn Treebank tag to a single token.
pub trait PosTagger: Send + Sync {
    fn tag(&self, token: &str) -> std::result::Result<String, TokenError>;
}

/// Irregular verb forms, modals and suffix-less adverbs/adjectives that the
/// shape rules below would otherwise call nouns.
const BUILTIN_TAGS: &[(&str, &str)] = &[
    ("would", "MD"), ("could", "MD"), ("might", "MD"), ("must", "MD"), ("shall", "MD"),
    ("may", "MD"),
    ("went", "VBD"), ("gone", "VBN"), ("ran", "VBD"), ("came", "VBD"), ("seen", "VBN"),
    ("took", "VBD"), ("taken", "VBN"), ("gave", "VBD"), ("given", "VBN"), ("made", "VBD"),
    ("said", "VBD"), ("says", "VBZ"), ("got", "VBD"), ("gotten", "VBN"), ("knew", "VBD"),
    ("known", "VBN"), ("thought", "VBD"), ("told", "VBD"), ("became", "VBD"), ("felt", "VBD"),
    ("brought", "VBD"), ("began", "VBD"), ("begun", "VBN"), ("kept", "VBD"), ("held", "VBD"),
    ("wrote", "VBD"), ("written", "VBN"), ("stood", "VBD"), ("heard", "VBD"), ("meant", "VBD"),
    ("met", "VBD"), ("paid", "VBD"), ("sat", "VBD"), ("spoke", "VBD"), ("spoken", "VBN"),
    ("grew", "VBD"), ("grown", "VBN"), ("fell", "VBD"), ("fallen", "VBN"), ("sent", "VBD"),
    ("built", "VBD"), ("understood", "VBD"), ("drew", "VBD"), ("drawn", "VBN"),
    ("broke", "VBD"), ("broken", "VBN"), ("spent", "VBD"), ("drove", "VBD"),
    ("driven", "VBN"), ("bought", "VBD"), ("chose", "VBD"), ("chosen", "VBN"), ("ate", "VBD"),
    ("eaten", "VBN"), ("found", "VBD"), ("sold", "VBD"), ("taught", "VBD"), ("caught", "VBD"),
    ("fought", "VBD"), ("sought", "VBD"), ("threw", "VBD"), ("thrown", "VBN"), ("flew", "VBD"),
    ("forgot", "VBD"), ("forgotten", "VBN"), ("stole", "VBD"), ("stolen", "VBN"),
    ("struck", "VBD"), ("woke", "VBD"), ("done", "VBN"), ("goes", "VBZ"), ("died", "VBD"),
    ("also", "RB"), ("never", "RB"), ("always", "RB"), ("often", "RB"), ("still", "RB"),
    ("already", "RB"), ("even", "RB"), ("ever", "RB"), ("almost", "RB"), ("soon", "RB"),
    ("yet", "RB"), ("perhaps", "RB"), ("maybe", "RB"), ("together", "RB"), ("away", "RB"),
    ("back", "RB"), ("well", "RB"), ("however", "RB"), ("instead", "RB"), ("later", "RB"),
    ("good", "JJ"), ("bad", "JJ"), ("new", "JJ"), ("old", "JJ"), ("great", "JJ"), ("big", "JJ"),
    ("small", "JJ"), ("high", "JJ"), ("low", "JJ"), ("long", "JJ"), ("little", "JJ"),
    ("large", "JJ"), ("young", "JJ"), ("different", "JJ"), ("public", "JJ"), ("free", "JJ"),
    ("full", "JJ"), ("true", "JJ"), ("sure", "JJ"), ("whole", "JJ"), ("clear", "JJ"),
    ("strong", "JJ"), ("poor", "JJ"), ("rich", "JJ"), ("happy", "JJ"), ("sad", "JJ"),
    ("national", "JJ"), ("social", "JJ"), ("local", "JJ"), ("real", "JJ"), ("certain", "JJ"),
    ("better", "JJR"), ("worse", "JJR"), ("best", "JJS"), ("worst", "JJS"),
    ("morning", "NN"), ("evening", "NN"), ("ceiling", "NN"), ("wedding", "NN"),
    ("hatred", "NN"), ("kindred", "NN"), ("sacred", "JJ"), ("naked", "JJ"), ("wicked", "JJ"),
    ("hundred", "CD"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "able", "ible", "ive", "less", "ish", "ical"];

/// Lexicon-then-shape tagger for isolated tokens.
///
/// An optional exact lexicon (one `word<TAB>TAG` pair per line) takes
/// precedence over the built-in table and the suffix rules, so tags exported
/// from the training pipeline can be reproduced exactly.
#[derive(Debug, Clone, Default)]
pub struct RuleTagger {
    lexicon: HashMap<String, String>,
}

impl RuleTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon<I, W, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: Into<String>,
        T: Into<String>,
    {
        Self {
            lexicon: entries
                .into_iter()
                .map(|(w, t)| (w.into(), t.into()))
                .collect(),
        }
    }

    /// Load a `word<TAB>TAG` lexicon. Blank lines and `#` comments are skipped.
    pub fn from_lexicon_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ClassifierError::io(path, e))?;

        let mut lexicon = HashMap::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split('\t').collect::<Vec<_>>().as_slice() {
                [word, tag] if !word.is_empty() && !tag.is_empty() => {
                    lexicon.insert(word.to_string(), tag.to_string());
                }
                _ => {
                    return Err(ClassifierError::InvalidArtifact(format!(
                        "{}:{}: expected word<TAB>TAG",
                        path.display(),
                        lineno + 1
                    )));
                }
            }
        }

        tracing::debug!(path = %path.display(), entries = lexicon.len(), "Loaded tagger lexicon");
        Ok(Self { lexicon })
    }

    pub fn lexicon_len(&self) -> usize {
        self.lexicon.len()
    }
}

impl PosTagger for RuleTagger {
    fn tag(&self, token: &str) -> std::result::Result<String, TokenError> {
        if token.is_empty() {
            return Err(TokenError::EmptyToken);
        }
        if !token.chars().any(|c| c.is_ascii_graphic()) {
            return Err(TokenError::Untaggable(token.to_string()));
        }

        if let Some(tag) = self.lexicon.get(token) {
            return Ok(tag.clone());
        }
        let lower = token.to_ascii_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return Ok(tag.clone());
        }
        if let Some((_, tag)) = BUILTIN_TAGS.iter().find(|(word, _)| *word == lower) {
            return Ok(tag.to_string());
        }

        Ok(tag_by_shape(token, &lower).to_string())
    }
}

fn tag_by_shape(token: &str, lower: &str) -> &'static str {
    let len = lower.len();
    let has_digit = lower.chars().any(|c| c.is_ascii_digit());
    if has_digit
        && (lower.parse::<f64>().is_ok() || lower.chars().all(|c| c.is_ascii_digit() || c == ','))
    {
        return "CD";
    }
    if !lower.chars().any(|c| c.is_ascii_alphabetic()) {
        return "SYM";
    }

    // anything, nothing, something
    if lower.ends_with("thing") {
        return "NN";
    }
    // bring, string: no vowel left once -ing is gone
    if len > 4
        && lower.ends_with("ing")
        && lower[..len - 3].bytes().any(|b| b"aeiouy".contains(&b))
    {
        return "VBG";
    }
    if len > 3 && lower.ends_with("ed") {
        return "VBD";
    }
    if len > 3 && lower.ends_with("ly") {
        return "RB";
    }
    if ADJECTIVE_SUFFIXES
        .iter()
        .any(|suffix| len > suffix.len() + 2 && lower.ends_with(suffix))
    {
        return "JJ";
    }

    let plural = len > 3
        && lower.ends_with('s')
        && !["ss", "us", "is"].iter().any(|end| lower.ends_with(end));
    let capitalized = token.starts_with(|c: char| c.is_ascii_uppercase());

    match (capitalized, plural) {
        (true, true) => "NNPS",
        (true, false) => "NNP",
        (false, true) => "NNS",
        (false, false) => "NN",
    }
}
