use std::collections::HashMap;
use std::path::Path;

use crate::error::{ClassifierError, Result, TokenError};
use crate::tagger::SimplePos;
use crate::wordnet::WordNet;

/// Reduces a token to its dictionary form for a given part of speech.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str, pos: SimplePos) -> std::result::Result<String, TokenError>;
}

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("men", "man"), ("women", "woman"), ("children", "child"), ("feet", "foot"),
    ("teeth", "tooth"), ("mice", "mouse"), ("geese", "goose"), ("indices", "index"),
    ("analyses", "analysis"), ("crises", "crisis"), ("criteria", "criterion"),
    ("phenomena", "phenomenon"), ("lives", "life"), ("wives", "wife"), ("knives", "knife"),
    ("leaves", "leaf"), ("wolves", "wolf"), ("halves", "half"), ("thieves", "thief"),
    ("news", "news"), ("series", "series"), ("species", "species"),
];

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("went", "go"), ("gone", "go"), ("goes", "go"), ("ran", "run"), ("came", "come"),
    ("saw", "see"), ("seen", "see"), ("took", "take"), ("taken", "take"), ("gave", "give"),
    ("given", "give"), ("made", "make"), ("said", "say"), ("says", "say"), ("got", "get"),
    ("gotten", "get"), ("knew", "know"), ("known", "know"), ("thought", "think"),
    ("told", "tell"), ("became", "become"), ("becoming", "become"), ("left", "leave"),
    ("felt", "feel"), ("brought", "bring"), ("began", "begin"), ("begun", "begin"),
    ("kept", "keep"), ("held", "hold"), ("wrote", "write"), ("written", "write"),
    ("writing", "write"), ("stood", "stand"), ("heard", "hear"), ("meant", "mean"),
    ("met", "meet"), ("paid", "pay"), ("sat", "sit"), ("spoke", "speak"), ("spoken", "speak"),
    ("led", "lead"), ("grew", "grow"), ("grown", "grow"), ("lost", "lose"), ("fell", "fall"),
    ("fallen", "fall"), ("sent", "send"), ("built", "build"), ("understood", "understand"),
    ("drew", "draw"), ("drawn", "draw"), ("broke", "break"), ("broken", "break"),
    ("spent", "spend"), ("rose", "rise"), ("risen", "rise"), ("drove", "drive"),
    ("driven", "drive"), ("bought", "buy"), ("wore", "wear"), ("worn", "wear"),
    ("chose", "choose"), ("chosen", "choose"), ("ate", "eat"), ("eaten", "eat"),
    ("found", "find"), ("sold", "sell"), ("taught", "teach"), ("caught", "catch"),
    ("fought", "fight"), ("sought", "seek"), ("threw", "throw"), ("thrown", "throw"),
    ("flew", "fly"), ("flown", "fly"), ("forgot", "forget"), ("forgotten", "forget"),
    ("hid", "hide"), ("hidden", "hide"), ("shot", "shoot"), ("slept", "sleep"),
    ("stole", "steal"), ("stolen", "steal"), ("struck", "strike"), ("swam", "swim"),
    ("woke", "wake"), ("done", "do"), ("dying", "die"), ("lying", "lie"), ("tying", "tie"),
];

/// Verbs whose base ends in `ee`, so `-eed` loses only the `d`. Every other
/// `-eed` word (need, proceed, feed) is already a base form.
const EE_VERBS: &[&str] = &["agree", "disagree", "free", "guarantee", "decree", "referee"];

const ADJECTIVE_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
    ("less", "little"), ("elder", "old"), ("eldest", "old"),
];

const ADVERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("best", "well"), ("better", "well"), ("deeper", "deeply"), ("farther", "far"),
    ("further", "far"), ("harder", "hard"), ("hardest", "hard"),
];

/// WordNet-morphy style lemmatizer.
///
/// Lookup order: exact lexicon entry, pass-through for forms with uppercase
/// letters (the WordNet index is lowercase and is not case-folded on lookup),
/// then either the loaded WordNet database or, without one, the built-in
/// exception tables and per-pos suffix detachment.
#[derive(Debug, Clone, Default)]
pub struct MorphyLemmatizer {
    lexicon: HashMap<(String, SimplePos), String>,
    wordnet: Option<WordNet>,
}

impl MorphyLemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexicon<I, W, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, SimplePos, L)>,
        W: Into<String>,
        L: Into<String>,
    {
        Self {
            lexicon: entries
                .into_iter()
                .map(|(w, pos, l)| ((w.into(), pos), l.into()))
                .collect(),
            wordnet: None,
        }
    }

    /// Resolve forms against a WordNet database instead of the built-in rules.
    pub fn with_wordnet(mut self, wordnet: WordNet) -> Self {
        self.wordnet = Some(wordnet);
        self
    }

    /// Load a `word<TAB>pos<TAB>lemma` lexicon (pos one of `n v a s r`).
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
            let entry = match line.split('\t').collect::<Vec<_>>().as_slice() {
                [word, pos, lemma] if !word.is_empty() && !lemma.is_empty() => {
                    SimplePos::from_wordnet(pos).map(|pos| ((word.to_string(), pos), lemma.to_string()))
                }
                _ => None,
            };
            let Some((key, lemma)) = entry else {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "{}:{}: expected word<TAB>pos<TAB>lemma",
                    path.display(),
                    lineno + 1
                )));
            };
            lexicon.insert(key, lemma);
        }

        tracing::debug!(path = %path.display(), entries = lexicon.len(), "Loaded lemma lexicon");
        Ok(Self {
            lexicon,
            wordnet: None,
        })
    }

    pub fn lexicon_len(&self) -> usize {
        self.lexicon.len()
    }
}

impl Lemmatizer for MorphyLemmatizer {
    fn lemmatize(&self, word: &str, pos: SimplePos) -> std::result::Result<String, TokenError> {
        if word.is_empty() {
            return Err(TokenError::EmptyToken);
        }
        if let Some(lemma) = self.lexicon.get(&(word.to_string(), pos)) {
            return Ok(lemma.clone());
        }
        if word.bytes().any(|b| b.is_ascii_uppercase()) {
            return Ok(word.to_string());
        }
        if let Some(wordnet) = &self.wordnet {
            return Ok(wordnet.lemmatize(word, pos));
        }

        let exceptions = match pos {
            SimplePos::Noun => NOUN_EXCEPTIONS,
            SimplePos::Verb => VERB_EXCEPTIONS,
            SimplePos::Adjective => ADJECTIVE_EXCEPTIONS,
            SimplePos::Adverb => ADVERB_EXCEPTIONS,
        };
        if let Some((_, lemma)) = exceptions.iter().find(|(form, _)| *form == word) {
            return Ok(lemma.to_string());
        }

        Ok(match pos {
            SimplePos::Noun => noun_lemma(word),
            SimplePos::Verb => verb_lemma(word),
            SimplePos::Adjective => adjective_lemma(word),
            SimplePos::Adverb => word.to_string(),
        })
    }
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn is_consonant(b: u8) -> bool {
    b.is_ascii_alphabetic() && !is_vowel(b)
}

fn has_vowel(stem: &str) -> bool {
    stem.bytes().any(|b| is_vowel(b) || b == b'y')
}

/// Consonant, single vowel, doubled consonant: the doubling added by a suffix
/// (`runn`, `stopp`). Bases that end doubled themselves (`add`, `egg`) don't match.
fn ends_with_double_consonant(stem: &str) -> bool {
    let b = stem.as_bytes();
    let n = b.len();
    n >= 4
        && b[n - 1] == b[n - 2]
        && is_consonant(b[n - 1])
        && !matches!(b[n - 1], b'l' | b's' | b'z' | b'f')
        && is_vowel(b[n - 3])
        && is_consonant(b[n - 4])
}

/// Short consonant-vowel-consonant stem that lost a silent `e` (`mak`, `hop`).
fn is_short_cvc(stem: &str) -> bool {
    let b = stem.as_bytes();
    b.len() == 3
        && is_consonant(b[0])
        && is_vowel(b[1])
        && is_consonant(b[2])
        && !matches!(b[2], b'w' | b'x' | b'y')
}

fn needs_silent_e(stem: &str) -> bool {
    let b = stem.as_bytes();
    let Some(&last) = b.last() else {
        return false;
    };
    let prev = b.len().checked_sub(2).map(|i| b[i]);
    let before_prev = b.len().checked_sub(3).map(|i| b[i]);

    // a vowel standing alone, with the `u` of `qu` counted as a consonant
    let single_vowel = prev.is_some_and(is_vowel)
        && match before_prev {
            None => true,
            Some(b'u') => b.len() >= 4 && b[b.len() - 4] == b'q',
            Some(bp) => !is_vowel(bp),
        };

    match last {
        b'c' | b'v' => true,
        b'z' => prev != Some(b'z'),
        // vowel + s: caus(e), clos(e), us(e)
        b's' => prev.is_some_and(is_vowel) && prev != before_prev,
        // consonant + l: troubl(e), settl(e)
        b'l' => prev.is_some_and(|p| is_consonant(p) && p != b'l'),
        // consonant + at: updat(e), stat(e); negotiat(e), evaluat(e), creat(e)
        b't' => {
            (prev == Some(b'a') && before_prev.is_some_and(is_consonant))
                || ["iat", "uat", "creat"].iter().any(|end| stem.ends_with(end))
        }
        // charg(e), judg(e), manag(e), wag(e), chang(e), challeng(e), plung(e)
        b'g' => match prev {
            Some(b'r' | b'd' | b'l') => true,
            Some(b'n') => {
                (stem.ends_with("ang") && b.len() > 4)
                    || stem.ends_with("eng")
                    || stem.ends_with("ung")
            }
            Some(p) => is_vowel(p),
            None => false,
        },
        // shar(e), requir(e), cur(e); clear, pour and answer stay
        b'r' => match prev {
            Some(b'a' | b'i' | b'u') => single_vowel,
            Some(b'o') => {
                b.len() == 3
                    || ["gnor", "plor", "stor", "scor", "snor", "ador"]
                        .iter()
                        .any(|end| stem.ends_with(end))
            }
            _ => false,
        },
        _ => is_short_cvc(stem),
    }
}

/// Rebuild a verb stem after `-ing` / `-ed` removal.
fn restore_stem(stem: &str) -> String {
    if ends_with_double_consonant(stem) {
        stem[..stem.len() - 1].to_string()
    } else if needs_silent_e(stem) {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn noun_lemma(word: &str) -> String {
    if word.len() <= 3 || ["ss", "us", "is", "ics"].iter().any(|end| word.ends_with(end)) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if word.len() > 4 {
            return format!("{stem}y");
        }
    }
    if ["sses", "xes", "zes", "ches", "shes"].iter().any(|end| word.ends_with(end)) {
        return word[..word.len() - 2].to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

fn verb_lemma(word: &str) -> String {
    if word.len() <= 3 {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
        // dies / tied keep the e; studies / carried take a y
        return if word.len() > 4 {
            format!("{stem}y")
        } else {
            format!("{stem}ie")
        };
    }
    if let Some(stem) = word.strip_suffix("ing") {
        if word.len() > 4 && has_vowel(stem) {
            return restore_stem(stem);
        }
        return word.to_string();
    }
    if word.ends_with("eed") {
        let base = &word[..word.len() - 1];
        return if EE_VERBS.contains(&base) {
            base.to_string()
        } else {
            word.to_string()
        };
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if has_vowel(stem) {
            return restore_stem(stem);
        }
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("es") {
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| stem.ends_with(end)) {
            return stem.to_string();
        }
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|end| word.ends_with(end)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn adjective_lemma(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("iest") {
        if word.len() > 5 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("ier") {
        if word.len() > 4 {
            return format!("{stem}y");
        }
    }
    for suffix in ["est", "er"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.len() >= 3 && ends_with_double_consonant(stem) {
                return stem[..stem.len() - 1].to_string();
            }
        }
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str, pos: SimplePos) -> String {
        MorphyLemmatizer::new().lemmatize(word, pos).unwrap()
    }

    #[test]
    fn noun_plurals() {
        assert_eq!(lemma("cats", SimplePos::Noun), "cat");
        assert_eq!(lemma("policies", SimplePos::Noun), "policy");
        assert_eq!(lemma("boxes", SimplePos::Noun), "box");
        assert_eq!(lemma("churches", SimplePos::Noun), "church");
        assert_eq!(lemma("houses", SimplePos::Noun), "house");
        assert_eq!(lemma("children", SimplePos::Noun), "child");
    }

    #[test]
    fn nouns_that_only_look_plural() {
        assert_eq!(lemma("class", SimplePos::Noun), "class");
        assert_eq!(lemma("virus", SimplePos::Noun), "virus");
        assert_eq!(lemma("crisis", SimplePos::Noun), "crisis");
        assert_eq!(lemma("politics", SimplePos::Noun), "politics");
        assert_eq!(lemma("news", SimplePos::Noun), "news");
        assert_eq!(lemma("gas", SimplePos::Noun), "gas");
    }

    #[test]
    fn progressive_forms() {
        assert_eq!(lemma("running", SimplePos::Verb), "run");
        assert_eq!(lemma("making", SimplePos::Verb), "make");
        assert_eq!(lemma("giving", SimplePos::Verb), "give");
        assert_eq!(lemma("calling", SimplePos::Verb), "call");
        assert_eq!(lemma("using", SimplePos::Verb), "use");
        assert_eq!(lemma("saying", SimplePos::Verb), "say");
        assert_eq!(lemma("dying", SimplePos::Verb), "die");
    }

    #[test]
    fn past_forms() {
        assert_eq!(lemma("announced", SimplePos::Verb), "announce");
        assert_eq!(lemma("stopped", SimplePos::Verb), "stop");
        assert_eq!(lemma("wanted", SimplePos::Verb), "want");
        assert_eq!(lemma("updated", SimplePos::Verb), "update");
        assert_eq!(lemma("troubled", SimplePos::Verb), "trouble");
        assert_eq!(lemma("carried", SimplePos::Verb), "carry");
        assert_eq!(lemma("died", SimplePos::Verb), "die");
        assert_eq!(lemma("went", SimplePos::Verb), "go");
        assert_eq!(lemma("need", SimplePos::Verb), "need");
    }

    #[test]
    fn third_person_forms() {
        assert_eq!(lemma("makes", SimplePos::Verb), "make");
        assert_eq!(lemma("passes", SimplePos::Verb), "pass");
        assert_eq!(lemma("studies", SimplePos::Verb), "study");
        assert_eq!(lemma("says", SimplePos::Verb), "say");
    }

    #[test]
    fn adjective_comparatives() {
        assert_eq!(lemma("happier", SimplePos::Adjective), "happy");
        assert_eq!(lemma("biggest", SimplePos::Adjective), "big");
        assert_eq!(lemma("better", SimplePos::Adjective), "good");
        assert_eq!(lemma("other", SimplePos::Adjective), "other");
        assert_eq!(lemma("dangerous", SimplePos::Adjective), "dangerous");
    }

    #[test]
    fn adverbs_only_change_by_exception() {
        assert_eq!(lemma("quickly", SimplePos::Adverb), "quickly");
        assert_eq!(lemma("harder", SimplePos::Adverb), "hard");
    }

    #[test]
    fn capitalized_forms_pass_through() {
        assert_eq!(lemma("Cats", SimplePos::Noun), "Cats");
        assert_eq!(lemma("RUNNING", SimplePos::Verb), "RUNNING");
    }

    #[test]
    fn lexicon_overrides_rules() {
        let lemmatizer = MorphyLemmatizer::with_lexicon([
            ("creating", SimplePos::Verb, "create"),
            ("Delhi", SimplePos::Noun, "delhi"),
        ]);
        assert_eq!(lemmatizer.lemmatize("creating", SimplePos::Verb).unwrap(), "create");
        assert_eq!(lemmatizer.lemmatize("Delhi", SimplePos::Noun).unwrap(), "delhi");
        assert_eq!(lemmatizer.lemmatize("creating", SimplePos::Noun).unwrap(), "creating");
    }

    #[test]
    fn doubled_bases_keep_their_double_letter() {
        assert_eq!(lemma("added", SimplePos::Verb), "add");
        assert_eq!(lemma("adding", SimplePos::Verb), "add");
        assert_eq!(lemma("egged", SimplePos::Verb), "egg");
        assert_eq!(lemma("occurred", SimplePos::Verb), "occur");
        assert_eq!(lemma("planned", SimplePos::Verb), "plan");
    }

    #[test]
    fn silent_e_after_g_r_and_t() {
        assert_eq!(lemma("changed", SimplePos::Verb), "change");
        assert_eq!(lemma("charged", SimplePos::Verb), "charge");
        assert_eq!(lemma("managing", SimplePos::Verb), "manage");
        assert_eq!(lemma("belonging", SimplePos::Verb), "belong");
        assert_eq!(lemma("shared", SimplePos::Verb), "share");
        assert_eq!(lemma("required", SimplePos::Verb), "require");
        assert_eq!(lemma("ignored", SimplePos::Verb), "ignore");
        assert_eq!(lemma("cleared", SimplePos::Verb), "clear");
        assert_eq!(lemma("answered", SimplePos::Verb), "answer");
        assert_eq!(lemma("created", SimplePos::Verb), "create");
        assert_eq!(lemma("negotiated", SimplePos::Verb), "negotiate");
        assert_eq!(lemma("treated", SimplePos::Verb), "treat");
    }

    #[test]
    fn eed_endings() {
        assert_eq!(lemma("agreed", SimplePos::Verb), "agree");
        assert_eq!(lemma("guaranteed", SimplePos::Verb), "guarantee");
        assert_eq!(lemma("proceed", SimplePos::Verb), "proceed");
        assert_eq!(lemma("exceeded", SimplePos::Verb), "exceed");
    }

    #[test]
    fn wordnet_replaces_the_builtin_rules() {
        let mut wordnet = WordNet::default();
        wordnet.read_index(SimplePos::Verb, "add v 1 0 1 0 01\nneed v 1 0 1 0 02\n");
        let lemmatizer = MorphyLemmatizer::with_lexicon([("adds", SimplePos::Verb, "sum")])
            .with_wordnet(wordnet);

        assert_eq!(lemmatizer.lemmatize("adds", SimplePos::Verb).unwrap(), "sum");
        assert_eq!(lemmatizer.lemmatize("added", SimplePos::Verb).unwrap(), "add");
        assert_eq!(lemmatizer.lemmatize("needed", SimplePos::Verb).unwrap(), "need");
        // only the built-in table knows this one
        assert_eq!(lemmatizer.lemmatize("went", SimplePos::Verb).unwrap(), "went");
        assert_eq!(lemmatizer.lemmatize("Added", SimplePos::Verb).unwrap(), "Added");
    }

    #[test]
    fn empty_word_fails() {
        assert_eq!(
            MorphyLemmatizer::new().lemmatize("", SimplePos::Noun),
            Err(TokenError::EmptyToken)
        );
    }

    #[test]
    fn lexicon_file_rejects_unknown_pos() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"geese\tn\tgoose\nran\tx\trun\n").unwrap();
        let err = MorphyLemmatizer::from_lexicon_file(file.path()).unwrap_err();
        assert!(err.to_string().contains(":2:"));
    }

    #[test]
    fn lexicon_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"# word pos lemma\nopening\tv\topen\nbetter\ts\tgood\n")
            .unwrap();
        let lemmatizer = MorphyLemmatizer::from_lexicon_file(file.path()).unwrap();
        assert_eq!(lemmatizer.lexicon_len(), 2);
        assert_eq!(lemmatizer.lemmatize("opening", SimplePos::Verb).unwrap(), "open");
    }
}
