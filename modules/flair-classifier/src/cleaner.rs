use std::fmt;

use crate::error::TokenError;
use crate::lemmatizer::{Lemmatizer, MorphyLemmatizer};
use crate::stopwords::is_stop_token;
use crate::tagger::{PosTagger, RuleTagger, SimplePos};

/// Space-joined lowercase lemmas, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedText(String);

impl CleanedText {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = String::new();
        for token in tokens {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token.as_ref());
        }
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CleanedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happened to a single input token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Kept(String),
    Stopword,
    Dropped(TokenError),
}

/// Stopword removal, POS tagging and lemmatization of normalized text.
pub struct TextCleaner {
    tagger: Box<dyn PosTagger>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new(Box::new(RuleTagger::new()), Box::new(MorphyLemmatizer::new()))
    }
}

impl TextCleaner {
    pub fn new(tagger: Box<dyn PosTagger>, lemmatizer: Box<dyn Lemmatizer>) -> Self {
        Self { tagger, lemmatizer }
    }

    /// Run one whitespace-delimited token through the cleaning steps.
    pub fn clean_token(&self, raw: &str) -> TokenOutcome {
        let word: String = raw.chars().filter(char::is_ascii).collect();
        if is_stop_token(&word.to_ascii_lowercase()) {
            return TokenOutcome::Stopword;
        }

        let lemma = self
            .tagger
            .tag(&word)
            .map(|tag| SimplePos::from_treebank(&tag))
            .and_then(|pos| self.lemmatizer.lemmatize(&word, pos));

        match lemma {
            Ok(lemma) => TokenOutcome::Kept(lemma.to_ascii_lowercase()),
            Err(e) => TokenOutcome::Dropped(e),
        }
    }

    /// Clean every token, keeping order. Stopwords and failed tokens are left out.
    pub fn clean_tokens(&self, text: &str) -> Vec<String> {
        split_tokens(text)
            .filter_map(|raw| match self.clean_token(raw) {
                TokenOutcome::Kept(lemma) => Some(lemma),
                TokenOutcome::Stopword => None,
                TokenOutcome::Dropped(reason) => {
                    tracing::trace!(token = raw, %reason, "Dropping token");
                    None
                }
            })
            .collect()
    }

    pub fn clean(&self, text: &str) -> CleanedText {
        CleanedText::from_tokens(self.clean_tokens(text))
    }
}

/// Split on whitespace, including the ASCII file/group/record/unit separators
/// that Python's `str.split()` also treats as whitespace.
fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopwords::{ENGLISH_STOPWORDS, PUNCTUATION};

    #[test]
    fn stopwords_removed_and_lemmas_lowercased() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean_tokens("The cats are running"), vec!["cat", "run"]);
    }

    #[test]
    fn capitalized_words_are_lowercased_but_not_lemmatized() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean("Cats chased dogs").as_str(), "cats chase dog");
    }

    #[test]
    fn emoji_is_stripped_from_tokens() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean_tokens("policy🔥 🙏"), vec!["policy"]);
    }

    #[test]
    fn emoji_only_token_is_dropped_explicitly() {
        let cleaner = TextCleaner::default();
        assert_eq!(
            cleaner.clean_token("🙏"),
            TokenOutcome::Dropped(TokenError::EmptyToken)
        );
    }

    #[test]
    fn stopword_outcome() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean_token("THE"), TokenOutcome::Stopword);
        assert_eq!(cleaner.clean_token("?"), TokenOutcome::Stopword);
    }

    #[test]
    fn no_stopword_or_punctuation_is_emitted() {
        let cleaner = TextCleaner::default();
        let mut text = ENGLISH_STOPWORDS.join(" ").to_uppercase();
        for c in PUNCTUATION.chars() {
            text.push(' ');
            text.push(c);
        }
        text.push_str(" lockdown extended");
        assert_eq!(cleaner.clean_tokens(&text), vec!["lockdown", "extend"]);
    }

    #[test]
    fn common_words_lemmatize_to_dictionary_forms() {
        let cleaner = TextCleaner::default();
        let cases = [
            ("nothing", "nothing"),
            ("something", "something"),
            ("everything", "everything"),
            ("morning", "morning"),
            ("added", "add"),
            ("adding", "add"),
            ("changed", "change"),
            ("charged", "charge"),
            ("shared", "share"),
            ("created", "create"),
            ("required", "require"),
            ("agreed", "agree"),
            ("hundred", "hundred"),
        ];
        for (word, expected) in cases {
            assert_eq!(cleaner.clean(word).as_str(), expected, "lemma of {word}");
        }
    }

    #[test]
    fn token_count_never_grows() {
        let cleaner = TextCleaner::default();
        let text = "Government announced new policy and the opposition responded quickly 🙏 !";
        let input = split_tokens(text).count();
        assert!(cleaner.clean_tokens(text).len() <= input);
    }

    #[test]
    fn python_whitespace_separators_split_tokens() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean_tokens("vaccine\u{1f}trial"), vec!["vaccine", "trial"]);
    }

    struct FailingTagger;

    impl PosTagger for FailingTagger {
        fn tag(&self, token: &str) -> Result<String, TokenError> {
            if token == "bad" {
                Err(TokenError::Untaggable(token.to_string()))
            } else {
                Ok("NN".to_string())
            }
        }
    }

    #[test]
    fn failed_tokens_are_skipped_and_processing_continues() {
        let cleaner = TextCleaner::new(Box::new(FailingTagger), Box::new(MorphyLemmatizer::new()));
        assert_eq!(cleaner.clean_tokens("good bad votes"), vec!["good", "vote"]);
    }

    #[test]
    fn cleaned_text_tokens() {
        let cleaned = CleanedText::from_tokens(["cat", "run"]);
        assert_eq!(cleaned.as_str(), "cat run");
        assert_eq!(cleaned.tokens().collect::<Vec<_>>(), vec!["cat", "run"]);
        assert!(CleanedText::default().is_empty());
    }
}
