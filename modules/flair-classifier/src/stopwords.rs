use std::collections::HashSet;
use std::sync::LazyLock;

/// NLTK's English stopword corpus.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// ASCII punctuation, each character treated as its own stop token.
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

static STOP_TOKENS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    ENGLISH_STOPWORDS
        .iter()
        .map(|w| w.to_string())
        .chain(PUNCTUATION.chars().map(String::from))
        .collect()
});

/// True if the already-lowercased token is a stopword or a single punctuation mark.
pub fn is_stop_token(lowercase: &str) -> bool {
    STOP_TOKENS.contains(lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_size() {
        assert_eq!(ENGLISH_STOPWORDS.len(), 179);
        assert_eq!(PUNCTUATION.len(), 32);
    }

    #[test]
    fn stopwords_and_punctuation_match() {
        assert!(is_stop_token("the"));
        assert!(is_stop_token("wouldn't"));
        assert!(is_stop_token("?"));
        assert!(is_stop_token("\\"));
    }

    #[test]
    fn content_words_and_punctuation_runs_do_not_match() {
        assert!(!is_stop_token("government"));
        assert!(!is_stop_token("would"));
        assert!(!is_stop_token("!!"));
        assert!(!is_stop_token(""));
    }
}
