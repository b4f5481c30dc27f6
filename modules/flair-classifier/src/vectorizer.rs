use std::collections::HashMap;
use std::path::Path;

use ndarray::Array1;
use regex::Regex;
use serde::Deserialize;

use crate::cleaner::CleanedText;
use crate::error::{ClassifierError, Result};

/// Dense feature row produced by [`FeatureVectorizer::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Array1<f64>);

impl FeatureVector {
    pub fn new(values: Array1<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.0
    }

    /// Number of non-zero features.
    pub fn nnz(&self) -> usize {
        self.0.iter().filter(|v| **v != 0.0).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    #[default]
    L2,
    None,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_token_pattern() -> String {
    r"(?u)\b\w\w+\b".to_string()
}

/// JSON export of a fitted scikit-learn `TfidfVectorizer` / `CountVectorizer`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformArtifact {
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

/// Pretrained bag-of-words transform. Immutable after load.
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Array1<f64>>,
    ngram_range: (usize, usize),
    lowercase: bool,
    token_re: Regex,
    binary: bool,
    sublinear_tf: bool,
    norm: Norm,
}

impl FeatureVectorizer {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ClassifierError::io(path, e))?;
        let vectorizer = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            features = vectorizer.num_features(),
            tfidf = vectorizer.idf.is_some(),
            "Loaded feature transform"
        );
        Ok(vectorizer)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: TransformArtifact = serde_json::from_str(json)?;
        Self::try_from(artifact)
    }

    pub fn num_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vectorize one document.
    pub fn transform(&self, text: &CleanedText) -> FeatureVector {
        self.transform_str(text.as_str())
    }

    pub fn transform_str(&self, text: &str) -> FeatureVector {
        let mut row = Array1::<f64>::zeros(self.num_features());
        for term in self.terms(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                row[idx] += 1.0;
            }
        }

        if self.binary {
            row.mapv_inplace(|tf| if tf > 0.0 { 1.0 } else { 0.0 });
        } else if self.sublinear_tf {
            row.mapv_inplace(|tf| if tf > 0.0 { 1.0 + tf.ln() } else { 0.0 });
        }
        if let Some(idf) = &self.idf {
            row *= idf;
        }

        let norm = match self.norm {
            Norm::L1 => row.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::L2 => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::None => 0.0,
        };
        if norm > 0.0 {
            row /= norm;
        }

        FeatureVector(row)
    }

    /// Word n-grams of the configured range, joined by single spaces.
    fn terms(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = self.token_re.find_iter(&text).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}

impl TryFrom<TransformArtifact> for FeatureVectorizer {
    type Error = ClassifierError;

    fn try_from(artifact: TransformArtifact) -> Result<Self> {
        let size = artifact.vocabulary.len();
        if size == 0 {
            return Err(ClassifierError::InvalidArtifact("empty vocabulary".into()));
        }

        let mut seen = vec![false; size];
        for (term, &idx) in &artifact.vocabulary {
            if idx >= size || std::mem::replace(&mut seen[idx], true) {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "vocabulary index {idx} for {term:?} is out of range or duplicated"
                )));
            }
        }

        if let Some(idf) = &artifact.idf {
            if idf.len() != size {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "idf has {} entries for a vocabulary of {size}",
                    idf.len()
                )));
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::InvalidArtifact(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        Ok(Self {
            token_re: Regex::new(&artifact.token_pattern)?,
            vocabulary: artifact.vocabulary,
            idf: artifact.idf.map(Array1::from),
            ngram_range: artifact.ngram_range,
            lowercase: artifact.lowercase,
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vectorizer(extra: serde_json::Value) -> FeatureVectorizer {
        let mut artifact = json!({
            "vocabulary": {"cat": 0, "run": 1, "dog": 2, "cat run": 3}
        });
        if let (Some(base), Some(extra)) = (artifact.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        FeatureVectorizer::from_json(&artifact.to_string()).unwrap()
    }

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn counts_with_l2_norm_by_default() {
        let v = vectorizer(json!({}));
        let row = v.transform_str("cat cat run bird");
        let norm = 5f64.sqrt();
        assert!(approx(row.values().as_slice().unwrap(), &[2.0 / norm, 1.0 / norm, 0.0, 0.0]));
    }

    #[test]
    fn idf_weights_are_applied_before_normalizing() {
        let v = vectorizer(json!({"idf": [1.0, 2.0, 3.0, 4.0], "norm": "none"}));
        let row = v.transform_str("cat run run");
        assert!(approx(row.values().as_slice().unwrap(), &[1.0, 4.0, 0.0, 0.0]));
    }

    #[test]
    fn bigrams_when_configured() {
        let v = vectorizer(json!({"ngram_range": [1, 2], "norm": "none"}));
        let row = v.transform_str("cat run");
        assert!(approx(row.values().as_slice().unwrap(), &[1.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn sublinear_and_binary_tf() {
        let v = vectorizer(json!({"sublinear_tf": true, "norm": "none"}));
        let row = v.transform_str("dog dog dog");
        assert!((row.values()[2] - (1.0 + 3f64.ln())).abs() < 1e-9);

        let v = vectorizer(json!({"binary": true, "norm": "l1"}));
        let row = v.transform_str("dog dog cat");
        assert!(approx(row.values().as_slice().unwrap(), &[0.5, 0.0, 0.5, 0.0]));
    }

    #[test]
    fn default_pattern_skips_single_characters_and_lowercases() {
        let v = vectorizer(json!({"norm": "none"}));
        let row = v.transform_str("a CAT x");
        assert_eq!(row.nnz(), 1);
        assert_eq!(row.values()[0], 1.0);
    }

    #[test]
    fn unknown_text_is_all_zeros() {
        let v = vectorizer(json!({}));
        let row = v.transform(&CleanedText::from_tokens(["zebra"]));
        assert_eq!(row.len(), 4);
        assert_eq!(row.nnz(), 0);
    }

    #[test]
    fn idf_length_must_match_vocabulary() {
        let err = FeatureVectorizer::from_json(r#"{"vocabulary": {"a": 0}, "idf": [1.0, 2.0]}"#)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidArtifact(_)));
    }

    #[test]
    fn duplicate_or_out_of_range_indices_are_rejected() {
        assert!(FeatureVectorizer::from_json(r#"{"vocabulary": {"a": 0, "b": 0}}"#).is_err());
        assert!(FeatureVectorizer::from_json(r#"{"vocabulary": {"a": 3}}"#).is_err());
        assert!(FeatureVectorizer::from_json(r#"{"vocabulary": {}}"#).is_err());
    }

    #[test]
    fn bad_token_pattern_is_rejected() {
        let err = FeatureVectorizer::from_json(r#"{"vocabulary": {"a": 0}, "token_pattern": "("}"#)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::TokenPattern(_)));
    }
}
