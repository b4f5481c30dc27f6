use std::path::PathBuf;

use crate::cleaner::{CleanedText, TextCleaner};
use crate::error::{ClassifierError, Result};
use crate::lemmatizer::MorphyLemmatizer;
use crate::model::{Classifier, Label};
use crate::normalize::normalize;
use crate::tagger::RuleTagger;
use crate::vectorizer::FeatureVectorizer;
use crate::wordnet::WordNet;

/// Where the pretrained artifacts live on disk.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub transform: PathBuf,
    pub tagger_lexicon: Option<PathBuf>,
    pub lemma_lexicon: Option<PathBuf>,
    /// WordNet `dict/` directory; without it the lemmatizer uses its built-in rules.
    pub wordnet: Option<PathBuf>,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, transform: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            transform: transform.into(),
            tagger_lexicon: None,
            lemma_lexicon: None,
            wordnet: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub label: Label,
    pub cleaned: CleanedText,
}

/// Raw text in, flair out: normalize, clean, vectorize, classify.
pub struct Predictor {
    cleaner: TextCleaner,
    vectorizer: FeatureVectorizer,
    classifier: Classifier,
}

impl Predictor {
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let tagger = match &paths.tagger_lexicon {
            Some(path) => RuleTagger::from_lexicon_file(path)?,
            None => RuleTagger::new(),
        };
        let mut lemmatizer = match &paths.lemma_lexicon {
            Some(path) => MorphyLemmatizer::from_lexicon_file(path)?,
            None => MorphyLemmatizer::new(),
        };
        if let Some(dir) = &paths.wordnet {
            lemmatizer = lemmatizer.with_wordnet(WordNet::load(dir)?);
        }

        let predictor = Self::from_parts(
            TextCleaner::new(Box::new(tagger), Box::new(lemmatizer)),
            FeatureVectorizer::load(&paths.transform)?,
            Classifier::load(&paths.model)?,
        )?;

        tracing::info!(labels = ?predictor.labels(), "Predictor ready");
        Ok(predictor)
    }

    /// Assemble a predictor, rejecting a transform and model that disagree on
    /// the number of features.
    pub fn from_parts(
        cleaner: TextCleaner,
        vectorizer: FeatureVectorizer,
        classifier: Classifier,
    ) -> Result<Self> {
        if vectorizer.num_features() != classifier.num_features() {
            return Err(ClassifierError::ShapeMismatch {
                expected: classifier.num_features(),
                actual: vectorizer.num_features(),
            });
        }
        Ok(Self {
            cleaner,
            vectorizer,
            classifier,
        })
    }

    pub fn predict(&self, raw_text: &str) -> Result<Prediction> {
        let cleaned = self.cleaner.clean(&normalize(raw_text));
        let features = self.vectorizer.transform(&cleaned);
        let label = self.classifier.predict(&features)?;

        tracing::debug!(
            %label,
            tokens = cleaned.tokens().count(),
            active_features = features.nnz(),
            "Classified text"
        );
        Ok(Prediction { label, cleaned })
    }

    pub fn labels(&self) -> &[Label] {
        self.classifier.labels()
    }
}
