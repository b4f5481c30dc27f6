pub mod cleaner;
pub mod error;
pub mod lemmatizer;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod stopwords;
pub mod tagger;
pub mod vectorizer;
pub mod wordnet;

pub use cleaner::{CleanedText, TextCleaner, TokenOutcome};
pub use error::{ClassifierError, Result, TokenError};
pub use lemmatizer::{Lemmatizer, MorphyLemmatizer};
pub use model::{Classifier, Label};
pub use normalize::normalize;
pub use pipeline::{ArtifactPaths, Prediction, Predictor};
pub use tagger::{PosTagger, RuleTagger, SimplePos};
pub use vectorizer::{FeatureVector, FeatureVectorizer, Norm};
pub use wordnet::WordNet;
