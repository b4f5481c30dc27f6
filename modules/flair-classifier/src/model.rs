use std::fmt;
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::vectorizer::FeatureVector;

/// A flair name, e.g. `Politics` or `AskIndia`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON export of a fitted scikit-learn estimator.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// `LogisticRegression`, `LinearSVC`, `SGDClassifier` and friends.
    Linear {
        classes: Vec<Label>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    MultinomialNb {
        classes: Vec<Label>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

#[derive(Debug, Clone)]
enum Estimator {
    /// One weight row per class, or a single row for binary problems.
    Linear {
        coef: Array2<f64>,
        intercept: Array1<f64>,
    },
    MultinomialNb {
        class_log_prior: Array1<f64>,
        feature_log_prob: Array2<f64>,
    },
}

/// Pretrained flair classifier. Immutable after load.
#[derive(Debug, Clone)]
pub struct Classifier {
    classes: Vec<Label>,
    estimator: Estimator,
    num_features: usize,
}

impl Classifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ClassifierError::io(path, e))?;
        let classifier = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            classes = classifier.classes.len(),
            features = classifier.num_features,
            "Loaded classifier"
        );
        Ok(classifier)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::try_from(artifact)
    }

    pub fn labels(&self) -> &[Label] {
        &self.classes
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Highest-scoring class. Ties go to the class listed first.
    pub fn predict(&self, features: &FeatureVector) -> Result<Label> {
        if features.len() != self.num_features {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        let x = features.values();

        let idx = match &self.estimator {
            Estimator::Linear { coef, intercept } => {
                let scores = coef.dot(x) + intercept;
                if scores.len() == 1 {
                    usize::from(scores[0] > 0.0)
                } else {
                    argmax(&scores)
                }
            }
            Estimator::MultinomialNb {
                class_log_prior,
                feature_log_prob,
            } => argmax(&(feature_log_prob.dot(x) + class_log_prior)),
        };

        Ok(self.classes[idx].clone())
    }
}

fn argmax(scores: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

fn to_matrix(name: &str, rows: Vec<Vec<f64>>) -> Result<Array2<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 || rows.iter().any(|r| r.len() != width) {
        return Err(ClassifierError::InvalidArtifact(format!(
            "{name} must be a non-empty rectangular matrix"
        )));
    }
    let height = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), flat)
        .map_err(|e| ClassifierError::InvalidArtifact(format!("{name}: {e}")))
}

impl TryFrom<ModelArtifact> for Classifier {
    type Error = ClassifierError;

    fn try_from(artifact: ModelArtifact) -> Result<Self> {
        let (classes, estimator) = match artifact {
            ModelArtifact::Linear {
                classes,
                coef,
                intercept,
            } => {
                let coef = to_matrix("coef", coef)?;
                let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
                if coef.nrows() != expected_rows && coef.nrows() != classes.len() {
                    return Err(ClassifierError::InvalidArtifact(format!(
                        "coef has {} rows for {} classes",
                        coef.nrows(),
                        classes.len()
                    )));
                }
                if intercept.len() != coef.nrows() {
                    return Err(ClassifierError::InvalidArtifact(format!(
                        "intercept has {} entries for {} coef rows",
                        intercept.len(),
                        coef.nrows()
                    )));
                }
                let estimator = Estimator::Linear {
                    coef,
                    intercept: Array1::from(intercept),
                };
                (classes, estimator)
            }
            ModelArtifact::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                let feature_log_prob = to_matrix("feature_log_prob", feature_log_prob)?;
                if feature_log_prob.nrows() != classes.len() || class_log_prior.len() != classes.len()
                {
                    return Err(ClassifierError::InvalidArtifact(format!(
                        "naive bayes tables do not match {} classes",
                        classes.len()
                    )));
                }
                let estimator = Estimator::MultinomialNb {
                    class_log_prior: Array1::from(class_log_prior),
                    feature_log_prob,
                };
                (classes, estimator)
            }
        };

        if classes.len() < 2 {
            return Err(ClassifierError::InvalidArtifact(
                "a classifier needs at least two classes".into(),
            ));
        }

        let num_features = match &estimator {
            Estimator::Linear { coef, .. } => coef.ncols(),
            Estimator::MultinomialNb {
                feature_log_prob, ..
            } => feature_log_prob.ncols(),
        };

        Ok(Self {
            classes,
            estimator,
            num_features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn features(values: Array1<f64>) -> FeatureVector {
        FeatureVector::new(values)
    }

    const LINEAR: &str = r#"{
        "kind": "linear",
        "classes": ["Politics", "Sports", "Science"],
        "coef": [[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]],
        "intercept": [0.0, 0.0, 0.1]
    }"#;

    #[test]
    fn linear_picks_highest_score() {
        let model = Classifier::from_json(LINEAR).unwrap();
        assert_eq!(model.predict(&features(array![1.0, 0.0])).unwrap(), Label::new("Politics"));
        assert_eq!(model.predict(&features(array![0.0, 1.0])).unwrap(), Label::new("Sports"));
        assert_eq!(model.predict(&features(array![0.0, 0.0])).unwrap(), Label::new("Science"));
    }

    #[test]
    fn binary_linear_uses_sign_of_single_row() {
        let model = Classifier::from_json(
            r#"{"kind": "linear", "classes": ["AskIndia", "Politics"], "coef": [[2.0, -1.0]], "intercept": [0.0]}"#,
        )
        .unwrap();
        assert_eq!(model.predict(&features(array![1.0, 0.0])).unwrap().as_str(), "Politics");
        assert_eq!(model.predict(&features(array![0.0, 1.0])).unwrap().as_str(), "AskIndia");
        assert_eq!(model.predict(&features(array![0.0, 0.0])).unwrap().as_str(), "AskIndia");
    }

    #[test]
    fn naive_bayes_adds_log_prior() {
        let model = Classifier::from_json(
            r#"{
                "kind": "multinomial_nb",
                "classes": ["Food", "Sports"],
                "class_log_prior": [-0.1, -2.0],
                "feature_log_prob": [[-3.0, -0.5], [-0.2, -3.0]]
            }"#,
        )
        .unwrap();
        assert_eq!(model.predict(&features(array![0.0, 0.0])).unwrap().as_str(), "Food");
        assert_eq!(model.predict(&features(array![3.0, 0.0])).unwrap().as_str(), "Sports");
    }

    #[test]
    fn ties_go_to_first_class() {
        let model = Classifier::from_json(
            r#"{"kind": "linear", "classes": ["A", "B", "C"], "coef": [[0.0], [0.0], [0.0]], "intercept": [0.0, 0.0, 0.0]}"#,
        )
        .unwrap();
        assert_eq!(model.predict(&features(array![1.0])).unwrap().as_str(), "A");
    }

    #[test]
    fn wrong_feature_count_is_a_shape_mismatch() {
        let model = Classifier::from_json(LINEAR).unwrap();
        let err = model.predict(&features(array![1.0, 0.0, 0.0])).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::ShapeMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn inconsistent_artifacts_are_rejected() {
        let ragged = r#"{"kind": "linear", "classes": ["A", "B", "C"], "coef": [[1.0], [1.0, 2.0], [0.0]], "intercept": [0.0, 0.0, 0.0]}"#;
        assert!(matches!(
            Classifier::from_json(ragged).unwrap_err(),
            ClassifierError::InvalidArtifact(_)
        ));

        let short_intercept = r#"{"kind": "linear", "classes": ["A", "B", "C"], "coef": [[1.0], [1.0], [0.0]], "intercept": [0.0]}"#;
        assert!(Classifier::from_json(short_intercept).is_err());

        let one_class = r#"{"kind": "linear", "classes": ["A"], "coef": [[1.0]], "intercept": [0.0]}"#;
        assert!(Classifier::from_json(one_class).is_err());

        let unknown = r#"{"kind": "random_forest", "classes": ["A", "B"]}"#;
        assert!(matches!(
            Classifier::from_json(unknown).unwrap_err(),
            ClassifierError::Parse(_)
        ));
    }

    #[test]
    fn labels_keep_artifact_order() {
        let model = Classifier::from_json(LINEAR).unwrap();
        let names: Vec<_> = model.labels().iter().map(Label::as_str).collect();
        assert_eq!(names, vec!["Politics", "Sports", "Science"]);
        assert_eq!(model.num_features(), 2);
    }
}
