use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{ClassifierError, Result};
use crate::tagger::SimplePos;

/// File stems of the WordNet database, one index and one exception list each.
const FILES: &[(SimplePos, &str)] = &[
    (SimplePos::Noun, "noun"),
    (SimplePos::Verb, "verb"),
    (SimplePos::Adjective, "adj"),
    (SimplePos::Adverb, "adv"),
];

fn substitutions(pos: SimplePos) -> &'static [(&'static str, &'static str)] {
    match pos {
        SimplePos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("ves", "f"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        SimplePos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        SimplePos::Adjective => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        SimplePos::Adverb => &[],
    }
}

/// Lemma index and exception lists of a WordNet `dict/` directory.
#[derive(Debug, Clone, Default)]
pub struct WordNet {
    lemmas: HashMap<SimplePos, HashSet<String>>,
    exceptions: HashMap<SimplePos, HashMap<String, Vec<String>>>,
}

impl WordNet {
    /// Load `index.{noun,verb,adj,adv}` and `{noun,verb,adj,adv}.exc` from a
    /// WordNet 3.x dictionary directory (e.g. `nltk_data/corpora/wordnet`).
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut wordnet = Self::default();

        for (pos, name) in FILES {
            let index_path = dir.join(format!("index.{name}"));
            let index = std::fs::read_to_string(&index_path)
                .map_err(|e| ClassifierError::io(&index_path, e))?;
            wordnet.read_index(*pos, &index);

            let exc_path = dir.join(format!("{name}.exc"));
            let exc = std::fs::read_to_string(&exc_path)
                .map_err(|e| ClassifierError::io(&exc_path, e))?;
            wordnet
                .read_exceptions(*pos, &exc)
                .map_err(|line| {
                    ClassifierError::InvalidArtifact(format!(
                        "{}:{line}: expected inflected form and base form",
                        exc_path.display()
                    ))
                })?;
        }

        tracing::info!(
            path = %dir.display(),
            lemmas = wordnet.lemma_count(),
            "Loaded WordNet index"
        );
        Ok(wordnet)
    }

    /// Add the lemmas of an `index.*` file. License lines start with a space.
    pub fn read_index(&mut self, pos: SimplePos, contents: &str) {
        let lemmas = self.lemmas.entry(pos).or_default();
        for line in contents.lines() {
            if line.starts_with(' ') {
                continue;
            }
            if let Some(lemma) = line.split_whitespace().next() {
                lemmas.insert(lemma.to_string());
            }
        }
    }

    /// Add the entries of a `*.exc` file. Returns the 1-based number of the
    /// first malformed line.
    pub fn read_exceptions(
        &mut self,
        pos: SimplePos,
        contents: &str,
    ) -> std::result::Result<(), usize> {
        let exceptions = self.exceptions.entry(pos).or_default();
        for (lineno, line) in contents.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(form) = fields.next() else {
                continue;
            };
            let bases: Vec<String> = fields.map(str::to_string).collect();
            if bases.is_empty() {
                return Err(lineno + 1);
            }
            exceptions.insert(form.to_string(), bases);
        }
        Ok(())
    }

    pub fn contains(&self, lemma: &str, pos: SimplePos) -> bool {
        self.lemmas.get(&pos).is_some_and(|set| set.contains(lemma))
    }

    pub fn lemma_count(&self) -> usize {
        self.lemmas.values().map(HashSet::len).sum()
    }

    /// Every base form of `form` that WordNet knows, in discovery order.
    ///
    /// Exception-listed forms only resolve through their exceptions. Otherwise
    /// the form itself and one round of suffix substitutions are checked, and
    /// substitution rounds repeat until something matches or nothing applies.
    pub fn morphy(&self, form: &str, pos: SimplePos) -> Vec<String> {
        let known = |forms: Vec<String>| {
            let mut found: Vec<String> = Vec::new();
            for candidate in forms {
                if self.contains(&candidate, pos) && !found.contains(&candidate) {
                    found.push(candidate);
                }
            }
            found
        };

        if let Some(bases) = self.exceptions.get(&pos).and_then(|m| m.get(form)) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return known(forms);
        }

        let mut forms = apply_rules(pos, &[form.to_string()]);
        let mut first = vec![form.to_string()];
        first.extend(forms.iter().cloned());
        let found = known(first);
        if !found.is_empty() {
            return found;
        }

        while !forms.is_empty() {
            forms = apply_rules(pos, &forms);
            let found = known(forms.clone());
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// The shortest known base form, or the input unchanged.
    pub fn lemmatize(&self, form: &str, pos: SimplePos) -> String {
        self.morphy(form, pos)
            .into_iter()
            .min_by_key(String::len)
            .unwrap_or_else(|| form.to_string())
    }
}

fn apply_rules(pos: SimplePos, forms: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (old, new) in substitutions(pos) {
            if let Some(stem) = form.strip_suffix(old) {
                out.push(format!("{stem}{new}"));
            }
        }
    }
    out
}
