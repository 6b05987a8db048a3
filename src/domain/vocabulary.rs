//! Class vocabularies and class restriction.
//!
//! A YOLO-World export either carries a fixed vocabulary (its class scores are
//! baked into the graph) or takes per-class text embeddings as a second input.
//! Restricting the classes works differently for the two:
//!
//! - baked vocabulary: only the scores of the selected rows are considered
//! - text features: the selected embeddings are stacked and fed to the model
//!
//! In both cases detections are labelled with positions in the selected list,
//! so the result's class names equal the list the caller passed.
//!
//! Names are compared exactly first and then under [`fold_case`].

use crate::core::errors::{DetectError, DetectResult};
use crate::core::tensor::Tensor3D;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Debug;
use std::path::Path;

/// Ordered list of class names; a class id is an index into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    names: Vec<String>,
}

impl Vocabulary {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Placeholder names `class0..classN` for models without embedded names.
    pub fn generic(num_classes: usize) -> Self {
        Self::new((0..num_classes).map(|i| format!("class{i}")))
    }

    /// Reads one class name per line; blank lines are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> DetectResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let names: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(DetectError::config_error(format!(
                "class name file '{}' contains no names",
                path.display()
            )));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }

    /// Finds a class by exact name, falling back to a case-insensitive match.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name).or_else(|| {
            let folded = fold_case(name);
            self.names.iter().position(|n| fold_case(n) == folded)
        })
    }
}

/// Case folding used for every class name comparison.
pub fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// Source of class text features for exports with a text-feature input.
pub trait ClassPrompts: Debug + Send + Sync {
    /// Embedding width, when known without encoding anything.
    fn dim(&self) -> Option<usize>;

    /// Identity of `name` within this source, or `None` if it cannot be embedded.
    ///
    /// Two names with the same key produce the same embedding.
    fn resolve(&self, name: &str) -> Option<String>;

    /// Embeds `names` as a `[1, names.len(), dim]` tensor.
    fn encode(&self, names: &[String]) -> DetectResult<Tensor3D>;

    /// Names this source can list without encoding.
    fn known_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Text embeddings of class prompts, keyed by class name.
///
/// Loaded from a JSON object such as `{"soup": [0.1, ...], "pasta": [...]}`.
/// All vectors share one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEmbeddings {
    dim: usize,
    entries: BTreeMap<String, Vec<f32>>,
}

impl TextEmbeddings {
    pub fn from_map(entries: BTreeMap<String, Vec<f32>>) -> DetectResult<Self> {
        let dim = entries
            .values()
            .next()
            .map(Vec::len)
            .ok_or_else(|| DetectError::config_error("text embedding bank is empty"))?;
        if dim == 0 {
            return Err(DetectError::config_error(
                "text embeddings must have at least one dimension",
            ));
        }
        if let Some((name, v)) = entries.iter().find(|(_, v)| v.len() != dim) {
            return Err(DetectError::config_error(format!(
                "embedding for '{}' has {} dimensions, expected {}",
                name,
                v.len(),
                dim
            )));
        }
        Ok(Self { dim, entries })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> DetectResult<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let entries: BTreeMap<String, Vec<f32>> = serde_json::from_str(&data)?;
        Self::from_map(entries)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All class names in the bank, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Finds an embedding by exact name, falling back to a case-insensitive match.
    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.key_of(name)
            .and_then(|key| self.entries.get(key))
            .map(Vec::as_slice)
    }

    fn key_of(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.entries.get_key_value(name) {
            return Some(key);
        }
        let folded = fold_case(name);
        self.entries
            .keys()
            .find(|k| fold_case(k) == folded)
            .map(String::as_str)
    }
}

impl ClassPrompts for TextEmbeddings {
    fn dim(&self) -> Option<usize> {
        Some(self.dim)
    }

    fn resolve(&self, name: &str) -> Option<String> {
        self.key_of(name).map(str::to_string)
    }

    fn encode(&self, names: &[String]) -> DetectResult<Tensor3D> {
        let mut features = Tensor3D::zeros((1, names.len(), self.dim));
        for (row, name) in names.iter().enumerate() {
            let embedding = self
                .get(name)
                .ok_or_else(|| DetectError::unknown_class(name.as_str(), self.names().as_slice()))?;
            for (col, value) in embedding.iter().enumerate() {
                features[[0, row, col]] = *value;
            }
        }
        Ok(features)
    }

    fn known_names(&self) -> Vec<String> {
        self.names()
    }
}

/// How the model is told which classes to score.
#[derive(Debug, Clone, PartialEq)]
enum Selected {
    /// Rows of the baked vocabulary, in selection order.
    Indices(Vec<usize>),
    /// Stacked text features, `[1, classes, dim]`.
    Features(Tensor3D),
}

/// The active class restriction produced by `set_classes`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSelection {
    names: Vec<String>,
    selected: Selected,
}

impl ClassSelection {
    /// Restricts a baked vocabulary to `requested`.
    ///
    /// Names that resolve to an already selected class are dropped; the first
    /// spelling is kept.
    pub fn from_vocabulary<S: AsRef<str>>(
        requested: &[S],
        vocabulary: &Vocabulary,
    ) -> DetectResult<Self> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        let mut indices = Vec::new();
        for name in trimmed_names(requested)? {
            let index = vocabulary
                .position(name)
                .ok_or_else(|| DetectError::unknown_class(name, vocabulary.names()))?;
            if seen.insert(index) {
                names.push(name.to_string());
                indices.push(index);
            }
        }

        Ok(Self {
            names,
            selected: Selected::Indices(indices),
        })
    }

    /// Embeds `requested` with a prompt source.
    ///
    /// Names that resolve to the same prompt key are embedded once.
    pub fn from_prompts<S: AsRef<str>>(
        requested: &[S],
        prompts: &dyn ClassPrompts,
    ) -> DetectResult<Self> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for name in trimmed_names(requested)? {
            let key = prompts.resolve(name).ok_or_else(|| {
                DetectError::unknown_class(name, prompts.known_names().as_slice())
            })?;
            if seen.insert(key) {
                names.push(name.to_string());
            }
        }

        let features = prompts.encode(&names)?;
        if features.dim().0 != 1 || features.dim().1 != names.len() {
            return Err(DetectError::invalid_input(format!(
                "text features for {} classes have shape {:?}",
                names.len(),
                features.shape()
            )));
        }

        Ok(Self {
            names,
            selected: Selected::Features(features),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Vocabulary rows to score, for baked-vocabulary models.
    pub fn allowed_indices(&self) -> Option<&[usize]> {
        match &self.selected {
            Selected::Indices(indices) => Some(indices),
            Selected::Features(_) => None,
        }
    }

    /// Text features to feed, for text-feature models.
    pub fn text_features(&self) -> Option<&Tensor3D> {
        match &self.selected {
            Selected::Features(features) => Some(features),
            Selected::Indices(_) => None,
        }
    }
}

/// Trims every name; rejects an empty list and blank names.
fn trimmed_names<S: AsRef<str>>(requested: &[S]) -> DetectResult<Vec<&str>> {
    if requested.is_empty() {
        return Err(DetectError::invalid_input(
            "class list must contain at least one name",
        ));
    }
    requested
        .iter()
        .map(|raw| {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                Err(DetectError::invalid_input("class names must not be blank"))
            } else {
                Ok(name)
            }
        })
        .collect()
}
