use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use itertools::Itertools;
use log::{
    debug,
    info,
};
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::Classifier;
use crate::error::{
    PzmError,
    PzmResult,
};

/// Node of a binary decision tree.
///
/// Rows with `value <= threshold` go left. Rows with a null value follow
/// `missing_left`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature:      usize,
        threshold:    f64,
        left:         Box<Node>,
        right:        Box<Node>,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        class: u8,
    },
}

fn default_missing_left() -> bool {
    true
}

impl Node {
    fn evaluate(
        &self,
        row: &[Option<f64>],
    ) -> u8 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    missing_left,
                } => {
                    let go_left = match row[*feature] {
                        Some(value) => value <= *threshold,
                        None => *missing_left,
                    };
                    node = if go_left { left.as_ref() } else { right.as_ref() };
                },
            }
        }
    }

    fn validate(
        &self,
        n_features: usize,
    ) -> Result<(), String> {
        match self {
            Node::Leaf { class } if *class > 1 => Err(format!("leaf class {class} is not binary")),
            Node::Leaf { .. } => Ok(()),
            Node::Split { feature, threshold, .. } if *feature >= n_features => {
                Err(format!(
                    "split on feature #{feature} (threshold {threshold}), model has {n_features} features"
                ))
            },
            Node::Split { left, right, .. } => {
                left.validate(n_features)?;
                right.validate(n_features)
            },
        }
    }
}

/// Random forest of binary decision trees, stored as JSON.
///
/// ```json
/// {
///   "feature_names": ["af", "dp"],
///   "trees": [
///     {"feature": 0, "threshold": 0.5, "left": {"class": 0}, "right": {"class": 1}}
///   ]
/// }
/// ```
///
/// Prediction is a majority vote, ties are labelled `0`. Deserialization
/// validates the trees against `feature_names`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeEnsembleData")]
pub struct TreeEnsemble {
    feature_names: Vec<String>,
    trees:         Vec<Node>,
}

#[derive(Deserialize)]
struct TreeEnsembleData {
    feature_names: Vec<String>,
    trees:         Vec<Node>,
}

impl TryFrom<TreeEnsembleData> for TreeEnsemble {
    type Error = String;

    fn try_from(value: TreeEnsembleData) -> Result<Self, Self::Error> {
        Self::new(value.feature_names, value.trees)
    }
}

impl TreeEnsemble {
    pub fn new(
        feature_names: Vec<String>,
        trees: Vec<Node>,
    ) -> Result<Self, String> {
        let model = Self {
            feature_names,
            trees,
        };
        model.validate()?;
        Ok(model)
    }

    /// Loads a model from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> PzmResult<Self> {
        let path = path.as_ref();
        let load_err = |reason: String| {
            PzmError::ModelLoad {
                path: path.to_path_buf(),
                reason,
            }
        };

        info!("Loading model from {}", path.display());
        let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
        let model: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| load_err(e.to_string()))?;
        info!(
            "Loaded model with {} trees over {} features",
            model.n_trees(),
            model.feature_names.len()
        );
        Ok(model)
    }

    fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("model has no trees".to_string());
        }
        self.trees
            .iter()
            .try_for_each(|tree| tree.validate(self.feature_names.len()))
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Feature columns in model order, matched by lower-cased name.
    fn feature_columns(
        &self,
        features: &DataFrame,
    ) -> PzmResult<Vec<Float64Chunked>> {
        self.feature_names
            .iter()
            .map(|name| {
                let column = features.column(&name.to_lowercase()).map_err(|_| {
                    PzmError::Prediction(format!("feature column `{name}` is missing"))
                })?;
                column
                    .cast(&DataType::Float64)
                    .and_then(|c| c.f64().cloned())
                    .map_err(|e| PzmError::Prediction(format!("feature `{name}`: {e}")))
            })
            .collect()
    }
}

impl Classifier for TreeEnsemble {
    fn predict(
        &self,
        features: &DataFrame,
    ) -> anyhow::Result<Vec<u8>> {
        let columns = self.feature_columns(features)?;
        let unused = features.width().saturating_sub(columns.len());
        if unused > 0 {
            debug!("{unused} feature columns are not used by the model");
        }

        let mut row = vec![None; columns.len()];
        let labels = (0..features.height())
            .map(|idx| {
                for (slot, column) in row.iter_mut().zip(columns.iter()) {
                    *slot = column.get(idx);
                }
                let votes = self
                    .trees
                    .iter()
                    .map(|tree| tree.evaluate(&row) as usize)
                    .sum::<usize>();
                u8::from(votes * 2 > self.trees.len())
            })
            .collect_vec();
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::*;
    use tempfile::NamedTempFile;

    use super::*;

    const MODEL: &str = r#"{
        "feature_names": ["AF", "dp"],
        "trees": [
            {"feature": 0, "threshold": 0.5, "left": {"class": 0}, "right": {"class": 1}},
            {"feature": 1, "threshold": 0.2, "missing_left": false,
             "left": {"class": 0}, "right": {"class": 1}},
            {"feature": 0, "threshold": 0.1,
             "left": {"class": 0},
             "right": {"feature": 1, "threshold": 0.9, "left": {"class": 1}, "right": {"class": 0}}}
        ]
    }"#;

    fn model_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[fixture]
    fn model() -> TreeEnsemble {
        TreeEnsemble::from_path(model_file(MODEL).path()).unwrap()
    }

    #[rstest]
    fn loads_nested_trees(model: TreeEnsemble) {
        assert_eq!(model.n_trees(), 3);
        assert_eq!(model.feature_names(), &["AF".to_string(), "dp".to_string()]);
        assert!(matches!(
            model.trees[1],
            Node::Split { missing_left: false, .. }
        ));
        assert!(matches!(
            model.trees[0],
            Node::Split { missing_left: true, .. }
        ));
    }

    #[rstest]
    fn majority_vote(model: TreeEnsemble) {
        let features = df!(
            "af" => [Some(0.05f64), Some(0.8), Some(0.3), None],
            "dp" => [Some(0.1f64), Some(0.5), Some(0.95), None],
            "lcr" => [0.0f64, 1.0, 0.0, 0.0],
        )
        .unwrap();
        // votes: [0,0,0], [1,1,1], [0,1,0], [0,1,0]
        assert_eq!(model.predict(&features).unwrap(), vec![0, 1, 0, 0]);
    }

    #[test]
    fn ties_are_negative() {
        let model = TreeEnsemble::new(
            vec!["af".to_string()],
            vec![Node::Leaf { class: 1 }, Node::Leaf { class: 0 }],
        )
        .unwrap();
        let features = df!("af" => [0.5f64]).unwrap();
        assert_eq!(model.predict(&features).unwrap(), vec![0]);
    }

    #[rstest]
    fn missing_feature_column(model: TreeEnsemble) {
        let features = df!("af" => [0.5f64]).unwrap();
        let err = model.predict(&features).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PzmError>(),
            Some(PzmError::Prediction(_))
        ));
    }

    #[rstest]
    #[case::not_json("not a model")]
    #[case::no_trees(r#"{"feature_names": ["af"], "trees": []}"#)]
    #[case::feature_out_of_range(
        r#"{"feature_names": ["af"], "trees": [{"feature": 3, "threshold": 0.5, "left": {"class": 0}, "right": {"class": 1}}]}"#
    )]
    #[case::non_binary_leaf(r#"{"feature_names": ["af"], "trees": [{"class": 4}]}"#)]
    fn rejects_invalid_models(#[case] content: &str) {
        let file = model_file(content);
        assert!(matches!(
            TreeEnsemble::from_path(file.path()),
            Err(PzmError::ModelLoad { .. })
        ));
    }

    #[test]
    fn deserializing_validates_feature_indices() {
        let content = r#"{"feature_names": ["af"], "trees": [{"feature": 1, "threshold": 0.5, "left": {"class": 0}, "right": {"class": 1}}]}"#;
        let err = serde_json::from_str::<TreeEnsemble>(content).unwrap_err();
        assert!(err.to_string().contains("feature"), "{err}");

        let model = TreeEnsemble::from_path(model_file(MODEL).path()).unwrap();
        let valid = serde_json::to_string(&model).unwrap();
        assert!(serde_json::from_str::<TreeEnsemble>(&valid).is_ok());
    }

    #[test]
    fn missing_model_file() {
        assert!(matches!(
            TreeEnsemble::from_path("/nonexistent/model.json"),
            Err(PzmError::ModelLoad { .. })
        ));
    }
}
