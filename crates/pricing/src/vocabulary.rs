//! Training-time category vocabularies recovered from the model graph
//!
//! The first fitted categorical encoder found by a pre-order walk supplies
//! the vocabulary. Its columns come from the enclosing column group, or from
//! the names the encoder recorded when it was fitted standalone. When nothing
//! usable is found the map is empty and the adapter falls back to the static
//! defaults.

use autoprice_estimator::{walk, Estimator, Visitor};
use std::collections::HashMap;
use std::ops::ControlFlow;
use tracing::debug;

/// Categorical feature -> categories the encoder was fitted on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularyMap {
    entries: HashMap<String, Vec<String>>,
}

impl VocabularyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: &str) -> Option<&[String]> {
        self.entries.get(feature).map(Vec::as_slice)
    }

    /// Vocabulary for `feature` if one exists and is non-empty
    pub fn usable(&self, feature: &str) -> Option<&[String]> {
        self.get(feature).filter(|cats| !cats.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for VocabularyMap
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Finds the first encoder whose categories can be tied to column names
#[derive(Default)]
struct EncoderFinder {
    found: Option<VocabularyMap>,
}

impl Visitor for EncoderFinder {
    fn visit(&mut self, node: &Estimator, columns: Option<&[String]>) -> ControlFlow<()> {
        let Some(categories) = node.fitted_categories() else {
            return ControlFlow::Continue(());
        };
        let Some(columns) = columns.or_else(|| node.feature_names_in()) else {
            debug!(
                encoder = node.name(),
                "Skipping encoder with no column names to attribute categories to"
            );
            return ControlFlow::Continue(());
        };

        self.found = Some(
            columns
                .iter()
                .zip(categories)
                .map(|(column, cats)| (column.clone(), cats.clone()))
                .collect(),
        );
        ControlFlow::Break(())
    }
}

/// Extract per-feature vocabularies from a trained model graph.
///
/// Returns an empty map when the graph holds no attributable encoder.
pub fn extract_vocabulary(graph: &Estimator) -> VocabularyMap {
    let mut finder = EncoderFinder::default();
    let _ = walk(graph, &mut finder);
    finder.found.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoprice_estimator::{
        ColumnGroup, LinearRegression, OneHotEncoder, Remainder, SimpleImputer, Step,
    };

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn encoder(categories: &[&[&str]]) -> Estimator {
        Estimator::OneHotEncoder(OneHotEncoder::new(
            categories.iter().map(|c| strings(c)).collect(),
        ))
    }

    fn regressor() -> Step {
        Step {
            name: "model".into(),
            estimator: Estimator::LinearRegression(LinearRegression::new(vec![0.0], 0.0)),
        }
    }

    fn pipeline_with(preprocess: Estimator) -> Estimator {
        Estimator::Pipeline {
            steps: vec![
                Step {
                    name: "preprocess".into(),
                    estimator: preprocess,
                },
                regressor(),
            ],
        }
    }

    #[test]
    fn test_encoder_directly_in_column_group() {
        let graph = pipeline_with(Estimator::ColumnTransformer {
            transformers: vec![ColumnGroup {
                name: "cat".into(),
                columns: strings(&["fueltype", "aspiration"]),
                estimator: encoder(&[&["diesel", "gas"], &["std", "turbo"]]),
            }],
            remainder: Remainder::Passthrough,
        });

        let vocab = extract_vocabulary(&graph);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get("fueltype"), Some(&strings(&["diesel", "gas"])[..]));
        assert_eq!(vocab.get("aspiration"), Some(&strings(&["std", "turbo"])[..]));
    }

    #[test]
    fn test_encoder_inside_group_pipeline() {
        let graph = pipeline_with(Estimator::ColumnTransformer {
            transformers: vec![
                ColumnGroup {
                    name: "num".into(),
                    columns: strings(&["enginesize"]),
                    estimator: Estimator::SimpleImputer(SimpleImputer {
                        statistics: vec![120.0],
                    }),
                },
                ColumnGroup {
                    name: "cat".into(),
                    columns: strings(&["carbody"]),
                    estimator: Estimator::Pipeline {
                        steps: vec![Step {
                            name: "onehot".into(),
                            estimator: encoder(&[&["hatchback", "sedan"]]),
                        }],
                    },
                },
            ],
            remainder: Remainder::Drop,
        });

        let vocab = extract_vocabulary(&graph);
        assert_eq!(vocab.usable("carbody").unwrap()[0], "hatchback");
        assert!(vocab.get("enginesize").is_none());
    }

    #[test]
    fn test_first_encoder_wins() {
        let graph = pipeline_with(Estimator::ColumnTransformer {
            transformers: vec![
                ColumnGroup {
                    name: "first".into(),
                    columns: strings(&["fueltype"]),
                    estimator: encoder(&[&["gas"]]),
                },
                ColumnGroup {
                    name: "second".into(),
                    columns: strings(&["carbody"]),
                    estimator: encoder(&[&["sedan"]]),
                },
            ],
            remainder: Remainder::Drop,
        });

        let vocab = extract_vocabulary(&graph);
        assert_eq!(vocab.len(), 1);
        assert!(vocab.get("carbody").is_none());
    }

    #[test]
    fn test_standalone_encoder_uses_recorded_names() {
        let mut enc = OneHotEncoder::new(vec![strings(&["four", "two"])]);
        enc.feature_names_in = Some(strings(&["doornumber"]));
        let graph = pipeline_with(Estimator::OneHotEncoder(enc));

        let vocab = extract_vocabulary(&graph);
        assert_eq!(vocab.get("doornumber"), Some(&strings(&["four", "two"])[..]));
    }

    #[test]
    fn test_unattributable_encoder_is_skipped() {
        let graph = pipeline_with(encoder(&[&["gas"]]));
        assert!(extract_vocabulary(&graph).is_empty());
    }

    #[test]
    fn test_no_encoder_gives_empty_map() {
        let graph = Estimator::LinearRegression(LinearRegression::new(vec![1.0], 0.0));
        assert!(extract_vocabulary(&graph).is_empty());
    }

    #[test]
    fn test_usable_ignores_empty_lists() {
        let vocab: VocabularyMap = [("fueltype", Vec::<String>::new())].into_iter().collect();
        assert!(vocab.get("fueltype").is_some());
        assert!(vocab.usable("fueltype").is_none());
    }
}
