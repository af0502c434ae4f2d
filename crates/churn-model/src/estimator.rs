//! Estimators
//!
//! Each estimator keeps its own native decision rule. The label is never
//! re-derived from the probability by the caller.

use crate::error::LoadError;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Decision tree node, flat-array form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal value
    Leaf { value: f64 },
}

/// Decision tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Nodes, children always after their parent
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, width: usize) -> Result<(), LoadError> {
        if self.nodes.is_empty() {
            return Err(LoadError::Invalid("empty tree".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if feature >= width {
                        return Err(LoadError::Invalid(format!(
                            "node {} splits on input {} of {}",
                            i, feature, width
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(LoadError::Invalid(format!("node {} threshold is not finite", i)));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(LoadError::Invalid(format!(
                                "node {} has child {} out of order",
                                i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(LoadError::Invalid(format!("leaf {} is not finite", i)));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `x`
    pub fn evaluate(&self, x: ArrayView1<f64>) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                TreeNode::Split { feature, threshold, left, right } => {
                    i = if x[feature] <= threshold { left } else { right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

/// Estimator as stored in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorSpec {
    /// Binary logistic regression
    LogisticRegression { coefficients: Vec<f64>, intercept: f64 },
    /// Gradient-boosted trees on the log-odds scale
    GradientBoosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<Tree>,
    },
    /// Random forest; leaves hold the positive-class fraction
    RandomForest { trees: Vec<Tree> },
}

/// Validated estimator
#[derive(Debug, Clone)]
pub enum Estimator {
    /// `z = w·x + b`
    LogisticRegression { coefficients: Array1<f64>, intercept: f64 },
    /// `z = init + lr * Σ tree(x)`
    GradientBoosting {
        init: f64,
        learning_rate: f64,
        trees: Vec<Tree>,
    },
    /// `p = mean(tree(x))`
    RandomForest { trees: Vec<Tree> },
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Estimator {
    /// Validate a stored estimator against the encoded input width
    pub fn from_spec(spec: EstimatorSpec, width: usize) -> Result<Self, LoadError> {
        match spec {
            EstimatorSpec::LogisticRegression { coefficients, intercept } => {
                if coefficients.len() != width {
                    return Err(LoadError::Invalid(format!(
                        "{} coefficients for {} encoded inputs",
                        coefficients.len(),
                        width
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(LoadError::Invalid("non-finite coefficient".into()));
                }
                Ok(Estimator::LogisticRegression {
                    coefficients: Array1::from(coefficients),
                    intercept,
                })
            }
            EstimatorSpec::GradientBoosting { init, learning_rate, trees } => {
                if !init.is_finite() || !learning_rate.is_finite() || learning_rate <= 0.0 {
                    return Err(LoadError::Invalid("invalid boosting parameters".into()));
                }
                for tree in &trees {
                    tree.validate(width)?;
                }
                Ok(Estimator::GradientBoosting { init, learning_rate, trees })
            }
            EstimatorSpec::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(LoadError::Invalid("random forest has no trees".into()));
                }
                for tree in &trees {
                    tree.validate(width)?;
                    let out_of_range = tree
                        .nodes
                        .iter()
                        .any(|n| matches!(n, TreeNode::Leaf { value } if !(0.0..=1.0).contains(value)));
                    if out_of_range {
                        return Err(LoadError::Invalid("forest leaf outside [0, 1]".into()));
                    }
                }
                Ok(Estimator::RandomForest { trees })
            }
        }
    }

    /// Estimator kind name
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::GradientBoosting { .. } => "gradient_boosting",
            Estimator::RandomForest { .. } => "random_forest",
        }
    }

    fn log_odds(&self, x: ArrayView1<f64>) -> Option<f64> {
        match self {
            Estimator::LogisticRegression { coefficients, intercept } => Some(coefficients.dot(&x) + intercept),
            Estimator::GradientBoosting { init, learning_rate, trees } => {
                Some(init + learning_rate * trees.iter().map(|t| t.evaluate(x)).sum::<f64>())
            }
            Estimator::RandomForest { .. } => None,
        }
    }

    fn forest_mean(trees: &[Tree], x: ArrayView1<f64>) -> f64 {
        trees.iter().map(|t| t.evaluate(x)).sum::<f64>() / trees.len() as f64
    }

    /// `[P(stay), P(churn)]`
    pub fn predict_proba(&self, x: ArrayView1<f64>) -> [f64; 2] {
        let p = match self {
            Estimator::RandomForest { trees } => Self::forest_mean(trees, x),
            _ => self.log_odds(x).map(sigmoid).unwrap_or(0.0),
        };
        [1.0 - p, p]
    }

    /// Native class decision: 1 for churn
    pub fn predict(&self, x: ArrayView1<f64>) -> usize {
        match self {
            Estimator::RandomForest { trees } => {
                let p = Self::forest_mean(trees, x);
                // argmax over [1 - p, p]; ties go to the first class
                usize::from(p > 1.0 - p)
            }
            _ => usize::from(self.log_odds(x).is_some_and(|z| z > 0.0)),
        }
    }
}
