//! Store margin-risk classifier.
//!
//! A store is high risk when its mean per-transaction margin % falls
//! below the configured threshold. The model is a bagged ensemble of
//! linfa decision trees: each tree is fitted on a bootstrap resample of
//! the training rows and predictions are a majority vote.

use super::features::{matrix_from_rows, stratified_split, StandardScaler};
use crate::{
    aggregate::StorePerformance,
    config::ModelingConfig,
    error::{AnalysisError, AnalysisResult},
    rng::StageRng,
};
use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};

const MODEL: &str = "risk_classifier";

pub const RISK_FEATURES: [&str; 9] = [
    "revenue",
    "logistics_cost",
    "spoilage_cost",
    "delivery_time_hours",
    "is_perishable",
    "infrastructure_score",
    "warehouse_distance_km",
    "transaction_count",
    "region_code",
];

pub const CLASS_NAMES: [&str; 2] = ["Low Risk", "High Risk"];

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: &'static str,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskModelReport {
    pub high_risk_stores: usize,
    pub total_stores: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    /// Sorted by importance, descending.
    pub feature_importance: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RiskModelOutcome {
    Trained(RiskModelReport),
    /// The label had a single class, so there was nothing to learn.
    Skipped {
        high_risk_stores: usize,
        total_stores: usize,
    },
}

pub fn store_features(store: &StorePerformance) -> Vec<f64> {
    vec![
        store.total_revenue,
        store.avg_logistics_cost,
        store.avg_spoilage_cost,
        store.avg_delivery_hours,
        store.perishable_share,
        store.infrastructure_score,
        store.warehouse_distance_km,
        store.transactions as f64,
        store.region_tier.code() as f64,
    ]
}

pub fn risk_label(store: &StorePerformance, threshold: f64) -> usize {
    usize::from(store.avg_margin_pct < threshold)
}

/// Bootstrap-aggregated decision trees.
pub struct BaggedForest {
    trees: Vec<DecisionTree<f64, usize>>,
    n_features: usize,
}

impl BaggedForest {
    pub fn fit(
        x: &Array2<f64>,
        y: &Array1<usize>,
        n_trees: usize,
        max_depth: usize,
        rng: &mut StageRng,
    ) -> AnalysisResult<Self> {
        let n = x.nrows();
        if n == 0 {
            return Err(AnalysisError::model(MODEL, "no training rows"));
        }

        let mut trees = Vec::with_capacity(n_trees);
        for _ in 0..n_trees {
            let sample: Vec<usize> = (0..n).map(|_| rng.index(n)).collect();
            let dataset = Dataset::new(x.select(Axis(0), &sample), y.select(Axis(0), &sample));
            let tree = DecisionTree::params()
                .split_quality(SplitQuality::Gini)
                .max_depth(Some(max_depth))
                .fit(&dataset)
                .map_err(|e| AnalysisError::model(MODEL, e))?;
            trees.push(tree);
        }

        Ok(Self {
            trees,
            n_features: x.ncols(),
        })
    }

    /// Majority vote; ties go to the lower class.
    pub fn predict(&self, x: &Array2<f64>) -> Array1<usize> {
        let mut votes = vec![[0usize; 2]; x.nrows()];
        for tree in &self.trees {
            let pred: Array1<usize> = tree.predict(x);
            for (row, &class) in pred.iter().enumerate() {
                votes[row][class.min(1)] += 1;
            }
        }
        votes
            .into_iter()
            .map(|v| usize::from(v[1] > v[0]))
            .collect()
    }

    /// Mean impurity-decrease importance across trees, normalised to sum 1.
    /// Trees that never split contribute nothing.
    pub fn feature_importance(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.n_features];
        for tree in &self.trees {
            let importance = tree.feature_importance();
            if importance.iter().any(|v| !v.is_finite()) {
                continue;
            }
            for (t, v) in total.iter_mut().zip(importance) {
                *t += v;
            }
        }
        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            total.iter_mut().for_each(|v| *v /= sum);
        }
        total
    }
}

/// Per-class precision, recall, F1 and support for a binary label.
pub fn classification_report(actual: &[usize], predicted: &[usize]) -> Vec<ClassMetrics> {
    CLASS_NAMES
        .iter()
        .enumerate()
        .map(|(class, &label)| {
            let mut tp = 0usize;
            let mut fp = 0usize;
            let mut fn_ = 0usize;
            for (&a, &p) in actual.iter().zip(predicted) {
                match (a == class, p == class) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }
            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label,
                precision,
                recall,
                f1,
                support: tp + fn_,
            }
        })
        .collect()
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn train_risk_model(
    stores: &[StorePerformance],
    config: &ModelingConfig,
    rng: &mut StageRng,
) -> AnalysisResult<RiskModelOutcome> {
    let labels: Vec<usize> = stores
        .iter()
        .map(|s| risk_label(s, config.risk_margin_threshold))
        .collect();
    let high_risk_stores = labels.iter().sum::<usize>();
    let total_stores = stores.len();
    log::info!("risk model: {high_risk_stores} / {total_stores} stores high risk");

    if high_risk_stores == 0 || high_risk_stores == total_stores {
        log::warn!("risk model: insufficient class diversity for training, skipping");
        return Ok(RiskModelOutcome::Skipped {
            high_risk_stores,
            total_stores,
        });
    }

    let rows: Vec<Vec<f64>> = stores.iter().map(store_features).collect();
    let x = matrix_from_rows(MODEL, &rows, RISK_FEATURES.len())?;
    let y = Array1::from(labels.clone());

    let split = stratified_split(&labels, config.test_fraction, rng);
    let x_train = x.select(Axis(0), &split.train);
    let x_test = x.select(Axis(0), &split.test);
    let y_train = y.select(Axis(0), &split.train);
    let y_test = y.select(Axis(0), &split.test);

    let scaler = StandardScaler::fit(MODEL, &x_train)?;
    let x_train = scaler.transform(&x_train);
    let x_test = scaler.transform(&x_test);

    let forest = BaggedForest::fit(
        &x_train,
        &y_train,
        config.forest_trees,
        config.forest_max_depth,
        rng,
    )?;
    let predicted = forest.predict(&x_test);

    let actual: Vec<usize> = y_test.to_vec();
    let predicted: Vec<usize> = predicted.to_vec();
    let correct = actual.iter().zip(&predicted).filter(|(a, p)| a == p).count();

    let mut feature_importance: Vec<(String, f64)> = RISK_FEATURES
        .iter()
        .map(|s| s.to_string())
        .zip(forest.feature_importance())
        .collect();
    feature_importance.sort_by(|a, b| b.1.total_cmp(&a.1));

    log::debug!("risk model: trained {} trees on {} rows", config.forest_trees, split.train.len());

    Ok(RiskModelOutcome::Trained(RiskModelReport {
        high_risk_stores,
        total_stores,
        train_size: split.train.len(),
        test_size: split.test.len(),
        accuracy: ratio(correct, actual.len()),
        classes: classification_report(&actual, &predicted),
        feature_importance,
    }))
}
