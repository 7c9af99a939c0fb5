//! Customer lifetime value regressor: predicts a customer's total
//! historical revenue from behaviour and demographics.

use super::features::{matrix_from_rows, random_split, StandardScaler};
use crate::{
    aggregate::CustomerProfile,
    config::{ModelingConfig, MIN_MODEL_ROWS},
    error::{AnalysisError, AnalysisResult},
    rng::StageRng,
    types::cutoff_date,
};
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Axis};

const MODEL: &str = "clv_regressor";

pub const CLV_FEATURES: [&str; 6] = [
    "purchase_count",
    "age",
    "income_code",
    "digital_literacy_score",
    "days_since_registration",
    "region_code",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ClvReport {
    pub train_size: usize,
    pub test_size: usize,
    pub mae: f64,
    pub r2: f64,
    pub intercept: f64,
    /// Coefficients on the standardised features.
    pub coefficients: Vec<(String, f64)>,
    /// Held-out targets and predictions, aligned.
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
}

pub fn customer_features(profile: &CustomerProfile<'_>) -> Vec<f64> {
    let customer = profile.customer;
    vec![
        profile.behavior.purchase_count as f64,
        customer.age as f64,
        customer.income_bracket.rank() as f64,
        customer.digital_literacy_score,
        (cutoff_date() - customer.registration_date).num_days() as f64,
        customer.region_tier.code() as f64,
    ]
}

pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Coefficient of determination. 0 when the targets have no variance.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    }
}

pub fn train_clv_model(
    profiles: &[CustomerProfile<'_>],
    config: &ModelingConfig,
    rng: &mut StageRng,
) -> AnalysisResult<ClvReport> {
    if profiles.len() < MIN_MODEL_ROWS {
        return Err(AnalysisError::model(
            MODEL,
            format!("need at least {MIN_MODEL_ROWS} customers, got {}", profiles.len()),
        ));
    }

    let rows: Vec<Vec<f64>> = profiles.iter().map(customer_features).collect();
    let x = matrix_from_rows(MODEL, &rows, CLV_FEATURES.len())?;
    let y: Array1<f64> = profiles.iter().map(|p| p.behavior.total_revenue).collect();

    let split = random_split(profiles.len(), config.test_fraction, rng);
    let x_train = x.select(Axis(0), &split.train);
    let x_test = x.select(Axis(0), &split.test);
    let y_train = y.select(Axis(0), &split.train);
    let y_test = y.select(Axis(0), &split.test);

    let scaler = StandardScaler::fit(MODEL, &x_train)?;
    let train = Dataset::new(scaler.transform(&x_train), y_train);
    let model = LinearRegression::new()
        .fit(&train)
        .map_err(|e| AnalysisError::model(MODEL, e))?;

    let predicted: Array1<f64> = model.predict(&scaler.transform(&x_test));
    let actual = y_test.to_vec();
    let predicted = predicted.to_vec();
    let mae = mean_absolute_error(&actual, &predicted);
    let r2 = r2_score(&actual, &predicted);
    log::info!("clv model: MAE {mae:.2}, R² {r2:.4}");

    Ok(ClvReport {
        train_size: split.train.len(),
        test_size: split.test.len(),
        mae,
        r2,
        intercept: model.intercept(),
        coefficients: CLV_FEATURES
            .iter()
            .map(|s| s.to_string())
            .zip(model.params().iter().copied())
            .collect(),
        actual,
        predicted,
    })
}
