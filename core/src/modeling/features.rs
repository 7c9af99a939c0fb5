//! Feature matrices, standardisation and train/test splitting.

use crate::{
    error::{AnalysisError, AnalysisResult},
    rng::StageRng,
};
use ndarray::{Array1, Array2, Axis};
use std::collections::BTreeMap;

/// Build an `n × d` matrix from row vectors.
pub fn matrix_from_rows(model: &'static str, rows: &[Vec<f64>], width: usize) -> AnalysisResult<Array2<f64>> {
    let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Array2::from_shape_vec((rows.len(), width), flat).map_err(|e| AnalysisError::model(model, e))
}

/// Zero-mean, unit-variance scaling fitted on one matrix and applied
/// to others. Constant columns are left centred but unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(model: &'static str, x: &Array2<f64>) -> AnalysisResult<Self> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| AnalysisError::model(model, "cannot fit scaler on an empty matrix"))?;
        let std = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > f64::EPSILON { s } else { 1.0 });
        Ok(Self { mean, std })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.std
    }

    pub fn fit_transform(model: &'static str, x: &Array2<f64>) -> AnalysisResult<(Self, Array2<f64>)> {
        let scaler = Self::fit(model, x)?;
        let scaled = scaler.transform(x);
        Ok((scaler, scaled))
    }
}

/// Row indices for each side of a split, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

fn test_count(n: usize, test_fraction: f64) -> usize {
    if n < 2 {
        return 0;
    }
    ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1)
}

pub fn random_split(n: usize, test_fraction: f64, rng: &mut StageRng) -> Split {
    let mut idx: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut idx);
    let n_test = test_count(n, test_fraction);
    let mut test = idx[..n_test].to_vec();
    let mut train = idx[n_test..].to_vec();
    test.sort_unstable();
    train.sort_unstable();
    Split { train, test }
}

/// Split each class separately so both sides keep the class balance.
pub fn stratified_split(labels: &[usize], test_fraction: f64, rng: &mut StageRng) -> Split {
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut train = Vec::with_capacity(labels.len());
    let mut test = Vec::new();
    for (_, mut members) in by_class {
        rng.shuffle(&mut members);
        let n_test = test_count(members.len(), test_fraction);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }
    test.sort_unstable();
    train.sort_unstable();
    Split { train, test }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::StageRng;
    use ndarray::array;

    #[test]
    fn scaler_centres_and_scales_columns() {
        let x = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];
        let (scaler, scaled) = StandardScaler::fit_transform("test", &x).unwrap();
        assert_eq!(scaler.mean, array![3.0, 10.0]);
        let col0 = scaled.column(0);
        assert!((col0.sum()).abs() < 1e-12);
        assert!((col0[2] - 1.224_744_871).abs() < 1e-6);
        // constant column: centred, not divided by zero
        assert!(scaled.column(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn stratified_split_keeps_both_classes_on_each_side() {
        let labels: Vec<usize> = (0..40).map(|i| usize::from(i % 4 == 0)).collect();
        let mut rng = StageRng::new(42, 5);
        let split = stratified_split(&labels, 0.25, &mut rng);
        assert_eq!(split.train.len() + split.test.len(), 40);
        let test_pos = split.test.iter().filter(|&&i| labels[i] == 1).count();
        let train_pos = split.train.iter().filter(|&&i| labels[i] == 1).count();
        assert_eq!(test_pos, 3);
        assert_eq!(train_pos, 7);
    }

    #[test]
    fn random_split_is_seeded_partition() {
        let a = random_split(100, 0.25, &mut StageRng::new(42, 6));
        let b = random_split(100, 0.25, &mut StageRng::new(42, 6));
        assert_eq!(a, b);
        assert_eq!(a.test.len(), 25);
        let mut all: Vec<usize> = a.train.iter().chain(&a.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }
}
