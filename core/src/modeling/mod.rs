//! Modeling layer. Read-only consumer of the generated tables and
//! aggregates; each model draws from its own RNG stream.

pub mod clv;
pub mod features;
pub mod risk;
pub mod segments;

use crate::{
    aggregate::{customer_profiles, Aggregates},
    config::ModelingConfig,
    error::AnalysisResult,
    generator::Dataset,
    rng::{RngBank, StageSlot},
};
use clv::ClvReport;
use risk::RiskModelOutcome;
use segments::SegmentationReport;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelingReport {
    pub risk: RiskModelOutcome,
    pub clv: ClvReport,
    pub segments: SegmentationReport,
}

pub fn run_models(
    dataset: &Dataset,
    aggregates: &Aggregates,
    config: &ModelingConfig,
    bank: &RngBank,
) -> AnalysisResult<ModelingReport> {
    let risk = risk::train_risk_model(
        &aggregates.stores,
        config,
        &mut bank.for_stage(StageSlot::RiskModel),
    )?;

    let profiles = customer_profiles(&aggregates.customers, &dataset.customers);
    let clv = clv::train_clv_model(&profiles, config, &mut bank.for_stage(StageSlot::ClvModel))?;
    let segments = segments::segment_customers(
        &profiles,
        config,
        &mut bank.for_stage(StageSlot::Segmentation),
    )?;

    Ok(ModelingReport { risk, clv, segments })
}
