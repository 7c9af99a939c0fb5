//! The analysis engine: one linear pass over the pipeline.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Dataset generation   (stores, products, customers, transactions, inventory)
//!   2. Aggregation          (pure group-by reductions)
//!   3. Modeling             (risk classifier, CLV regressor, segmentation)
//!   4. Insights             (templated from the aggregates)
//!
//! RULES:
//!   - Every stage reads only the outputs of earlier stages.
//!   - Tables are write-once; no stage mutates an earlier stage's output.
//!   - All randomness flows through the RngBank.
//!   - Output (CSV, SQLite, charts) is the caller's concern.

use crate::{
    aggregate::Aggregates,
    config::ScenarioConfig,
    error::AnalysisResult,
    generator::{generate_dataset, Dataset},
    insights::{key_insights, Insight},
    modeling::{run_models, ModelingReport},
    rng::RngBank,
    types::RunId,
};

/// Everything a run produced, in memory.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub run_id:     RunId,
    pub seed:       u64,
    pub dataset:    Dataset,
    pub aggregates: Aggregates,
    pub models:     ModelingReport,
    pub insights:   Vec<Insight>,
}

pub struct AnalysisEngine {
    pub run_id: RunId,
    pub rng_bank: RngBank,
    config: ScenarioConfig,
}

impl AnalysisEngine {
    pub fn new(run_id: RunId, config: ScenarioConfig) -> Self {
        Self {
            rng_bank: RngBank::new(config.seed),
            run_id,
            config,
        }
    }

    /// Build an engine with a fresh random run id.
    pub fn build(config: ScenarioConfig) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), config)
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Stage 1.
    pub fn generate(&self) -> AnalysisResult<Dataset> {
        generate_dataset(&self.config, &self.rng_bank)
    }

    /// Stage 2.
    pub fn aggregate(&self, dataset: &Dataset) -> Aggregates {
        Aggregates::compute(dataset, self.config.modeling.repeat_purchase_threshold)
    }

    /// Stage 3.
    pub fn model(&self, dataset: &Dataset, aggregates: &Aggregates) -> AnalysisResult<ModelingReport> {
        run_models(dataset, aggregates, &self.config.modeling, &self.rng_bank)
    }

    /// Run every stage in order.
    pub fn run(&self) -> AnalysisResult<AnalysisRun> {
        log::info!("engine: run {} seed {}", self.run_id, self.seed());
        let dataset = self.generate()?;
        let aggregates = self.aggregate(&dataset);
        let models = self.model(&dataset, &aggregates)?;
        let insights = key_insights(&aggregates);
        Ok(AnalysisRun {
            run_id: self.run_id.clone(),
            seed: self.seed(),
            dataset,
            aggregates,
            models,
            insights,
        })
    }
}
