//! Store network generation: a fixed number of stores per tier,
//! assigned to that tier's cities round-robin.

use crate::{
    config::ScenarioConfig,
    rng::StageRng,
    types::{window_start, EntityId, Tier},
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreRecord {
    pub store_id:              EntityId,
    pub store_name:            String,
    pub region_tier:           Tier,
    pub city:                  String,
    pub state:                 String,
    pub city_population:       u64,
    pub infrastructure_score:  f64,
    pub warehouse_distance_km: f64,
    pub opening_date:          NaiveDate,
}

pub fn generate_stores(config: &ScenarioConfig, rng: &mut StageRng) -> Vec<StoreRecord> {
    let mut stores = Vec::with_capacity(config.total_store_count());
    let mut next_id = 1usize;

    for tier in Tier::ALL {
        let profile = config.tier(tier);
        let (dist_lo, dist_hi) = profile.warehouse_distance_km;

        for slot in 0..profile.store_count {
            let city_index = slot % profile.cities.len();
            let city = &profile.cities[city_index];
            let opening_offset = rng.int_between(0, config.store_opening_window_days);

            stores.push(StoreRecord {
                store_id: format!("STR{next_id:04}"),
                store_name: format!("{} {} Store {}", config.store_brand, city.name, city_index + 1),
                region_tier: tier,
                city: city.name.clone(),
                state: city.state.clone(),
                city_population: city.population,
                infrastructure_score: city.infrastructure_score,
                warehouse_distance_km: rng.uniform(dist_lo, dist_hi),
                opening_date: window_start() + Duration::days(opening_offset),
            });
            next_id += 1;
        }
    }

    log::info!(
        "stores: created {} stores across {} tiers",
        stores.len(),
        Tier::ALL.len()
    );
    stores
}
