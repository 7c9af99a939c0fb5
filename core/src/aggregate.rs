//! Group-by reductions over the generated tables.
//!
//! Every function here is pure: no RNG, no I/O, deterministic output
//! order. Values are left unrounded; rounding is a presentation concern.
//! Per-tier tables always carry one row per tier in `Tier::ALL` order,
//! with zeros for a tier that saw no activity.

use crate::{
    generator::{
        customers::CustomerRecord, inventory::InventoryRecord, products::ProductRecord,
        stores::StoreRecord, transactions::TransactionRecord, Dataset,
    },
    types::{EntityId, IncomeBracket, PaymentMethod, Tier},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Running sum and count for a mean.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn add(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn value(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

// ── Regional performance ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPerformance {
    pub tier:                 Tier,
    pub transactions:         usize,
    pub total_revenue:        f64,
    pub total_margin:         f64,
    pub unique_customers:     usize,
    pub avg_delivery_hours:   f64,
    pub avg_delivery_km:      f64,
    pub avg_logistics_cost:   f64,
    pub avg_spoilage_cost:    f64,
    pub margin_pct:           f64,
    pub revenue_per_customer: f64,
}

pub fn regional_performance(transactions: &[TransactionRecord]) -> Vec<RegionalPerformance> {
    #[derive(Default)]
    struct Acc<'a> {
        count: usize,
        revenue: f64,
        margin: f64,
        customers: HashSet<&'a str>,
        hours: Mean,
        km: Mean,
        logistics: Mean,
        spoilage: Mean,
    }

    let mut accs: [Acc; 3] = Default::default();
    for t in transactions {
        let acc = &mut accs[t.region_tier.code()];
        acc.count += 1;
        acc.revenue += t.revenue;
        acc.margin += t.margin;
        acc.customers.insert(t.customer_id.as_str());
        acc.hours.add(t.delivery_time_hours);
        acc.km.add(t.delivery_distance_km);
        acc.logistics.add(t.logistics_cost);
        acc.spoilage.add(t.spoilage_cost);
    }

    Tier::ALL
        .iter()
        .zip(accs.iter())
        .map(|(&tier, acc)| {
            let unique_customers = acc.customers.len();
            RegionalPerformance {
                tier,
                transactions: acc.count,
                total_revenue: acc.revenue,
                total_margin: acc.margin,
                unique_customers,
                avg_delivery_hours: acc.hours.value(),
                avg_delivery_km: acc.km.value(),
                avg_logistics_cost: acc.logistics.value(),
                avg_spoilage_cost: acc.spoilage.value(),
                margin_pct: percent(acc.margin, acc.revenue),
                revenue_per_customer: if unique_customers == 0 {
                    0.0
                } else {
                    acc.revenue / unique_customers as f64
                },
            }
        })
        .collect()
}

// ── Category performance ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub tier:         Tier,
    pub category:     String,
    pub revenue:      f64,
    pub margin:       f64,
    pub transactions: usize,
    pub margin_pct:   f64,
}

/// Per (tier, category), sorted by tier then revenue descending.
/// Transactions whose product is unknown are ignored.
pub fn category_performance(
    transactions: &[TransactionRecord],
    products: &[ProductRecord],
) -> Vec<CategoryPerformance> {
    let category_of: HashMap<&str, &str> = products
        .iter()
        .map(|p| (p.product_id.as_str(), p.category.as_str()))
        .collect();

    let mut groups: BTreeMap<(usize, &str), (f64, f64, usize)> = BTreeMap::new();
    for t in transactions {
        let Some(&category) = category_of.get(t.product_id.as_str()) else {
            continue;
        };
        let entry = groups.entry((t.region_tier.code(), category)).or_default();
        entry.0 += t.revenue;
        entry.1 += t.margin;
        entry.2 += 1;
    }

    let mut rows: Vec<CategoryPerformance> = groups
        .into_iter()
        .map(|((code, category), (revenue, margin, count))| CategoryPerformance {
            tier: Tier::ALL[code],
            category: category.to_string(),
            revenue,
            margin,
            transactions: count,
            margin_pct: percent(margin, revenue),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.tier
            .code()
            .cmp(&b.tier.code())
            .then(b.revenue.total_cmp(&a.revenue))
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

// ── Customer behaviour ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerBehavior {
    pub customer_id:    EntityId,
    pub region_tier:    Tier,
    pub purchase_count: u32,
    pub total_revenue:  f64,
    pub total_margin:   f64,
}

/// One row per customer with at least one transaction, by customer id.
pub fn customer_behavior(transactions: &[TransactionRecord]) -> Vec<CustomerBehavior> {
    let mut groups: BTreeMap<&str, CustomerBehavior> = BTreeMap::new();
    for t in transactions {
        let row = groups
            .entry(t.customer_id.as_str())
            .or_insert_with(|| CustomerBehavior {
                customer_id: t.customer_id.clone(),
                region_tier: t.region_tier,
                purchase_count: 0,
                total_revenue: 0.0,
                total_margin: 0.0,
            });
        row.purchase_count += 1;
        row.total_revenue += t.revenue;
        row.total_margin += t.margin;
    }
    groups.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSummary {
    pub tier: Tier,
    pub avg_purchases: f64,
    pub avg_revenue: f64,
    pub customers: usize,
    /// Share of customers with at least `repeat_threshold` purchases, in percent.
    pub repeat_rate_pct: f64,
}

pub fn behavior_summary(behavior: &[CustomerBehavior], repeat_threshold: u32) -> Vec<BehaviorSummary> {
    let mut purchases: [Mean; 3] = Default::default();
    let mut revenue: [Mean; 3] = Default::default();
    let mut repeat = [0usize; 3];
    for b in behavior {
        let i = b.region_tier.code();
        purchases[i].add(b.purchase_count as f64);
        revenue[i].add(b.total_revenue);
        if b.purchase_count >= repeat_threshold {
            repeat[i] += 1;
        }
    }

    Tier::ALL
        .iter()
        .map(|&tier| {
            let i = tier.code();
            let customers = purchases[i].n;
            BehaviorSummary {
                tier,
                avg_purchases: purchases[i].value(),
                avg_revenue: revenue[i].value(),
                customers,
                repeat_rate_pct: percent(repeat[i] as f64, customers as f64),
            }
        })
        .collect()
}

// ── Store performance ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePerformance {
    pub store_id: EntityId,
    pub region_tier: Tier,
    pub total_revenue: f64,
    pub total_margin: f64,
    /// Mean of per-transaction margin %, not margin over revenue.
    pub avg_margin_pct: f64,
    pub avg_logistics_cost: f64,
    pub avg_spoilage_cost: f64,
    pub avg_delivery_hours: f64,
    /// Fraction (0..=1) of the store's transactions that were perishable.
    pub perishable_share: f64,
    pub transactions: usize,
    pub infrastructure_score: f64,
    pub warehouse_distance_km: f64,
}

/// Per store with at least one transaction, by store id.
pub fn store_performance(
    transactions: &[TransactionRecord],
    stores: &[StoreRecord],
) -> Vec<StorePerformance> {
    #[derive(Default)]
    struct Acc {
        revenue: f64,
        margin: f64,
        margin_pct: Mean,
        logistics: Mean,
        spoilage: Mean,
        hours: Mean,
        perishable: Mean,
    }

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for t in transactions {
        let acc = groups.entry(t.store_id.as_str()).or_default();
        acc.revenue += t.revenue;
        acc.margin += t.margin;
        acc.margin_pct.add(t.margin_pct);
        acc.logistics.add(t.logistics_cost);
        acc.spoilage.add(t.spoilage_cost);
        acc.hours.add(t.delivery_time_hours);
        acc.perishable.add(if t.is_perishable { 1.0 } else { 0.0 });
    }

    let store_by_id: HashMap<&str, &StoreRecord> =
        stores.iter().map(|s| (s.store_id.as_str(), s)).collect();

    groups
        .into_iter()
        .filter_map(|(store_id, acc)| {
            let store = store_by_id.get(store_id)?;
            Some(StorePerformance {
                store_id: store_id.to_string(),
                region_tier: store.region_tier,
                total_revenue: acc.revenue,
                total_margin: acc.margin,
                avg_margin_pct: acc.margin_pct.value(),
                avg_logistics_cost: acc.logistics.value(),
                avg_spoilage_cost: acc.spoilage.value(),
                avg_delivery_hours: acc.hours.value(),
                perishable_share: acc.perishable.value(),
                transactions: acc.margin_pct.n,
                infrastructure_score: store.infrastructure_score,
                warehouse_distance_km: store.warehouse_distance_km,
            })
        })
        .collect()
}

// ── Pricing, payment and cost mix ─────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountImpact {
    pub discount_pct:   u32,
    pub avg_margin_pct: f64,
    pub transactions:   usize,
}

/// Per discount level that occurs, ascending.
pub fn discount_impact(transactions: &[TransactionRecord]) -> Vec<DiscountImpact> {
    let mut groups: BTreeMap<u32, Mean> = BTreeMap::new();
    for t in transactions {
        groups.entry(t.discount_pct).or_default().add(t.margin_pct);
    }
    groups
        .into_iter()
        .map(|(discount_pct, m)| DiscountImpact {
            discount_pct,
            avg_margin_pct: m.value(),
            transactions: m.n,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMix {
    pub tier:         Tier,
    pub method:       PaymentMethod,
    pub transactions: usize,
}

/// Every tier × method pair, including zero counts.
pub fn payment_mix(transactions: &[TransactionRecord]) -> Vec<PaymentMix> {
    let mut counts = [[0usize; 4]; 3];
    for t in transactions {
        let m = PaymentMethod::ALL
            .iter()
            .position(|&p| p == t.payment_method)
            .unwrap_or(0);
        counts[t.region_tier.code()][m] += 1;
    }
    Tier::ALL
        .iter()
        .flat_map(|&tier| {
            PaymentMethod::ALL.iter().enumerate().map(move |(m, &method)| (tier, m, method))
        })
        .map(|(tier, m, method)| PaymentMix {
            tier,
            method,
            transactions: counts[tier.code()][m],
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub tier:               Tier,
    pub avg_product_cost:   f64,
    pub avg_logistics_cost: f64,
    pub avg_spoilage_cost:  f64,
}

pub fn cost_breakdown(transactions: &[TransactionRecord]) -> Vec<CostBreakdown> {
    let mut acc: [[Mean; 3]; 3] = Default::default();
    for t in transactions {
        let a = &mut acc[t.region_tier.code()];
        a[0].add(t.product_cost);
        a[1].add(t.logistics_cost);
        a[2].add(t.spoilage_cost);
    }
    Tier::ALL
        .iter()
        .map(|&tier| {
            let a = &acc[tier.code()];
            CostBreakdown {
                tier,
                avg_product_cost: a[0].value(),
                avg_logistics_cost: a[1].value(),
                avg_spoilage_cost: a[2].value(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerishableShare {
    pub tier:           Tier,
    pub perishable_pct: f64,
    pub transactions:   usize,
}

pub fn perishable_share(transactions: &[TransactionRecord]) -> Vec<PerishableShare> {
    let mut acc: [Mean; 3] = Default::default();
    for t in transactions {
        acc[t.region_tier.code()].add(if t.is_perishable { 1.0 } else { 0.0 });
    }
    Tier::ALL
        .iter()
        .map(|&tier| {
            let m = &acc[tier.code()];
            PerishableShare {
                tier,
                perishable_pct: m.value() * 100.0,
                transactions: m.n,
            }
        })
        .collect()
}

// ── Demographics ──────────────────────────────────────────────────

/// Digital-literacy bands over the 0-10 score: (0, 4], (4, 7], (7, 10].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LiteracyBracket {
    Low,
    Medium,
    High,
}

impl LiteracyBracket {
    pub const ALL: [LiteracyBracket; 3] = [Self::Low, Self::Medium, Self::High];

    /// Scores outside (0, 10] fall in no band.
    pub fn of(score: f64) -> Option<Self> {
        if !(score > 0.0 && score <= 10.0) {
            return None;
        }
        Some(if score <= 4.0 {
            Self::Low
        } else if score <= 7.0 {
            Self::Medium
        } else {
            Self::High
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low    => "Low",
            Self::Medium => "Medium",
            Self::High   => "High",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Low    => 0,
            Self::Medium => 1,
            Self::High   => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRevenue {
    pub tier:                     Tier,
    pub income_bracket: IncomeBracket,
    pub customers:           usize,
    pub avg_revenue:       f64,
}

/// Mean revenue per buying customer for every tier × income bracket,
/// zero-filled where a tier has no customer in the bracket.
pub fn income_revenue(profiles: &[CustomerProfile<'_>]) -> Vec<IncomeRevenue> {
    let mut acc = [[Mean::default(); 5]; 3];
    for p in profiles {
        let b = IncomeBracket::ALL
            .iter()
            .position(|&i| i == p.customer.income_bracket)
            .unwrap_or(0);
        acc[p.behavior.region_tier.code()][b].add(p.behavior.total_revenue);
    }
    Tier::ALL
        .iter()
        .flat_map(|&tier| IncomeBracket::ALL.iter().enumerate().map(move |(b, &bracket)| (tier, b, bracket)))
        .map(|(tier, b, income_bracket)| {
            let m = &acc[tier.code()][b];
            IncomeRevenue {
                tier,
                income_bracket,
                customers: m.n,
                avg_revenue: m.value(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteracyPurchases {
    pub tier:                   Tier,
    pub bracket:             LiteracyBracket,
    pub customers:         usize,
    pub avg_purchases: f64,
}

/// Mean purchase count for every tier × literacy band.
pub fn literacy_purchases(profiles: &[CustomerProfile<'_>]) -> Vec<LiteracyPurchases> {
    let mut acc = [[Mean::default(); 3]; 3];
    for p in profiles {
        if let Some(bracket) = LiteracyBracket::of(p.customer.digital_literacy_score) {
            acc[p.behavior.region_tier.code()][bracket.index()].add(p.behavior.purchase_count as f64);
        }
    }
    Tier::ALL
        .iter()
        .flat_map(|&tier| LiteracyBracket::ALL.iter().map(move |&bracket| (tier, bracket)))
        .map(|(tier, bracket)| {
            let m = &acc[tier.code()][bracket.index()];
            LiteracyPurchases {
                tier,
                bracket,
                customers: m.n,
                avg_purchases: m.value(),
            }
        })
        .collect()
}

// ── Inventory ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutSummary {
    pub tier:              Tier,
    pub avg_stockout_days: f64,
    pub records:           usize,
}

pub fn stockout_summary(inventory: &[InventoryRecord], stores: &[StoreRecord]) -> Vec<StockoutSummary> {
    let tier_of: HashMap<&str, Tier> = stores
        .iter()
        .map(|s| (s.store_id.as_str(), s.region_tier))
        .collect();
    let mut acc: [Mean; 3] = Default::default();
    for row in inventory {
        if let Some(tier) = tier_of.get(row.store_id.as_str()) {
            acc[tier.code()].add(row.stockout_days_last_month as f64);
        }
    }
    Tier::ALL
        .iter()
        .map(|&tier| StockoutSummary {
            tier,
            avg_stockout_days: acc[tier.code()].value(),
            records: acc[tier.code()].n,
        })
        .collect()
}

// ── Products and headline ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_id:   EntityId,
    pub product_name: String,
    pub category:     String,
    pub revenue:      f64,
}

/// The `limit` highest-revenue products; ties broken by product id.
pub fn top_products(
    transactions: &[TransactionRecord],
    products: &[ProductRecord],
    limit: usize,
) -> Vec<TopProduct> {
    let mut revenue: HashMap<&str, f64> = HashMap::new();
    for t in transactions {
        *revenue.entry(t.product_id.as_str()).or_default() += t.revenue;
    }
    let mut rows: Vec<TopProduct> = products
        .iter()
        .filter_map(|p| {
            revenue.get(p.product_id.as_str()).map(|&r| TopProduct {
                product_id: p.product_id.clone(),
                product_name: p.product_name.clone(),
                category: p.category.clone(),
                revenue: r,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    rows.truncate(limit);
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineTotals {
    pub transactions:     usize,
    pub total_revenue:    f64,
    pub total_margin:     f64,
    pub unique_customers: usize,
    pub stores:           usize,
    pub products:         usize,
}

pub fn headline_totals(dataset: &Dataset) -> HeadlineTotals {
    let unique_customers = dataset
        .transactions
        .iter()
        .map(|t| t.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    HeadlineTotals {
        transactions: dataset.transactions.len(),
        total_revenue: dataset.transactions.iter().map(|t| t.revenue).sum(),
        total_margin: dataset.transactions.iter().map(|t| t.margin).sum(),
        unique_customers,
        stores: dataset.stores.len(),
        products: dataset.products.len(),
    }
}

/// Per-customer modeling row: behaviour joined with demographics.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile<'a> {
    pub behavior: &'a CustomerBehavior,
    pub customer: &'a CustomerRecord,
}

/// Inner join of behaviour rows onto the customer table.
pub fn customer_profiles<'a>(
    behavior: &'a [CustomerBehavior],
    customers: &'a [CustomerRecord],
) -> Vec<CustomerProfile<'a>> {
    let by_id: HashMap<&str, &CustomerRecord> = customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c))
        .collect();
    behavior
        .iter()
        .filter_map(|b| {
            by_id
                .get(b.customer_id.as_str())
                .map(|&customer| CustomerProfile { behavior: b, customer })
        })
        .collect()
}

/// Every aggregate the reporting and modeling layers consume.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub regional:           Vec<RegionalPerformance>,
    pub categories:         Vec<CategoryPerformance>,
    pub customers:          Vec<CustomerBehavior>,
    pub behavior:           Vec<BehaviorSummary>,
    pub stores:             Vec<StorePerformance>,
    pub discounts:          Vec<DiscountImpact>,
    pub payments:           Vec<PaymentMix>,
    pub costs:              Vec<CostBreakdown>,
    pub perishables:        Vec<PerishableShare>,
    pub stockouts:          Vec<StockoutSummary>,
    pub top_products:       Vec<TopProduct>,
    pub income_revenue:     Vec<IncomeRevenue>,
    pub literacy_purchases: Vec<LiteracyPurchases>,
    pub headline:           HeadlineTotals,
}

pub const TOP_PRODUCT_LIMIT: usize = 15;

impl Aggregates {
    pub fn compute(dataset: &Dataset, repeat_threshold: u32) -> Self {
        let customers = customer_behavior(&dataset.transactions);
        let behavior = behavior_summary(&customers, repeat_threshold);
        let (income, literacy) = {
            let profiles = customer_profiles(&customers, &dataset.customers);
            (income_revenue(&profiles), literacy_purchases(&profiles))
        };
        Self {
            regional: regional_performance(&dataset.transactions),
            categories: category_performance(&dataset.transactions, &dataset.products),
            behavior,
            customers,
            stores: store_performance(&dataset.transactions, &dataset.stores),
            discounts: discount_impact(&dataset.transactions),
            payments: payment_mix(&dataset.transactions),
            costs: cost_breakdown(&dataset.transactions),
            perishables: perishable_share(&dataset.transactions),
            stockouts: stockout_summary(&dataset.inventory, &dataset.stores),
            top_products: top_products(&dataset.transactions, &dataset.products, TOP_PRODUCT_LIMIT),
            income_revenue: income,
            literacy_purchases: literacy,
            headline: headline_totals(dataset),
        }
    }

    pub fn regional_for(&self, tier: Tier) -> &RegionalPerformance {
        &self.regional[tier.code()]
    }

    pub fn behavior_for(&self, tier: Tier) -> &BehaviorSummary {
        &self.behavior[tier.code()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(id: &str, customer: &str, store: &str, tier: Tier, revenue: f64, margin: f64) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.into(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            customer_id: customer.into(),
            product_id: "PRD0001".into(),
            store_id: store.into(),
            region_tier: tier,
            quantity: 1,
            unit_price: revenue,
            revenue,
            product_cost: revenue - margin - 10.0,
            logistics_cost: 10.0,
            spoilage_cost: 0.0,
            total_cost: revenue - margin,
            margin,
            margin_pct: percent(margin, revenue),
            discount_pct: 0,
            delivery_time_hours: 2.0,
            delivery_distance_km: 5.0,
            payment_method: PaymentMethod::Upi,
            is_perishable: false,
        }
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            txn("T1", "C1", "S1", Tier::Metro, 100.0, 30.0),
            txn("T2", "C1", "S1", Tier::Metro, 200.0, 50.0),
            txn("T3", "C2", "S1", Tier::Metro, 100.0, 20.0),
            txn("T4", "C3", "S2", Tier::Tier3, 50.0, 2.0),
        ]
    }

    #[test]
    fn regional_derives_ratios_from_sums() {
        let rows = regional_performance(&sample());
        let metro = &rows[0];
        assert_eq!(metro.transactions, 3);
        assert_eq!(metro.unique_customers, 2);
        assert_eq!(metro.total_revenue, 400.0);
        assert_eq!(metro.margin_pct, 25.0);
        assert_eq!(metro.revenue_per_customer, 200.0);
        let tier2 = &rows[1];
        assert_eq!(tier2.transactions, 0);
        assert_eq!(tier2.margin_pct, 0.0);
    }

    #[test]
    fn repeat_rate_counts_threshold_inclusive() {
        let mut txns = sample();
        txns.push(txn("T5", "C1", "S1", Tier::Metro, 10.0, 1.0));
        let behavior = customer_behavior(&txns);
        assert_eq!(behavior[0].customer_id, "C1");
        assert_eq!(behavior[0].purchase_count, 3);
        let summary = behavior_summary(&behavior, 3);
        assert_eq!(summary[0].customers, 2);
        assert_eq!(summary[0].repeat_rate_pct, 50.0);
        assert_eq!(summary[2].repeat_rate_pct, 0.0);
    }

    #[test]
    fn aggregations_are_idempotent() {
        let txns = sample();
        assert_eq!(regional_performance(&txns), regional_performance(&txns));
        assert_eq!(customer_behavior(&txns), customer_behavior(&txns));
        assert_eq!(discount_impact(&txns), discount_impact(&txns));
        assert_eq!(payment_mix(&txns), payment_mix(&txns));
    }

    #[test]
    fn payment_mix_includes_zero_cells() {
        let mix = payment_mix(&sample());
        assert_eq!(mix.len(), 12);
        let metro_upi = mix
            .iter()
            .find(|m| m.tier == Tier::Metro && m.method == PaymentMethod::Upi)
            .unwrap();
        assert_eq!(metro_upi.transactions, 3);
        let tier2_cod = mix
            .iter()
            .find(|m| m.tier == Tier::Tier2 && m.method == PaymentMethod::Cod)
            .unwrap();
        assert_eq!(tier2_cod.transactions, 0);
    }

    fn customer(id: &str, tier: Tier, income_bracket: IncomeBracket, literacy: f64) -> CustomerRecord {
        CustomerRecord {
            customer_id: id.into(),
            primary_store_id: "S1".into(),
            region_tier: tier,
            age: 30,
            income_bracket,
            digital_literacy_score: literacy,
            registration_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
        }
    }

    fn behavior(id: &str, tier: Tier, purchases: u32, revenue: f64) -> CustomerBehavior {
        CustomerBehavior {
            customer_id: id.into(),
            region_tier: tier,
            purchase_count: purchases,
            total_revenue: revenue,
            total_margin: revenue * 0.2,
        }
    }

    #[test]
    fn literacy_brackets_are_right_inclusive() {
        assert_eq!(LiteracyBracket::of(0.0), None);
        assert_eq!(LiteracyBracket::of(0.01), Some(LiteracyBracket::Low));
        assert_eq!(LiteracyBracket::of(4.0), Some(LiteracyBracket::Low));
        assert_eq!(LiteracyBracket::of(4.01), Some(LiteracyBracket::Medium));
        assert_eq!(LiteracyBracket::of(7.0), Some(LiteracyBracket::Medium));
        assert_eq!(LiteracyBracket::of(10.0), Some(LiteracyBracket::High));
        assert_eq!(LiteracyBracket::of(10.5), None);
    }

    #[test]
    fn income_revenue_is_zero_filled_per_tier_and_bracket() {
        let customers = vec![
            customer("C1", Tier::Metro, IncomeBracket::Above75K, 8.0),
            customer("C2", Tier::Metro, IncomeBracket::Above75K, 9.0),
            customer("C3", Tier::Tier3, IncomeBracket::From10To15K, 3.0),
        ];
        let rows = vec![
            behavior("C1", Tier::Metro, 4, 1000.0),
            behavior("C2", Tier::Metro, 2, 500.0),
            behavior("C3", Tier::Tier3, 1, 80.0),
        ];
        let profiles = customer_profiles(&rows, &customers);
        let income = income_revenue(&profiles);

        assert_eq!(income.len(), 15);
        assert_eq!(income[0].tier, Tier::Metro);
        assert_eq!(income[0].income_bracket, IncomeBracket::ALL[0]);
        let rich_metro = income
            .iter()
            .find(|r| r.tier == Tier::Metro && r.income_bracket == IncomeBracket::Above75K)
            .unwrap();
        assert_eq!(rich_metro.customers, 2);
        assert!((rich_metro.avg_revenue - 750.0).abs() < 1e-9);
        let empty = income
            .iter()
            .find(|r| r.tier == Tier::Tier2 && r.income_bracket == IncomeBracket::From25To50K)
            .unwrap();
        assert_eq!(empty.customers, 0);
        assert_eq!(empty.avg_revenue, 0.0);
    }

    #[test]
    fn literacy_purchases_average_by_band() {
        let customers = vec![
            customer("C1", Tier::Metro, IncomeBracket::Above75K, 8.0),
            customer("C2", Tier::Metro, IncomeBracket::Above75K, 9.5),
            customer("C3", Tier::Metro, IncomeBracket::From15To25K, 4.0),
        ];
        let rows = vec![
            behavior("C1", Tier::Metro, 4, 1000.0),
            behavior("C2", Tier::Metro, 2, 500.0),
            behavior("C3", Tier::Metro, 1, 80.0),
        ];
        let profiles = customer_profiles(&rows, &customers);
        let literacy = literacy_purchases(&profiles);

        assert_eq!(literacy.len(), 9);
        let high = &literacy[2];
        assert_eq!((high.tier, high.bracket), (Tier::Metro, LiteracyBracket::High));
        assert_eq!(high.customers, 2);
        assert!((high.avg_purchases - 3.0).abs() < 1e-9);
        assert_eq!(literacy[0].customers, 1);
        assert_eq!(literacy[1].customers, 0);
        assert!(literacy[3..].iter().all(|r| r.customers == 0));
    }
}
