//! SQLite persistence layer.
//!
//! RULE: Only db.rs talks to the database.
//! Each table is written inside its own SQL transaction.

use crate::{
    error::AnalysisResult,
    generator::Dataset,
    types::Tier,
};
use rusqlite::{params, Connection};

/// Entity tables, by their SQL name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Stores,
    Products,
    Customers,
    Transactions,
    Inventory,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::Stores,
        Table::Products,
        Table::Customers,
        Table::Transactions,
        Table::Inventory,
    ];

    pub fn sql_name(&self) -> &'static str {
        match self {
            Self::Stores => "store",
            Self::Products => "product",
            Self::Customers => "customer",
            Self::Transactions => "sale",
            Self::Inventory => "inventory",
        }
    }
}

/// Per-tier sums computed in SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTotals {
    pub tier: String,
    pub transactions: i64,
    pub revenue: f64,
    pub margin: f64,
}

pub struct AnalysisDb {
    conn: Connection,
}

impl AnalysisDb {
    /// Open (or create) the analysis database at `path`.
    pub fn open(path: &str) -> AnalysisResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> AnalysisResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> AnalysisResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(&self, run_id: &str, seed: u64, version: &str) -> AnalysisResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    // ── Dataset ────────────────────────────────────────────────

    pub fn insert_dataset(&mut self, run_id: &str, dataset: &Dataset) -> AnalysisResult<()> {
        self.insert_stores(run_id, dataset)?;
        self.insert_products(run_id, dataset)?;
        self.insert_customers(run_id, dataset)?;
        self.insert_transactions(run_id, dataset)?;
        self.insert_inventory(run_id, dataset)?;
        log::info!("db: persisted run {run_id}");
        Ok(())
    }

    fn insert_stores(&mut self, run_id: &str, dataset: &Dataset) -> AnalysisResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO store (
                    run_id, store_id, store_name, region_tier, city, state,
                    city_population, infrastructure_score, warehouse_distance_km, opening_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for s in &dataset.stores {
                stmt.execute(params![
                    run_id,
                    &s.store_id,
                    &s.store_name,
                    s.region_tier.label(),
                    &s.city,
                    &s.state,
                    s.city_population as i64,
                    s.infrastructure_score,
                    s.warehouse_distance_km,
                    s.opening_date.to_string(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_products(&mut self, run_id: &str, dataset: &Dataset) -> AnalysisResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO product (
                    run_id, product_id, product_name, category, unit_cost, list_price,
                    target_margin_pct, is_perishable, avg_shelf_life_days
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for p in &dataset.products {
                stmt.execute(params![
                    run_id,
                    &p.product_id,
                    &p.product_name,
                    &p.category,
                    p.unit_cost,
                    p.list_price,
                    p.target_margin_pct,
                    p.is_perishable,
                    p.avg_shelf_life_days,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_customers(&mut self, run_id: &str, dataset: &Dataset) -> AnalysisResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO customer (
                    run_id, customer_id, primary_store_id, region_tier, age,
                    income_bracket, digital_literacy_score, registration_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for c in &dataset.customers {
                stmt.execute(params![
                    run_id,
                    &c.customer_id,
                    &c.primary_store_id,
                    c.region_tier.label(),
                    c.age,
                    c.income_bracket.label(),
                    c.digital_literacy_score,
                    c.registration_date.to_string(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_transactions(&mut self, run_id: &str, dataset: &Dataset) -> AnalysisResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO sale (
                    run_id, transaction_id, transaction_date, customer_id, product_id, store_id,
                    region_tier, quantity, unit_price, revenue, product_cost, logistics_cost,
                    spoilage_cost, total_cost, margin, margin_pct, discount_pct,
                    delivery_time_hours, delivery_distance_km, payment_method, is_perishable
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                          ?16, ?17, ?18, ?19, ?20, ?21)",
            )?;
            for t in &dataset.transactions {
                stmt.execute(params![
                    run_id,
                    &t.transaction_id,
                    t.transaction_date.to_string(),
                    &t.customer_id,
                    &t.product_id,
                    &t.store_id,
                    t.region_tier.label(),
                    t.quantity,
                    t.unit_price,
                    t.revenue,
                    t.product_cost,
                    t.logistics_cost,
                    t.spoilage_cost,
                    t.total_cost,
                    t.margin,
                    t.margin_pct,
                    t.discount_pct,
                    t.delivery_time_hours,
                    t.delivery_distance_km,
                    t.payment_method.label(),
                    t.is_perishable,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_inventory(&mut self, run_id: &str, dataset: &Dataset) -> AnalysisResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO inventory (
                    run_id, inventory_id, store_id, product_id, current_stock, reorder_point,
                    stockout_days_last_month, avg_daily_sales, last_restock_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for row in &dataset.inventory {
                stmt.execute(params![
                    run_id,
                    &row.inventory_id,
                    &row.store_id,
                    &row.product_id,
                    row.current_stock,
                    row.reorder_point,
                    row.stockout_days_last_month,
                    row.avg_daily_sales,
                    row.last_restock_date.to_string(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn count_rows(&self, table: Table, run_id: &str) -> AnalysisResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE run_id = ?1", table.sql_name());
        let n = self.conn.query_row(&sql, params![run_id], |row| row.get(0))?;
        Ok(n)
    }

    /// Transaction count, revenue and margin per tier, in tier order.
    pub fn tier_totals(&self, run_id: &str) -> AnalysisResult<Vec<TierTotals>> {
        let mut stmt = self.conn.prepare(
            "SELECT region_tier, COUNT(*), SUM(revenue), SUM(margin)
             FROM sale WHERE run_id = ?1
             GROUP BY region_tier",
        )?;
        let mut rows = stmt
            .query_map(params![run_id], |row| {
                Ok(TierTotals {
                    tier: row.get(0)?,
                    transactions: row.get(1)?,
                    revenue: row.get(2)?,
                    margin: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.sort_by_key(|r| {
            Tier::ALL
                .iter()
                .position(|t| t.label() == r.tier)
                .unwrap_or(usize::MAX)
        });
        Ok(rows)
    }

    pub fn run_seed(&self, run_id: &str) -> AnalysisResult<Option<u64>> {
        let mut stmt = self.conn.prepare("SELECT seed FROM run WHERE run_id = ?1")?;
        let mut rows = stmt.query(params![run_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get::<_, i64>(0)? as u64)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_repeatable() {
        let db = AnalysisDb::in_memory().unwrap();
        db.migrate().unwrap();
        db.migrate().unwrap();
        db.insert_run("run-1", 42, "test").unwrap();
        assert_eq!(db.run_seed("run-1").unwrap(), Some(42));
        assert_eq!(db.run_seed("missing").unwrap(), None);
        for table in Table::ALL {
            assert_eq!(db.count_rows(table, "run-1").unwrap(), 0);
        }
    }
}
