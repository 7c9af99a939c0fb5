//! CSV export of the five generated tables.

use crate::{error::AnalysisResult, generator::Dataset};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const STORES_CSV: &str = "stores.csv";
pub const PRODUCTS_CSV: &str = "products.csv";
pub const CUSTOMERS_CSV: &str = "customers.csv";
pub const TRANSACTIONS_CSV: &str = "transactions.csv";
pub const INVENTORY_CSV: &str = "inventory.csv";

/// Field names of `T` in the order the csv serializer writes them.
fn header_of<T: Serialize + Default>() -> AnalysisResult<csv::StringRecord> {
    let mut scratch = csv::Writer::from_writer(Vec::new());
    scratch.serialize(T::default())?;
    let bytes = scratch.into_inner().map_err(|e| e.into_error())?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes.as_slice());
    match reader.records().next() {
        Some(header) => Ok(header?),
        None => Ok(csv::StringRecord::new()),
    }
}

/// Write `rows` with a header derived from the record's field names.
/// An empty table still gets its header row.
pub fn write_table<T: Serialize + Default>(path: &Path, rows: &[T]) -> AnalysisResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        writer.write_record(&header_of::<T>()?)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log::debug!("export: wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write every table into `dir`, creating it if needed. Returns the
/// written paths in table order.
pub fn export_dataset(dataset: &Dataset, dir: &Path) -> AnalysisResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let stores = dir.join(STORES_CSV);
    write_table(&stores, &dataset.stores)?;
    let products = dir.join(PRODUCTS_CSV);
    write_table(&products, &dataset.products)?;
    let customers = dir.join(CUSTOMERS_CSV);
    write_table(&customers, &dataset.customers)?;
    let transactions = dir.join(TRANSACTIONS_CSV);
    write_table(&transactions, &dataset.transactions)?;
    let inventory = dir.join(INVENTORY_CSV);
    write_table(&inventory, &dataset.inventory)?;

    log::info!("export: datasets saved to {}", dir.display());
    Ok(vec![stores, products, customers, transactions, inventory])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{inventory::InventoryRecord, products::ProductRecord};

    #[test]
    fn header_row_uses_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PRODUCTS_CSV);
        let rows = vec![ProductRecord {
            product_id: "PRD0001".into(),
            product_name: "Sugar 1kg".into(),
            category: "Groceries".into(),
            unit_cost: 40.0,
            list_price: 50.0,
            target_margin_pct: 20.0,
            is_perishable: false,
            avg_shelf_life_days: 365,
        }];
        write_table(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("product_id,product_name,category,unit_cost,list_price,target_margin_pct,is_perishable,avg_shelf_life_days")
        );
        assert_eq!(lines.next(), Some("PRD0001,Sugar 1kg,Groceries,40.0,50.0,20.0,false,365"));
    }

    #[test]
    fn empty_table_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(INVENTORY_CSV);
        write_table::<InventoryRecord>(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["inventory_id,store_id,product_id,current_stock,reorder_point,stockout_days_last_month,avg_daily_sales,last_restock_date"]
        );
    }
}
