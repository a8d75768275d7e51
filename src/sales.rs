//! Sales records used by the demo dashboards.
//!
//! [`SalesStore`] keeps records in memory with the usual create, read,
//! update and delete operations. Loading records from elsewhere goes through
//! [`parse_response`], whose failures can be turned into demo data with
//! [`OrMock::or_mock`].

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::component::Row;

/// Categories offered when entering a sale.
pub const CATEGORIES: [&str; 4] = ["Electronics", "Accessories", "Software", "Services"];

/// Products offered when entering a sale.
pub const PRODUCTS: [&str; 8] = [
    "Laptop",
    "Smartphone",
    "Headphones",
    "Monitor",
    "Keyboard",
    "Mouse",
    "Tablet",
    "Printer",
];

/// Months in calendar order.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Units sold and revenue for one product in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Assigned by the store; ignored on create.
    #[serde(default)]
    pub id: u64,
    /// Product name.
    pub product: String,
    /// Product category.
    pub category: String,
    /// Units sold.
    pub sales: u32,
    /// Revenue in currency units.
    pub revenue: f64,
    /// Month name.
    pub month: String,
}

impl SalesRecord {
    /// A record that has not been stored yet.
    #[must_use]
    pub fn new(product: &str, category: &str, sales: u32, revenue: f64, month: &str) -> Self {
        Self {
            id: 0,
            product: product.to_owned(),
            category: category.to_owned(),
            sales,
            revenue,
            month: month.to_owned(),
        }
    }

    /// The record as a table row.
    #[must_use]
    pub fn to_row(&self) -> Row {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(row)) => row,
            _ => Row::new(),
        }
    }
}

/// Why sales data could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a status other than 200.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// The body was not the expected JSON.
    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),
    /// The request never completed.
    #[error("request failed: {0}")]
    Unavailable(String),
}

/// Makes falling back to demo data an explicit step.
pub trait OrMock<T> {
    /// Returns the loaded value, or logs the failure and returns `fallback()`.
    fn or_mock(self, fallback: impl FnOnce() -> T) -> T;
}

impl<T> OrMock<T> for Result<T, FetchError> {
    fn or_mock(self, fallback: impl FnOnce() -> T) -> T {
        self.unwrap_or_else(|error| {
            warn!(%error, "falling back to demo data");
            fallback()
        })
    }
}

/// Decodes a response carrying a JSON array of records.
///
/// # Errors
///
/// Fails with [`FetchError::Status`] unless `status` is 200, and with
/// [`FetchError::Parse`] if the body does not decode.
pub fn parse_response(status: u16, body: &str) -> Result<Vec<SalesRecord>, FetchError> {
    if status != 200 {
        return Err(FetchError::Status(status));
    }
    Ok(serde_json::from_str(body)?)
}

/// The ten records the demo starts with, numbered from 1.
#[must_use]
pub fn demo_records() -> Vec<SalesRecord> {
    let seed = [
        ("Laptop", "Electronics", 120, 120_000.0, "January"),
        ("Smartphone", "Electronics", 200, 100_000.0, "January"),
        ("Headphones", "Accessories", 150, 15_000.0, "January"),
        ("Monitor", "Electronics", 80, 24_000.0, "January"),
        ("Keyboard", "Accessories", 100, 5_000.0, "January"),
        ("Laptop", "Electronics", 130, 130_000.0, "February"),
        ("Smartphone", "Electronics", 180, 90_000.0, "February"),
        ("Headphones", "Accessories", 170, 17_000.0, "February"),
        ("Monitor", "Electronics", 85, 25_500.0, "February"),
        ("Keyboard", "Accessories", 110, 5_500.0, "February"),
    ];
    seed.into_iter()
        .zip(1..)
        .map(|((product, category, sales, revenue, month), id)| SalesRecord {
            id,
            ..SalesRecord::new(product, category, sales, revenue, month)
        })
        .collect()
}

/// In-memory record storage with store-assigned ids.
#[derive(Debug, Clone, Default)]
pub struct SalesStore {
    records: Vec<SalesRecord>,
    next_id: u64,
}

impl SalesStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// A store holding [`demo_records`].
    #[must_use]
    pub fn seeded() -> Self {
        let records = demo_records();
        let next_id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;
        Self { records, next_id }
    }

    /// Every record in insertion order.
    #[must_use]
    pub fn list(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks a record up by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&SalesRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Stores `record` under a fresh id and returns the stored copy.
    pub fn create(&mut self, record: SalesRecord) -> SalesRecord {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let stored = SalesRecord { id, ..record };
        self.records.push(stored.clone());
        stored
    }

    /// Overwrites every field of record `id` except the id itself.
    pub fn update(&mut self, id: u64, record: SalesRecord) -> Option<SalesRecord> {
        let slot = self.records.iter_mut().find(|existing| existing.id == id)?;
        *slot = SalesRecord { id, ..record };
        Some(slot.clone())
    }

    /// Deletes record `id`. Returns `false` if there was none.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.distinct(|record| &record.category)
    }

    /// Distinct products in order of first appearance.
    #[must_use]
    pub fn products(&self) -> Vec<String> {
        self.distinct(|record| &record.product)
    }

    /// Distinct months in calendar order. Unknown month names go last.
    #[must_use]
    pub fn months(&self) -> Vec<String> {
        let mut months = self.distinct(|record| &record.month);
        months.sort_by_key(|month| {
            MONTHS
                .iter()
                .position(|known| known.eq_ignore_ascii_case(month))
                .unwrap_or(MONTHS.len())
        });
        months
    }

    /// Every record as a table row.
    #[must_use]
    pub fn rows(&self) -> Vec<Row> {
        self.records.iter().map(SalesRecord::to_row).collect()
    }

    fn distinct(&self, field: impl Fn(&SalesRecord) -> &String) -> Vec<String> {
        self.records
            .iter()
            .map(field)
            .cloned()
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_matches_the_demo_data() {
        let store = SalesStore::seeded();
        assert_eq!(store.len(), 10);
        assert_eq!(store.get(1).map(|r| r.product.as_str()), Some("Laptop"));
        assert_eq!(store.get(10).map(|r| r.revenue), Some(5_500.0));
        assert_eq!(store.categories(), ["Electronics", "Accessories"]);
        assert_eq!(
            store.products(),
            ["Laptop", "Smartphone", "Headphones", "Monitor", "Keyboard"]
        );
        assert_eq!(store.months(), ["January", "February"]);
    }

    #[test]
    fn create_update_delete() {
        let mut store = SalesStore::seeded();
        let created = store.create(SalesRecord::new("Tablet", "Electronics", 40, 16_000.0, "March"));
        assert_eq!(created.id, 11);
        assert_eq!(store.get(11), Some(&created));

        let updated = store
            .update(11, SalesRecord::new("Tablet", "Electronics", 45, 18_000.0, "March"))
            .unwrap();
        assert_eq!(updated.id, 11);
        assert_eq!(store.get(11).map(|r| r.sales), Some(45));
        assert_eq!(store.update(99, created.clone()), None);

        assert!(store.delete(11));
        assert!(!store.delete(11));
        assert_eq!(store.len(), 10);
        // Ids are not reused.
        assert_eq!(store.create(created).id, 12);
    }

    #[test]
    fn empty_store_starts_at_one() {
        let mut store = SalesStore::new();
        assert!(store.is_empty());
        let record = store.create(SalesRecord::new("Mouse", "Accessories", 1, 20.0, "May"));
        assert_eq!(record.id, 1);

        let mut defaulted = SalesStore::default();
        assert_eq!(defaulted.create(record).id, 1);
    }

    #[test]
    fn months_sort_by_calendar() {
        let mut store = SalesStore::new();
        for month in ["March", "Smarch", "January"] {
            store.create(SalesRecord::new("Mouse", "Accessories", 1, 1.0, month));
        }
        assert_eq!(store.months(), ["January", "March", "Smarch"]);
    }

    #[test]
    fn records_become_rows() {
        let row = SalesStore::seeded().rows().remove(0);
        assert_eq!(row.get("product"), Some(&serde_json::json!("Laptop")));
        assert_eq!(row.get("sales"), Some(&serde_json::json!(120)));
        assert_eq!(row.get("id"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn responses_parse_or_explain_why_not() {
        let body = r#"[{"product":"Laptop","category":"Electronics","sales":1,"revenue":2.5,"month":"May"}]"#;
        let records = parse_response(200, body).unwrap();
        assert_eq!(records[0].id, 0);
        assert_eq!(records[0].revenue, 2.5);

        assert!(matches!(parse_response(503, body), Err(FetchError::Status(503))));
        assert!(matches!(parse_response(200, "<html>"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn failures_fall_back_to_demo_data() {
        let loaded = parse_response(500, "").or_mock(demo_records);
        assert_eq!(loaded, demo_records());

        let fine: Result<Vec<SalesRecord>, FetchError> = Ok(Vec::new());
        assert!(fine.or_mock(demo_records).is_empty());

        let offline: Result<u32, FetchError> = Err(FetchError::Unavailable("offline".into()));
        assert_eq!(offline.or_mock(|| 7), 7);
    }
}
