//! Database-backed vehicle catalog
//!
//! Price, body-type, brand and title dimensions of a search are pushed down
//! into SQL; the tag dimension needs the JSON-encoded tag column
//! deserialized per row, so it runs in memory over the already-narrowed
//! result (same predicate as the in-memory search path).

use crate::catalog::Vehicle;
use crate::error::{Result, WheelhouseError};
use crate::query::Filters;
use crate::search;
use crate::storage::database::Database;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row};
use std::sync::Arc;

const VEHICLE_COLUMNS: &str = "id, title, brand, model, year, price, body_type, \
     mileage, fuel_type, transmission, city, image, description, tags";

/// Catalog access over the shared database
#[derive(Clone)]
pub struct CatalogStore {
    db: Arc<Database>,
}

impl CatalogStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Number of catalog entries
    pub fn count(&self) -> Result<usize> {
        let conn = self.db.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Insert vehicles, replacing any existing row with the same id.
    /// Used by seeding only; normal request traffic never mutates the catalog.
    pub fn insert(&self, vehicles: &[Vehicle]) -> Result<usize> {
        let conn = self.db.get_conn()?;
        let mut inserted = 0;
        for v in vehicles {
            let tags = serde_json::to_string(&v.tags).map_err(|e| WheelhouseError::Json {
                source: e,
                context: format!("Failed to encode tags for vehicle {}", v.id),
            })?;
            conn.execute(
                "INSERT OR REPLACE INTO vehicles
                 (id, title, brand, model, year, price, body_type, mileage,
                  fuel_type, transmission, city, image, description, tags)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                rusqlite::params![
                    v.id,
                    v.title,
                    v.brand,
                    v.model,
                    v.year,
                    v.price,
                    v.body_type,
                    v.mileage,
                    v.fuel_type,
                    v.transmission,
                    v.city,
                    v.image,
                    v.description,
                    tags,
                ],
            )?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Full catalog in ascending-identifier order
    pub fn list(&self) -> Result<Vec<Vehicle>> {
        let conn = self.db.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], vehicle_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Single vehicle lookup
    pub fn get(&self, id: i64) -> Result<Vehicle> {
        let conn = self.db.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = ?1"
        ))?;
        let mut rows = stmt.query_map([id], vehicle_from_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(WheelhouseError::CarNotFound { id }),
        }
    }

    /// Vehicles with the given ids, ascending order. Missing ids are skipped.
    pub fn get_many(&self, ids: &[i64]) -> Result<Vec<Vehicle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.db.get_conn()?;
        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id IN ({placeholders}) ORDER BY id ASC"
        ))?;
        let params: Vec<Value> = ids.iter().map(|id| Value::Integer(*id)).collect();
        let rows = stmt.query_map(params_from_iter(params), vehicle_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Filtered search with SQL pushdown for everything but tags
    pub fn search(&self, filters: &Filters) -> Result<Vec<Vehicle>> {
        let mut sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE 1=1");
        let mut params: Vec<Value> = Vec::new();

        if let Some(max) = filters.price_max {
            sql.push_str(" AND price <= ?");
            params.push(Value::Integer(max));
        }
        if let Some(min) = filters.price_min {
            sql.push_str(" AND price >= ?");
            params.push(Value::Integer(min));
        }
        if !filters.body_type.is_empty() {
            let placeholders = vec!["?"; filters.body_type.len()].join(", ");
            sql.push_str(&format!(" AND lower(body_type) IN ({placeholders})"));
            for body in &filters.body_type {
                params.push(Value::Text(body.to_lowercase()));
            }
        }
        if !filters.brands.is_empty() {
            let placeholders = vec!["?"; filters.brands.len()].join(", ");
            sql.push_str(&format!(" AND brand IN ({placeholders})"));
            for brand in &filters.brands {
                params.push(Value::Text(brand.clone()));
            }
        }
        if !filters.title.is_empty() {
            let clauses = vec!["instr(lower(title), ?) > 0"; filters.title.len()].join(" OR ");
            sql.push_str(&format!(" AND ({clauses})"));
            for term in &filters.title {
                params.push(Value::Text(term.to_lowercase()));
            }
        }
        sql.push_str(" ORDER BY id ASC");

        let conn = self.db.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params), vehicle_from_row)?;
        let narrowed = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        // Tag pass over deserialized rows, same predicate as the in-memory
        // search.
        Ok(narrowed
            .into_iter()
            .filter(|v| search::matches_tags(v, filters))
            .collect())
    }
}

fn vehicle_from_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    let tags_json: String = row.get(13)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(13, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Vehicle {
        id: row.get(0)?,
        title: row.get(1)?,
        brand: row.get(2)?,
        model: row.get(3)?,
        year: row.get(4)?,
        price: row.get(5)?,
        body_type: row.get(6)?,
        mileage: row.get(7)?,
        fuel_type: row.get(8)?,
        transmission: row.get(9)?,
        city: row.get(10)?,
        image: row.get(11)?,
        description: row.get(12)?,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed::seed_vehicles;
    use tempfile::TempDir;

    fn store() -> (TempDir, CatalogStore) {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(Database::new(&temp_dir.path().join("test.db")).unwrap());
        let store = CatalogStore::new(db);
        store.insert(&seed_vehicles()).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_seed_and_list_roundtrip() {
        let (_dir, store) = store();
        let vehicles = store.list().unwrap();
        assert_eq!(vehicles.len(), seed_vehicles().len());
        // Tags survive the JSON text column.
        let rav4 = &vehicles[0];
        assert_eq!(rav4.id, 1);
        assert_eq!(rav4.tags, vec!["comfort", "family", "big_trunk"]);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(
            store.get(999),
            Err(WheelhouseError::CarNotFound { id: 999 })
        ));
    }

    #[test]
    fn test_seeding_twice_does_not_duplicate() {
        let (_dir, store) = store();
        store.insert(&seed_vehicles()).unwrap();
        assert_eq!(store.count().unwrap(), seed_vehicles().len());
    }

    #[test]
    fn test_pushdown_search_matches_in_memory_search() {
        let (_dir, store) = store();
        let catalog = seed_vehicles();

        let cases = vec![
            Filters::default(),
            Filters {
                price_max: Some(1_500_000),
                ..Default::default()
            },
            Filters {
                price_min: Some(3_000_000),
                body_type: vec!["suv".to_string(), "crossover".to_string()],
                ..Default::default()
            },
            Filters {
                brands: vec!["Toyota".to_string(), "BMW".to_string()],
                tags: vec!["premium".to_string()],
                ..Default::default()
            },
            Filters {
                title: vec!["golf".to_string(), "octavia".to_string()],
                ..Default::default()
            },
            Filters {
                tags: vec!["nonexistent_tag".to_string()],
                ..Default::default()
            },
        ];

        for filters in cases {
            let from_db: Vec<i64> = store
                .search(&filters)
                .unwrap()
                .iter()
                .map(|v| v.id)
                .collect();
            let in_memory: Vec<i64> = search::apply(&catalog, &filters)
                .iter()
                .map(|v| v.id)
                .collect();
            assert_eq!(from_db, in_memory, "filters: {:?}", filters);
        }
    }
}
