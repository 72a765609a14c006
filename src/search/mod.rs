//! Catalog search
//!
//! A pure function from (catalog snapshot, filter record) to the ordered
//! matching subset. Dimensions are AND-ed together; values within one
//! dimension are OR-ed. Results come back in ascending-identifier order and
//! an empty result is a valid outcome, not an error.
//!
//! The storage layer pushes the price/body/brand/title dimensions into SQL
//! and reuses [`matches_tags`] for the in-memory tag pass; this module is
//! the reference semantics both paths must agree on.

use crate::catalog::Vehicle;
use crate::query::Filters;

/// Apply a filter record to a catalog snapshot
pub fn apply(catalog: &[Vehicle], filters: &Filters) -> Vec<Vehicle> {
    let mut result: Vec<Vehicle> = catalog
        .iter()
        .filter(|v| matches(v, filters))
        .cloned()
        .collect();
    result.sort_by_key(|v| v.id);
    result
}

/// Full conjunctive predicate for a single vehicle
pub fn matches(vehicle: &Vehicle, filters: &Filters) -> bool {
    if let Some(max) = filters.price_max {
        if vehicle.price > max {
            return false;
        }
    }
    if let Some(min) = filters.price_min {
        if vehicle.price < min {
            return false;
        }
    }
    if !filters.body_type.is_empty()
        && !filters
            .body_type
            .iter()
            .any(|b| b.eq_ignore_ascii_case(&vehicle.body_type))
    {
        return false;
    }
    if !filters.brands.is_empty() && !filters.brands.iter().any(|b| b == &vehicle.brand) {
        return false;
    }
    if !filters.title.is_empty() {
        let title = vehicle.title.to_lowercase();
        if !filters
            .title
            .iter()
            .any(|t| title.contains(&t.to_lowercase()))
        {
            return false;
        }
    }
    matches_tags(vehicle, filters)
}

/// Tag dimension alone: vehicle must carry at least one tag from the set.
/// Evaluated last because the database-backed path can only apply it after
/// deserializing the per-row tag list.
pub fn matches_tags(vehicle: &Vehicle, filters: &Filters) -> bool {
    if filters.tags.is_empty() {
        return true;
    }
    filters.tags.iter().any(|t| vehicle.has_tag(t))
}
