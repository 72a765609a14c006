//! Free-text query interpreter
//!
//! Turns a Russian-language sentence like "семейный кроссовер до 2 млн" into
//! a structured [`Filters`] record. The interpreter is a union-of-signals
//! classifier: a fixed ordered list of independent keyword rules plus two
//! numeric price patterns, all evaluated against the full lowercased text.
//! It never fails on non-empty input; a query matching zero rules yields an
//! all-empty record.

mod rules;

pub use rules::{Effect, KeywordRule, PriceFloor, KEYWORD_RULES};

use crate::error::{Result, WheelhouseError};
use ahash::HashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Default floor applied by the "дорогую"/"премиум" trigger
pub const DEFAULT_PREMIUM_FLOOR: i64 = 3_000_000;
/// Default floor applied by the "люкс"/"роскошную" trigger
pub const DEFAULT_LUXURY_FLOOR: i64 = 5_000_000;

/// Structured filter record produced by [`interpret`] and consumed by the
/// catalog search. Field names and types are a wire contract: callers render
/// the recognized filters back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    #[serde(default)]
    pub body_type: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub title: Vec<String>,
}

impl Filters {
    /// True when no dimension constrains the catalog
    pub fn is_unconstrained(&self) -> bool {
        self.price_min.is_none()
            && self.price_max.is_none()
            && self.body_type.is_empty()
            && self.tags.is_empty()
            && self.brands.is_empty()
            && self.title.is_empty()
    }

    /// Drop duplicate entries from every set field, keeping first-insertion
    /// order. Downstream consumers compare sets by membership only.
    fn dedup(&mut self) {
        for field in [
            &mut self.body_type,
            &mut self.tags,
            &mut self.brands,
            &mut self.title,
        ] {
            let mut seen = HashSet::default();
            field.retain(|v| seen.insert(v.clone()));
        }
    }
}

/// Interpreter with configurable default price floors
pub struct Interpreter {
    premium_floor: i64,
    luxury_floor: i64,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            premium_floor: DEFAULT_PREMIUM_FLOOR,
            luxury_floor: DEFAULT_LUXURY_FLOOR,
        }
    }
}

impl Interpreter {
    pub fn new(premium_floor: i64, luxury_floor: i64) -> Self {
        Self {
            premium_floor,
            luxury_floor,
        }
    }

    /// Interpret a free-text query into a filter record.
    ///
    /// Fails only with [`WheelhouseError::InvalidQuery`] when the input is
    /// empty or whitespace-only; every other input produces a (possibly
    /// all-empty) record.
    pub fn interpret(&self, query: &str) -> Result<Filters> {
        if query.trim().is_empty() {
            return Err(WheelhouseError::InvalidQuery);
        }

        let text = query.to_lowercase();
        let mut filters = Filters::default();

        // Explicit numeric bounds run first so user intent is recorded
        // before any default-setting rule is considered.
        filters.price_max = extract_price(price_max_re(), &text);
        filters.price_min = extract_price(price_min_re(), &text);

        // Semantic triggers may request a default floor; the highest
        // requested floor applies, and only when no explicit "от" bound
        // was given. An explicit "до" bound does not suppress the floor.
        let mut default_floor: Option<i64> = None;

        for rule in KEYWORD_RULES {
            if !rule.matches(&text) {
                continue;
            }
            tracing::debug!(rule = rule.name, "query rule fired");
            for effect in rule.effects {
                match effect {
                    Effect::BodyTypes(values) => {
                        filters.body_type.extend(values.iter().map(|v| v.to_string()));
                    }
                    Effect::Tags(values) => {
                        filters.tags.extend(values.iter().map(|v| v.to_string()));
                    }
                    Effect::Brands(values) => {
                        filters.brands.extend(values.iter().map(|v| v.to_string()));
                    }
                    Effect::TitleTerms(values) => {
                        filters.title.extend(values.iter().map(|v| v.to_string()));
                    }
                    Effect::DefaultFloor(floor) => {
                        let value = match floor {
                            PriceFloor::Premium => self.premium_floor,
                            PriceFloor::Luxury => self.luxury_floor,
                        };
                        default_floor = Some(default_floor.map_or(value, |f| f.max(value)));
                    }
                }
            }
        }

        if filters.price_min.is_none() {
            filters.price_min = default_floor;
        }

        filters.dedup();
        Ok(filters)
    }
}

/// Interpret with the built-in default floors
pub fn interpret(query: &str) -> Result<Filters> {
    Interpreter::default().interpret(query)
}

fn price_max_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "до 2 млн" / "до 2000000"; Cyrillic and Latin first letter both occur
    // in real queries.
    RE.get_or_init(|| Regex::new(r"до\s+(\d+)\s*([мm]лн)?").expect("valid regex"))
}

fn price_min_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"от\s+(\d+)\s*([мm]лн)?").expect("valid regex"))
}

/// First occurrence wins; later matches of the same pattern are ignored.
fn extract_price(re: &Regex, text: &str) -> Option<i64> {
    let caps = re.captures(text)?;
    let value: i64 = caps.get(1)?.as_str().parse().ok()?;
    if caps.get(2).is_some() {
        Some(value.saturating_mul(1_000_000))
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_invalid() {
        assert!(matches!(interpret(""), Err(WheelhouseError::InvalidQuery)));
        assert!(matches!(
            interpret("   "),
            Err(WheelhouseError::InvalidQuery)
        ));
    }

    #[test]
    fn test_unmatched_query_yields_empty_record() {
        let filters = interpret("просто какая-нибудь машина").unwrap();
        assert!(filters.is_unconstrained());
    }

    #[test]
    fn test_price_max_with_million_marker() {
        let filters = interpret("до 2 млн").unwrap();
        assert_eq!(filters.price_max, Some(2_000_000));
        assert_eq!(filters.price_min, None);
        assert!(filters.body_type.is_empty());
        assert!(filters.tags.is_empty());
    }

    #[test]
    fn test_price_max_plain_digits() {
        let filters = interpret("седан до 1500000 рублей").unwrap();
        assert_eq!(filters.price_max, Some(1_500_000));
        assert_eq!(filters.body_type, vec!["sedan"]);
    }

    #[test]
    fn test_price_range() {
        let filters = interpret("от 1 млн до 3 млн").unwrap();
        assert_eq!(filters.price_min, Some(1_000_000));
        assert_eq!(filters.price_max, Some(3_000_000));
    }

    #[test]
    fn test_first_price_match_wins() {
        let filters = interpret("до 2 млн или до 5 млн").unwrap();
        assert_eq!(filters.price_max, Some(2_000_000));
    }

    #[test]
    fn test_premium_default_floor_and_tags() {
        let filters = interpret("дорогую премиум машину").unwrap();
        assert_eq!(filters.price_min, Some(DEFAULT_PREMIUM_FLOOR));
        assert!(filters.tags.contains(&"premium".to_string()));
        assert!(filters.tags.contains(&"luxury".to_string()));
    }

    #[test]
    fn test_premium_floor_applies_alongside_explicit_price_max() {
        // The floor is suppressed only by an explicit lower bound; an upper
        // bound leaves it in effect.
        let filters = interpret("до 2 млн дорогую").unwrap();
        assert_eq!(filters.price_max, Some(2_000_000));
        assert_eq!(filters.price_min, Some(DEFAULT_PREMIUM_FLOOR));
    }

    #[test]
    fn test_explicit_price_min_beats_default_floor() {
        let filters = interpret("от 1 млн дорогую машину").unwrap();
        assert_eq!(filters.price_min, Some(1_000_000));
    }

    #[test]
    fn test_luxury_floor_beats_premium_floor() {
        let filters = interpret("дорогую люксовую машину").unwrap();
        assert_eq!(filters.price_min, Some(DEFAULT_LUXURY_FLOOR));
    }

    #[test]
    fn test_body_type_synonyms_union() {
        let filters = interpret("внедорожник или кроссовер").unwrap();
        assert_eq!(filters.body_type, vec!["SUV", "crossover"]);
    }

    #[test]
    fn test_multiple_rules_accumulate() {
        let filters = interpret("премиум немецкий седан").unwrap();
        assert!(filters.brands.contains(&"Lexus".to_string()));
        assert!(filters.brands.contains(&"Volkswagen".to_string()));
        assert_eq!(filters.body_type, vec!["sedan"]);
        // BMW appears in both the premium and german sets exactly once.
        let bmw_count = filters.brands.iter().filter(|b| *b == "BMW").count();
        assert_eq!(bmw_count, 1);
    }

    #[test]
    fn test_title_mentions() {
        let filters = interpret("Тойота или Шкода с пробегом").unwrap();
        assert_eq!(filters.title, vec!["Toyota", "Skoda"]);
    }

    #[test]
    fn test_no_duplicates_in_any_set_field() {
        let filters =
            interpret("комфортный комфорт семейный семейная машина дорогая премиум люкс").unwrap();
        for field in [
            &filters.body_type,
            &filters.tags,
            &filters.brands,
            &filters.title,
        ] {
            let mut sorted = field.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), field.len());
        }
    }

    #[test]
    fn test_configurable_floors() {
        let interp = Interpreter::new(1_000_000, 2_000_000);
        let filters = interp.interpret("дорогую").unwrap();
        assert_eq!(filters.price_min, Some(1_000_000));
    }

    #[test]
    fn test_wire_shape() {
        let filters = interpret("до 2 млн седан").unwrap();
        let json = serde_json::to_value(&filters).unwrap();
        assert!(json.get("price_min").unwrap().is_null());
        assert_eq!(json["price_max"], 2_000_000);
        assert_eq!(json["body_type"][0], "sedan");
        assert!(json["tags"].as_array().unwrap().is_empty());
        assert!(json["brands"].as_array().unwrap().is_empty());
        assert!(json["title"].as_array().unwrap().is_empty());
    }
}
