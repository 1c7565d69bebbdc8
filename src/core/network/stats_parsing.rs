//! Stats Response Parsing
//!
//! Normalizes the stats payloads the backend has served over time into one
//! canonical [`DatabaseStats`]. Each shape has its own pure parser; they are
//! tried in table order and the first match wins.
//!
//! - `{"stats": {...}}` → Nested
//! - `{"totalRecords": .., "categoryBreakdown": {..}, ..}` → Flat
//! - `{"nutrients": 10, "products": 5, ...}` → Legacy

use crate::core::network::types::{DatabaseStats, LEGACY_CATEGORIES};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const FLAT_FIELDS: [&str; 4] = [
    "totalRecords",
    "categoryBreakdown",
    "recentActivity",
    "dataQuality",
];

/// Recognized stats response shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsShape {
    Nested,
    Flat,
    Legacy,
}

impl StatsShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsShape::Nested => "nested",
            StatsShape::Flat => "flat",
            StatsShape::Legacy => "legacy",
        }
    }
}

pub type StatsParser = fn(&Value) -> Option<DatabaseStats>;

/// Parsers in priority order
pub const STATS_PARSERS: [(StatsShape, StatsParser); 3] = [
    (StatsShape::Nested, parse_nested),
    (StatsShape::Flat, parse_flat),
    (StatsShape::Legacy, parse_legacy),
];

/// Run the parser table against a decoded body
///
/// # Returns
/// * `Some((shape, stats))` - First shape that matched
/// * `None` - Body is not an object or carries no expected fields
pub fn normalize_stats(data: &Value) -> Option<(StatsShape, DatabaseStats)> {
    STATS_PARSERS
        .iter()
        .find_map(|(shape, parser)| parser(data).map(|stats| (*shape, stats)))
}

/// Static stats served when every network path fails
pub fn fallback_stats() -> DatabaseStats {
    DatabaseStats {
        total_records: 0,
        category_breakdown: LEGACY_CATEGORIES
            .iter()
            .map(|name| (name.to_string(), 0))
            .collect(),
        recent_activity: 0,
        data_quality: 0,
    }
}

/// `{"stats": {...}}` - the inner object is taken as canonical stats
pub fn parse_nested(data: &Value) -> Option<DatabaseStats> {
    let stats = data.as_object()?.get("stats")?.as_object()?;
    Some(stats_from_flat_fields(stats))
}

/// `{"totalRecords", "categoryBreakdown", "recentActivity", "dataQuality"}`
///
/// Matches when at least one of the four fields is present; missing ones
/// default to zero or an empty breakdown.
pub fn parse_flat(data: &Value) -> Option<DatabaseStats> {
    let obj = data.as_object()?;
    if !FLAT_FIELDS.iter().any(|field| obj.contains_key(*field)) {
        return None;
    }
    Some(stats_from_flat_fields(obj))
}

/// Legacy per-category counters
///
/// The total is the sum of the counters, recent activity is capped at 100
/// and quality is 75 when any records exist, otherwise 25.
pub fn parse_legacy(data: &Value) -> Option<DatabaseStats> {
    let obj = data.as_object()?;
    if !LEGACY_CATEGORIES.iter().any(|name| obj.contains_key(*name)) {
        return None;
    }

    let category_breakdown: BTreeMap<String, u64> = LEGACY_CATEGORIES
        .iter()
        .map(|name| (name.to_string(), count_field(obj, name)))
        .collect();
    let total_records: u64 = category_breakdown.values().sum();

    Some(DatabaseStats {
        total_records,
        category_breakdown,
        recent_activity: total_records.min(100),
        data_quality: if total_records > 0 { 75 } else { 25 },
    })
}

fn stats_from_flat_fields(obj: &Map<String, Value>) -> DatabaseStats {
    let category_breakdown = obj
        .get("categoryBreakdown")
        .and_then(Value::as_object)
        .map(|breakdown| {
            breakdown
                .iter()
                .map(|(name, count)| (name.clone(), as_count(count)))
                .collect()
        })
        .unwrap_or_default();

    DatabaseStats {
        total_records: count_field(obj, "totalRecords"),
        category_breakdown,
        recent_activity: count_field(obj, "recentActivity"),
        data_quality: count_field(obj, "dataQuality").min(100) as u32,
    }
}

fn count_field(obj: &Map<String, Value>, key: &str) -> u64 {
    obj.get(key).map(as_count).unwrap_or(0)
}

/// Non-negative integer view of a JSON value; anything else counts as zero
fn as_count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        })
        .unwrap_or(0)
}
