use scanhealth::core::network::stats_parsing::{
    parse_flat, parse_legacy, parse_nested, STATS_PARSERS,
};
use scanhealth::core::network::{fallback_stats, normalize_stats, StatsShape, LEGACY_CATEGORIES};
use serde_json::json;

#[test]
fn test_parser_order() {
    let shapes: Vec<StatsShape> = STATS_PARSERS.iter().map(|(shape, _)| *shape).collect();
    assert_eq!(
        shapes,
        vec![StatsShape::Nested, StatsShape::Flat, StatsShape::Legacy]
    );
}

#[test]
fn test_nested_takes_priority_over_flat_fields() {
    let data = json!({
        "stats": {"totalRecords": 1},
        "totalRecords": 99
    });

    let (shape, stats) = normalize_stats(&data).unwrap();

    assert_eq!(shape, StatsShape::Nested);
    assert_eq!(stats.total_records, 1);
}

#[test]
fn test_hybrid_flat_and_legacy_is_not_reconciled() {
    // Flat wins; the legacy counters are ignored and the total is not cross-checked
    let data = json!({
        "totalRecords": 5,
        "nutrients": 100
    });

    let (shape, stats) = normalize_stats(&data).unwrap();

    assert_eq!(shape, StatsShape::Flat);
    assert_eq!(stats.total_records, 5);
    assert!(stats.category_breakdown.is_empty());
}

#[test]
fn test_nested_requires_object() {
    assert!(parse_nested(&json!({"stats": 3})).is_none());
    assert!(parse_nested(&json!({"other": {}})).is_none());
}

#[test]
fn test_flat_clamps_quality() {
    let stats = parse_flat(&json!({"dataQuality": 250})).unwrap();
    assert_eq!(stats.data_quality, 100);
}

#[test]
fn test_flat_ignores_bad_counts() {
    let stats = parse_flat(&json!({
        "totalRecords": -4,
        "recentActivity": "lots",
        "categoryBreakdown": {"meals": 2.0, "scans": null}
    }))
    .unwrap();

    assert_eq!(stats.total_records, 0);
    assert_eq!(stats.recent_activity, 0);
    assert_eq!(stats.category_breakdown.get("meals"), Some(&2));
    assert_eq!(stats.category_breakdown.get("scans"), Some(&0));
}

#[test]
fn test_legacy_sum_and_caps() {
    let stats = parse_legacy(&json!({"products": 150, "scans": 50})).unwrap();

    assert_eq!(stats.total_records, 200);
    assert_eq!(stats.recent_activity, 100);
    assert_eq!(stats.data_quality, 75);
    assert_eq!(stats.category_breakdown.len(), LEGACY_CATEGORIES.len());
    assert_eq!(
        stats.total_records,
        stats.category_breakdown.values().sum::<u64>()
    );
}

#[test]
fn test_legacy_all_zero_quality() {
    let stats = parse_legacy(&json!({"waitlist": 0})).unwrap();

    assert_eq!(stats.total_records, 0);
    assert_eq!(stats.recent_activity, 0);
    assert_eq!(stats.data_quality, 25);
}

#[test]
fn test_unrecognized_shapes() {
    assert!(normalize_stats(&json!({})).is_none());
    assert!(normalize_stats(&json!({"message": "ok"})).is_none());
    assert!(normalize_stats(&json!([1, 2, 3])).is_none());
    assert!(normalize_stats(&json!("stats")).is_none());
}

#[test]
fn test_fallback_stats_is_deterministic() {
    let stats = fallback_stats();

    assert_eq!(stats, fallback_stats());
    assert_eq!(stats.total_records, 0);
    assert_eq!(stats.recent_activity, 0);
    assert_eq!(stats.data_quality, 0);
    assert_eq!(stats.category_breakdown.len(), 8);
    assert!(stats.category_breakdown.values().all(|count| *count == 0));
}

#[test]
fn test_stats_serialize_camel_case() {
    let value = serde_json::to_value(fallback_stats()).unwrap();

    assert!(value.get("totalRecords").is_some());
    assert!(value.get("categoryBreakdown").is_some());
    assert!(value.get("recentActivity").is_some());
    assert!(value.get("dataQuality").is_some());
}
