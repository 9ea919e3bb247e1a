use crate::engine::eviction::adaptive::AdaptiveStrategy;
use crate::engine::eviction::gradual::GradualStrategy;
use crate::engine::eviction::lfu::LfuStrategy;
use crate::engine::eviction::lru::LruStrategy;
use crate::engine::eviction::strategy::{EvictionStrategy, strategy_by_name};
use crate::engine::eviction::ttl::TtlStrategy;
use crate::engine::eviction::value_based::ValueBasedStrategy;
use crate::engine::health::{BlockHint, BlockHealthTracker, ReplicationBucket};
use crate::engine::types::BlockMetadata;
use crate::shared::clock::unix_now_secs;
use crate::shared::config::HealthSettings;
use crate::test_helpers::factories::BlockMetadataFactory;

fn tracker() -> BlockHealthTracker {
    BlockHealthTracker::new(HealthSettings {
        privacy_epsilon: 0.0,
        ..HealthSettings::default()
    })
}

fn meta(id: &str, size: u64, last_accessed: f64, access_count: u64) -> BlockMetadata {
    BlockMetadataFactory::new()
        .with("id", id)
        .with("size", size)
        .with("last_accessed", last_accessed)
        .with("access_count", access_count)
        .create()
}

#[test]
fn lru_orders_by_recency_then_admission() {
    let blocks = vec![
        meta("fresh", 100, 3_000.0, 1),
        meta("stale", 100, 1_000.0, 1),
        meta("middle", 100, 2_000.0, 1),
    ];
    let victims = LruStrategy.select_candidates(&blocks, 250, &tracker());
    let names: Vec<&str> = victims.iter().map(|v| v.as_str()).collect();
    assert_eq!(names, vec!["stale", "middle", "fresh"]);
}

#[test]
fn lru_breaks_recency_ties_by_admission_time() {
    let older = BlockMetadataFactory::new()
        .with("id", "older")
        .with("cached_at", 500.0)
        .with("last_accessed", 1_000.0)
        .create();
    let newer = BlockMetadataFactory::new()
        .with("id", "newer")
        .with("cached_at", 900.0)
        .with("last_accessed", 1_000.0)
        .create();
    let victims = LruStrategy.select_candidates(&[newer, older], 1, &tracker());
    assert_eq!(victims[0].as_str(), "older");
}

#[test]
fn lfu_orders_by_frequency_then_recency() {
    let blocks = vec![
        meta("hot", 100, 1_000.0, 50),
        meta("cold", 100, 2_000.0, 2),
        meta("coldest", 100, 1_500.0, 2),
    ];
    let victims = LfuStrategy.select_candidates(&blocks, 150, &tracker());
    let names: Vec<&str> = victims.iter().map(|v| v.as_str()).collect();
    // Equal frequency: the earlier-accessed block goes first.
    assert_eq!(names, vec!["coldest", "cold"]);
}

#[test]
fn selection_stops_once_demand_is_covered() {
    let blocks = vec![
        meta("a", 400, 1_000.0, 1),
        meta("b", 400, 2_000.0, 1),
        meta("c", 400, 3_000.0, 1),
    ];
    let victims = LruStrategy.select_candidates(&blocks, 500, &tracker());
    assert_eq!(victims.len(), 2);
}

#[test]
fn value_based_evicts_lowest_value_first() {
    let t = tracker();
    let now = unix_now_secs();

    let mut precious = BlockHint::new(ReplicationBucket::Low, 100);
    precious.high_entropy = true;
    t.update_health_at(&"precious".into(), &mut precious, now);
    let mut common = BlockHint::new(ReplicationBucket::High, 100);
    t.update_health_at(&"common".into(), &mut common, now);

    let blocks = vec![
        meta("precious", 100, 1_000.0, 1),
        meta("common", 100, 1_000.0, 1),
    ];
    let victims = ValueBasedStrategy.select_candidates(&blocks, 100, &t);
    assert_eq!(victims[0].as_str(), "common");
}

#[test]
fn ttl_only_returns_expired_blocks() {
    let now = unix_now_secs();
    let blocks = vec![
        meta("expired", 100, now - 7_200.0, 1),
        meta("fresh", 100, now - 60.0, 1),
        meta("long_expired", 100, now - 10_000.0, 1),
    ];
    let victims = TtlStrategy::new(3_600.0).select_candidates(&blocks, 10_000, &tracker());
    let names: Vec<&str> = victims.iter().map(|v| v.as_str()).collect();
    // Earliest expiry first; the fresh block is untouchable.
    assert_eq!(names, vec!["long_expired", "expired"]);
}

#[test]
fn adaptive_rotates_per_initial_weights() {
    let strategy = AdaptiveStrategy::new();
    let t = tracker();
    let now = unix_now_secs();
    let blocks = vec![meta("a", 100, now - 10.0, 1)];

    // Ten selections follow the 0.4/0.4/0.2 split without drift.
    for _ in 0..10 {
        let victims = strategy.select_candidates(&blocks, 50, &t);
        assert_eq!(victims.len(), 1);
    }
    let weights = strategy.weights();
    assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert_eq!(weights, [0.4, 0.4, 0.2]);
}

#[test]
fn adaptive_adjusts_weights_after_two_windows() {
    let strategy = AdaptiveStrategy::new();
    let t = tracker();
    let now = unix_now_secs();
    let blocks = vec![meta("a", 100, now - 10.0, 1)];
    let _ = strategy.select_candidates(&blocks, 50, &t);

    // First window: 50% hit rate. Second window: all hits, so the incumbent
    // is reinforced.
    for i in 0..200 {
        strategy.note_request(i % 2 == 0);
    }
    let _ = strategy.select_candidates(&blocks, 50, &t);
    for _ in 0..200 {
        strategy.note_request(true);
    }

    let weights = strategy.weights();
    assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    assert!(weights != [0.4, 0.4, 0.2], "weights should have moved");
}

#[test]
fn gradual_caps_each_batch_to_a_tenth() {
    let blocks: Vec<BlockMetadata> = (0..40)
        .map(|i| meta(&format!("b{i}"), 100, 1_000.0 + i as f64, 1))
        .collect();
    let gradual = GradualStrategy::new(Box::new(LruStrategy));
    // Demand would take all 40; the batch stays at 10%.
    let victims = gradual.select_candidates(&blocks, 100 * 40, &tracker());
    assert_eq!(victims.len(), 4);
    assert_eq!(victims[0].as_str(), "b0");
}

#[test]
fn strategy_names_resolve() {
    for name in ["LRU", "LFU", "ValueBased", "Adaptive"] {
        let strategy = strategy_by_name(name, false).expect("known name");
        assert_eq!(strategy.name(), name);
    }
    assert!(strategy_by_name("Nonsense", false).is_none());

    let wrapped = strategy_by_name("LRU", true).expect("gradual LRU");
    assert_eq!(wrapped.name(), "LRU");
}
