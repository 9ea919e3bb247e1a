use crate::engine::health::ReplicationBucket;
use crate::test_helpers::factories::BlockHintFactory;

#[test]
fn defaults_to_medium_replication() {
    let hint = BlockHintFactory::new().create();
    assert_eq!(hint.replication, ReplicationBucket::Medium);
    assert!(!hint.high_entropy);
}

#[test]
fn overrides_apply() {
    let hint = BlockHintFactory::new()
        .with("replication", "Low")
        .with("high_entropy", true)
        .with("missing_regions", 4)
        .create();
    assert_eq!(hint.replication, ReplicationBucket::Low);
    assert!(hint.high_entropy);
    assert_eq!(hint.missing_regions, 4);
}
