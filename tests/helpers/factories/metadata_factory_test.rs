use crate::engine::types::Origin;
use crate::test_helpers::factories::BlockMetadataFactory;

#[test]
fn defaults_are_altruistic() {
    let meta = BlockMetadataFactory::new().create();
    assert_eq!(meta.origin, Origin::Altruistic);
    assert_eq!(meta.size, 256);
}

#[test]
fn overrides_apply() {
    let meta = BlockMetadataFactory::new()
        .with("origin", "Personal")
        .with("access_count", 9)
        .with("last_accessed", 42.5)
        .create();
    assert_eq!(meta.origin, Origin::Personal);
    assert_eq!(meta.access_count, 9);
    assert!((meta.last_accessed - 42.5).abs() < f64::EPSILON);
}
