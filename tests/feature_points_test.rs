use ar_feature_points::synthetic::{SyntheticConfig, generate_session};
use ar_feature_points::{
    FeaturePointError, FeaturePointsConfig, FeaturePointsManager, MAX_POINTS, Point3D,
    PointIdentifier, RawPointCloud,
};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

fn cloud<I: IntoIterator<Item = PointIdentifier>>(ids: I) -> Vec<(PointIdentifier, Point3D)> {
    ids.into_iter()
        .map(|id| (id, Point3D::new(id as f32, -(id as f32), 0.5)))
        .collect()
}

#[test]
fn test_three_frame_scenario() {
    let mut manager = FeaturePointsManager::new();
    assert_eq!(manager.capacity(), MAX_POINTS);

    let removed = manager.update(cloud(1..=150)).unwrap();
    assert!(removed.is_empty());
    assert_eq!(manager.snapshot().len(), 150);

    let removed = manager.update(cloud(1..=250)).unwrap();
    assert!(removed.is_empty());
    assert_eq!(
        manager.snapshot().identifiers().collect::<Vec<_>>(),
        (1..=200).collect::<Vec<_>>()
    );
    assert_eq!(manager.last_truncated(), 50);

    let removed = manager.update(cloud((1..=50).chain(300..450))).unwrap();
    assert_eq!(removed, (51..=200).collect::<Vec<_>>());
    assert_eq!(manager.snapshot().len(), 200);
    assert!(manager.snapshot().contains(449));
    assert!(!manager.snapshot().contains(51));
    assert_eq!(manager.last_truncated(), 0);
}

#[test]
fn test_truncation_keeps_smallest_regardless_of_order() {
    let mut ids: Vec<PointIdentifier> = (0..500).map(|i| i * 7 + 3).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    ids.shuffle(&mut rng);

    let mut manager = FeaturePointsManager::with_capacity(120);
    manager.update(cloud(ids.iter().copied())).unwrap();

    let mut expected = ids.clone();
    expected.sort_unstable();
    expected.truncate(120);
    assert_eq!(manager.snapshot().identifiers().collect::<Vec<_>>(), expected);
    assert_eq!(manager.last_truncated(), 380);
}

#[test]
fn test_positions_follow_latest_frame() {
    let mut manager = FeaturePointsManager::new();
    manager.update(vec![(5, Point3D::ZERO), (6, Point3D::ONE)]).unwrap();
    let removed = manager
        .update(vec![(6, Point3D::new(1.0, 2.0, 3.0)), (5, Point3D::X)])
        .unwrap();
    assert!(removed.is_empty());
    assert_eq!(manager.snapshot().get(5), Some(&Point3D::X));
    assert_eq!(manager.snapshot().get(6), Some(&Point3D::new(1.0, 2.0, 3.0)));
}

#[test]
fn test_identical_input_is_noop() {
    let mut manager = FeaturePointsManager::new();
    let frame = cloud([9, 2, 40, 17]);
    manager.update(frame.clone()).unwrap();
    let before = manager.snapshot().clone();
    let removed = manager.update(frame).unwrap();
    assert!(removed.is_empty());
    assert_eq!(manager.snapshot(), &before);
}

#[test]
fn test_reset_clears_state() {
    let mut manager = FeaturePointsManager::new();
    manager.update(cloud(1..=30)).unwrap();
    manager.reset();
    assert!(manager.snapshot().is_empty());

    let removed = manager.update(cloud(100..110)).unwrap();
    assert!(removed.is_empty());
    assert_eq!(manager.snapshot().len(), 10);
}

#[test]
fn test_empty_frame_removes_everything() {
    let mut manager = FeaturePointsManager::new();
    manager.update(cloud([3, 1, 2])).unwrap();
    let removed = manager.update(Vec::new()).unwrap();
    assert_eq!(removed, vec![1, 2, 3]);
    assert!(manager.snapshot().is_empty());
}

#[test]
fn test_duplicate_identifiers_are_rejected_without_mutation() {
    let mut manager = FeaturePointsManager::new();
    manager.update(cloud(1..=5)).unwrap();
    let before = manager.snapshot().clone();

    let result = manager.update(vec![
        (8, Point3D::ZERO),
        (3, Point3D::ZERO),
        (8, Point3D::ONE),
    ]);
    assert!(matches!(result, Err(FeaturePointError::DuplicateIdentifier(8))));
    assert_eq!(manager.snapshot(), &before);

    // the next valid frame diffs against the state before the rejection
    let removed = manager.update(cloud([2, 4])).unwrap();
    assert_eq!(removed, vec![1, 3, 5]);
}

#[test]
fn test_cloud_length_mismatch() {
    let mut manager = FeaturePointsManager::new();
    let bad = RawPointCloud::new(vec![1, 2, 3], vec![Point3D::ZERO; 2]);
    assert!(matches!(
        manager.update_from_cloud(&bad),
        Err(FeaturePointError::LengthMismatch {
            identifiers: 3,
            points: 2
        })
    ));
    assert!(manager.snapshot().is_empty());
}

#[test]
fn test_convert_is_uncapped() {
    let raw: RawPointCloud = cloud((0..300).rev()).into_iter().collect();
    let set = FeaturePointsManager::convert(&raw).unwrap();
    assert_eq!(set.len(), 300);
    assert_eq!(set.identifiers().next(), Some(0));
}

#[test]
fn test_zero_capacity_tracks_nothing() {
    let mut manager = FeaturePointsManager::from_config(&FeaturePointsConfig::with_max_points(0));
    let removed = manager.update(cloud(1..10)).unwrap();
    assert!(removed.is_empty());
    assert!(manager.snapshot().is_empty());
    assert_eq!(manager.last_truncated(), 9);
}

#[test]
fn test_capacity_and_diff_over_synthetic_session() {
    let config = SyntheticConfig {
        seed: 3,
        num_frames: 60,
        spawn_rate: 35,
        lifetime: 12,
        no_data_every: 17,
        ..Default::default()
    };
    let mut manager = FeaturePointsManager::with_capacity(150);
    for frame in generate_session(&config) {
        let Some(cloud) = frame.cloud else {
            manager.reset();
            continue;
        };
        let previous: BTreeSet<_> = manager.snapshot().identifiers().collect();
        let removed = manager.update_from_cloud(&cloud).unwrap();
        let current: BTreeSet<_> = manager.snapshot().identifiers().collect();

        assert!(current.len() <= 150);
        let expected: Vec<_> = previous.difference(&current).copied().collect();
        assert_eq!(removed, expected);
        assert!(removed.windows(2).all(|w| w[0] < w[1]));
    }
}
