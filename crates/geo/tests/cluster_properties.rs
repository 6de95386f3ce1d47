//! Property tests for grid clustering.

use proptest::prelude::*;
use spotfeed_geo::{cluster, CellKey, GridClusterer, Located, Viewport};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
struct Tagged {
    idx: usize,
    lat: f64,
    lng: f64,
}

impl Located for Tagged {
    fn latitude(&self) -> f64 {
        self.lat
    }

    fn longitude(&self) -> f64 {
        self.lng
    }
}

fn items_strategy() -> impl Strategy<Value = Vec<Tagged>> {
    prop::collection::vec((-90.0f64..90.0, -180.0f64..180.0), 0..120).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(idx, (lat, lng))| Tagged { idx, lat, lng })
            .collect()
    })
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (-60.0f64..60.0, -120.0f64..120.0, 0.001f64..90.0, 0.001f64..180.0)
        .prop_map(|(lat, lng, dlat, dlng)| Viewport::new(lat, lng, dlat, dlng))
}

proptest! {
    #[test]
    fn every_item_lands_exactly_once(items in items_strategy(), viewport in viewport_strategy()) {
        let n = items.len();
        let result = cluster(&viewport, items);

        let mut seen: Vec<usize> = result.solo.iter().map(|t| t.idx).collect();
        for group in &result.clustered {
            seen.extend(group.content.iter().map(|t| t.idx));
        }
        seen.sort_unstable();

        prop_assert_eq!(seen, (0..n).collect::<Vec<_>>());
        prop_assert_eq!(result.len(), n);
    }

    #[test]
    fn groups_have_two_or_more_and_solo_keys_are_unique(
        items in items_strategy(),
        viewport in viewport_strategy(),
    ) {
        let clusterer = GridClusterer::default();
        let cell = clusterer.cell_size(&viewport).unwrap();

        let mut key_counts: HashMap<CellKey, usize> = HashMap::new();
        for item in &items {
            let key = CellKey::for_coordinate(item.coordinate(), cell).unwrap();
            *key_counts.entry(key).or_default() += 1;
        }

        let result = clusterer.cluster(&viewport, items);

        for group in &result.clustered {
            prop_assert!(group.count >= 2);
            prop_assert_eq!(group.count, group.content.len());
            for member in &group.content {
                let key = CellKey::for_coordinate(member.coordinate(), cell).unwrap();
                prop_assert_eq!(&group.id, &key.cluster_id());
            }
        }
        for item in &result.solo {
            let key = CellKey::for_coordinate(item.coordinate(), cell).unwrap();
            prop_assert_eq!(key_counts[&key], 1);
        }
    }

    #[test]
    fn centroid_is_member_mean(items in items_strategy(), viewport in viewport_strategy()) {
        let result = cluster(&viewport, items);

        for group in &result.clustered {
            let n = group.content.len() as f64;
            let lat = group.content.iter().map(|t| t.lat).sum::<f64>() / n;
            let lng = group.content.iter().map(|t| t.lng).sum::<f64>() / n;
            prop_assert!((group.coordinate.latitude - lat).abs() < 1e-9);
            prop_assert!((group.coordinate.longitude - lng).abs() < 1e-9);
        }
    }

    #[test]
    fn clustering_is_deterministic(items in items_strategy(), viewport in viewport_strategy()) {
        let first = cluster(&viewport, items.clone());
        let second = cluster(&viewport, items);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn solo_preserves_input_order(items in items_strategy(), viewport in viewport_strategy()) {
        let result = cluster(&viewport, items);
        let order: Vec<usize> = result.solo.iter().map(|t| t.idx).collect();
        prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn degenerate_span_returns_input_unchanged(items in items_strategy(), dlng in 0.0f64..10.0) {
        let viewport = Viewport::new(0.0, 0.0, 0.0, dlng);
        let result = cluster(&viewport, items.clone());
        prop_assert!(result.clustered.is_empty());
        prop_assert_eq!(result.solo, items);
    }
}

#[test]
fn empty_input_gives_empty_result() {
    let result = cluster::<Tagged, _>(&Viewport::new(10.0, 10.0, 1.0, 1.0), Vec::new());
    assert!(result.clustered.is_empty());
    assert!(result.solo.is_empty());
}
