#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use units::Mass;

    use crate::body::BodyId;
    use crate::collisions::forest::*;
    use crate::error::AccretionError;
    use crate::test_support::collision_record;

    #[test]
    fn test_add_and_get() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(3), collision_record(5.0, [1.0, 0.5]))
            .unwrap();

        let entry = forest.get(BodyId(3)).unwrap();
        assert_eq!(entry.parents, [BodyId(1), BodyId(2)]);
        assert!(forest.get(BodyId(1)).is_none());
        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn test_child_must_be_newer_than_parents() {
        let mut forest = CollisionForest::new();
        let err = forest
            .add(BodyId(1), BodyId(5), BodyId(4), collision_record(5.0, [1.0, 0.5]))
            .unwrap_err();
        assert!(matches!(err, AccretionError::Lineage { child: BodyId(4), .. }));

        let err = forest
            .add(BodyId(2), BodyId(2), BodyId(4), collision_record(5.0, [1.0, 0.5]))
            .unwrap_err();
        assert!(matches!(err, AccretionError::Lineage { .. }));
        assert!(forest.is_empty());
    }

    #[test]
    fn test_child_recorded_once() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(3), collision_record(5.0, [1.0, 0.5]))
            .unwrap();
        assert!(
            forest
                .add(BodyId(1), BodyId(2), BodyId(3), collision_record(6.0, [1.0, 0.5]))
                .is_err()
        );
    }

    #[test]
    fn test_time_must_not_decrease() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(5), collision_record(5.0, [1.0, 0.5]))
            .unwrap();
        // Same time is fine, several collisions can happen in one step
        forest
            .add(BodyId(3), BodyId(4), BodyId(6), collision_record(5.0, [1.0, 0.5]))
            .unwrap();

        let err = forest
            .add(BodyId(5), BodyId(6), BodyId(7), collision_record(4.0, [1.5, 1.5]))
            .unwrap_err();
        assert!(matches!(err, AccretionError::OutOfOrder { .. }));
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn test_ancestors_of_seed_is_empty() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(3), collision_record(5.0, [1.0, 0.5]))
            .unwrap();

        assert_eq!(forest.ancestors(BodyId(1)).count(), 0);
        assert_eq!(forest.root_of(BodyId(1)), BodyId(1));
    }

    #[test]
    fn test_ancestors_follow_heavier_parent() {
        let mut forest = CollisionForest::new();
        // 1 (1.0) + 2 (0.5) -> 5
        forest
            .add(BodyId(1), BodyId(2), BodyId(5), collision_record(1.0, [1.0, 0.5]))
            .unwrap();
        // 3 (2.0) + 4 (0.1) -> 6
        forest
            .add(BodyId(3), BodyId(4), BodyId(6), collision_record(2.0, [2.0, 0.1]))
            .unwrap();
        // 5 (1.5) + 6 (2.1) -> 7, listed with the lighter parent first
        forest
            .add(BodyId(5), BodyId(6), BodyId(7), collision_record(3.0, [1.5, 2.1]))
            .unwrap();

        let chain: Vec<BodyId> = forest.ancestors(BodyId(7)).map(|(id, _)| id).collect();
        assert_eq!(chain, vec![BodyId(7), BodyId(6)]);
        assert_eq!(forest.root_of(BodyId(7)), BodyId(3));
        assert_eq!(forest.root_of(BodyId(5)), BodyId(1));
    }

    #[test]
    fn test_dominant_parent_tie_goes_to_target() {
        let entry = ForestEntry {
            parents: [BodyId(8), BodyId(2)],
            meta: collision_record(1.0, [1.0, 1.0]),
        };
        assert_eq!(entry.dominant_parent(), BodyId(8));
    }

    #[test]
    fn test_last_time() {
        let mut forest = CollisionForest::new();
        assert_eq!(forest.last_time(), None);
        forest
            .add(BodyId(1), BodyId(2), BodyId(3), collision_record(5.0, [1.0, 0.5]))
            .unwrap();
        forest
            .add(BodyId(3), BodyId(4), BodyId(5), collision_record(8.0, [1.5, 0.5]))
            .unwrap();
        assert_eq!(forest.last_time().map(|t| t.to_years()), Some(8.0));
    }

    #[test]
    fn test_round_trip_keeps_nested_records() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(3), collision_record(5.0, [1.0, 0.5]))
            .unwrap();

        let json = serde_json::to_value(&forest).unwrap();
        assert_eq!(json["3"]["parents"], serde_json::json!([1, 2]));
        assert!(json["3"]["metadata"]["adjusted_input"]["alpha"].is_number());

        let back: CollisionForest = serde_json::from_value(json).unwrap();
        assert_eq!(back, forest);
    }

    #[test]
    fn test_entries_written_as_meta_still_load() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(3), collision_record(5.0, [1.0, 0.5]))
            .unwrap();

        let mut json = serde_json::to_value(&forest).unwrap();
        let entry = json["3"].as_object_mut().unwrap();
        let metadata = entry.remove("metadata").unwrap();
        entry.insert("meta".to_string(), metadata);

        let back: CollisionForest = serde_json::from_value(json).unwrap();
        assert_eq!(back, forest);
    }

    #[test]
    fn test_child_must_be_newer_than_recorded_products() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(6), collision_record(5.0, [1.0, 0.5]))
            .unwrap();

        let err = forest
            .add(BodyId(3), BodyId(4), BodyId(5), collision_record(6.0, [1.0, 0.5]))
            .unwrap_err();
        assert!(matches!(err, AccretionError::Lineage { child: BodyId(5), .. }));
        assert_eq!(forest.last_time().map(|t| t.to_years()), Some(5.0));
    }

    #[test]
    fn test_validate_rejects_times_out_of_identity_order() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(5), collision_record(5.0, [1.0, 0.5]))
            .unwrap();
        forest
            .add(BodyId(3), BodyId(4), BodyId(6), collision_record(8.0, [1.0, 0.5]))
            .unwrap();
        assert!(forest.validate().is_ok());

        let mut json = serde_json::to_value(&forest).unwrap();
        json["6"]["metadata"]["time"] = serde_json::json!(2.0);
        let edited: CollisionForest = serde_json::from_value(json).unwrap();

        assert!(matches!(
            edited.validate(),
            Err(AccretionError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn test_merged_into() {
        let mut forest = CollisionForest::new();
        forest
            .add(BodyId(1), BodyId(2), BodyId(4), collision_record(5.0, [1.0, 0.5]))
            .unwrap();
        forest
            .add(BodyId(4), BodyId(3), BodyId(5), collision_record(6.0, [1.5, 0.5]))
            .unwrap();

        assert_eq!(forest.merged_into(BodyId(2)), Some(BodyId(4)));
        assert_eq!(forest.merged_into(BodyId(4)), Some(BodyId(5)));
        assert_eq!(forest.merged_into(BodyId(5)), None);
    }

    #[test]
    fn test_lost_mass_total() {
        let mut record = collision_record(1.0, [1.0, 0.5]);
        record.lost = LostMass {
            water: Mass::from_kg(1.0),
            mantle: Mass::from_kg(2.0),
            core: Mass::from_kg(0.5),
        };
        assert_eq!(record.lost_mass(), Mass::from_kg(3.5));
    }

    proptest! {
        #[test]
        fn ancestry_walk_terminates_without_revisits(
            masses in prop::collection::vec((0.01f64..10.0, 0.01f64..10.0), 1..40),
            picks in prop::collection::vec((0usize..1000, 0usize..1000), 40),
        ) {
            // Random merge history over a growing pool of bodies
            let mut forest = CollisionForest::new();
            let mut alive: Vec<u32> = (1..=8).collect();
            let mut next = 9u32;
            for (step, (m1, m2)) in masses.iter().enumerate() {
                if alive.len() < 2 {
                    break;
                }
                let (i, j) = picks[step];
                let first = alive.remove(i % alive.len());
                let second = alive.remove(j % alive.len());
                let record = collision_record(step as f64, [*m1, *m2]);
                forest.add(BodyId(first), BodyId(second), BodyId(next), record).unwrap();
                alive.push(next);
                next += 1;
            }

            for id in 1..next {
                let chain: Vec<BodyId> = forest.ancestors(BodyId(id)).map(|(id, _)| id).collect();
                prop_assert!(chain.len() < next as usize);
                prop_assert!(chain.windows(2).all(|w| w[1] < w[0]));
            }
        }
    }
}
