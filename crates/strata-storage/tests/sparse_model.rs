use std::collections::BTreeMap;

use strata_storage::{ListStorage, Storage};
use strata_test_utils::{list_from_entries, random_coord, random_entries, seeded_rng};

#[test]
fn list_storage_matches_map_model_under_random_edits() {
    let shape = [5, 4, 6];
    let mut rng = seeded_rng(0x5eed);
    let mut list = ListStorage::<i64>::new(shape.iter().copied().collect(), 0).unwrap();
    let mut model = BTreeMap::new();

    for step in 0..500 {
        let coord = random_coord(&mut rng, &shape);
        if step % 3 == 0 {
            assert_eq!(list.remove(&coord), model.remove(&coord));
        } else {
            let value = (step % 7) as i64;
            list.set(&coord, value);
            if value == 0 {
                model.remove(&coord);
            } else {
                model.insert(coord, value);
            }
        }
    }

    assert_eq!(list.count_stored(), model.len());
    let mut visited = Vec::new();
    list.for_each_entry(|c, v| visited.push((c.to_vec(), v)));
    let expected: Vec<_> = model.iter().map(|(c, &v)| (c.to_vec(), v)).collect();
    assert_eq!(visited, expected);
}

#[test]
fn removing_every_entry_prunes_all_levels() {
    let mut rng = seeded_rng(11);
    let entries = random_entries(&mut rng, &[3, 3, 3], 15);
    let mut list = list_from_entries(&[3, 3, 3], &entries);
    for coord in entries.keys() {
        assert!(list.remove(coord).is_some());
    }
    assert!(list.rows().is_empty());
    assert!(list.eq_value(0i64));
}

#[test]
fn cast_copy_preserves_equality() {
    let mut rng = seeded_rng(21);
    let entries = random_entries(&mut rng, &[6, 6], 12);
    let list = list_from_entries(&[6, 6], &entries);
    let as_float = list.cast_copy::<f64>();
    assert!(list.eq_storage(&as_float));
    assert!(as_float.eq_storage(&list));
    assert_eq!(as_float.count_stored(), list.count_stored());
}

#[test]
fn sparse_round_trip_through_dense() {
    let mut rng = seeded_rng(42);
    let entries = random_entries(&mut rng, &[4, 7], 9);
    let list = Storage::from(strata_storage::AnyList::from(list_from_entries(&[4, 7], &entries)));
    let dense = Storage::from(list.to_dense(strata_core::DType::Int32).unwrap());
    assert!(dense.eq_storage(&list));
    let back = dense
        .to_list(strata_core::DType::Int64, strata_core::Scalar::Int(0))
        .unwrap();
    assert_eq!(back.count_stored(), entries.len());
}
