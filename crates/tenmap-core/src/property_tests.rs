//! Property-based tests for the labels algebra and unique metadata
//!
//! Random label rows are generated with proptest, including duplicates, and
//! the set operations are checked against their defining properties.

#[cfg(test)]
mod tests {
    use crate::ops::{unique_metadata, MetadataAxis};
    use crate::{DenseArray, LabelRows, Labels, TensorBlock, TensorMap};
    use proptest::prelude::*;

    // Rows of two small-valued columns, so duplicates are frequent
    fn rows_strategy() -> impl Strategy<Value = Vec<[i32; 2]>> {
        prop::collection::vec([0i32..5, -3i32..3], 0..40)
    }

    fn rows(entries: &[[i32; 2]]) -> LabelRows {
        LabelRows::new(&["a", "b"], entries.iter().flatten().copied().collect()).unwrap()
    }

    fn labels(entries: &[[i32; 2]]) -> Labels {
        rows(entries).unique()
    }

    #[test]
    fn test_proptest_smoke() {
        let unique = labels(&[[1, 0], [0, 0], [1, 0]]);
        assert_eq!(unique.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_unique_is_sorted_and_distinct(entries in rows_strategy()) {
            let unique = rows(&entries).unique();

            let collected = unique.iter().collect::<Vec<_>>();
            for pair in collected.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }

            for entry in &entries {
                prop_assert!(unique.contains(entry));
            }
            prop_assert!(unique.len() <= entries.len());
        }

        #[test]
        fn prop_unique_is_idempotent(entries in rows_strategy()) {
            let unique = rows(&entries).unique();
            prop_assert_eq!(unique.as_rows().unique(), unique.clone());
            prop_assert_eq!(unique.sorted(), unique);
        }

        #[test]
        fn prop_union_contains_both(first in rows_strategy(), second in rows_strategy()) {
            let a = labels(&first);
            let b = labels(&second);
            let union = a.union(&b).unwrap();

            for entry in a.iter().chain(b.iter()) {
                prop_assert!(union.contains(entry));
            }
            for entry in union.iter() {
                prop_assert!(a.contains(entry) || b.contains(entry));
            }

            // entries of `a` keep their positions
            for (i, entry) in a.iter().enumerate() {
                prop_assert_eq!(union.position(entry), Some(i));
            }

            prop_assert!(union.len() <= a.len() + b.len());
            prop_assert_eq!(union.intersection(&a).unwrap(), a);
        }

        #[test]
        fn prop_intersection_in_both(first in rows_strategy(), second in rows_strategy()) {
            let a = labels(&first);
            let b = labels(&second);
            let intersection = a.intersection(&b).unwrap();

            for entry in intersection.iter() {
                prop_assert!(a.contains(entry) && b.contains(entry));
            }
            for entry in a.iter() {
                prop_assert_eq!(intersection.contains(entry), b.contains(entry));
            }

            let union = a.union(&b).unwrap();
            prop_assert_eq!(union.len() + intersection.len(), a.len() + b.len());
        }

        #[test]
        fn prop_unique_metadata_matches_rows(
            first in rows_strategy(),
            second in rows_strategy(),
        ) {
            let make_block = |entries: &[[i32; 2]]| {
                let samples = labels(entries);
                TensorBlock::new(
                    DenseArray::<f64>::zeros(&[samples.len(), 1]),
                    samples,
                    Vec::<Labels>::new(),
                    Labels::range("p", 1).unwrap(),
                )
                .unwrap()
            };

            let tensor = TensorMap::new(
                Labels::range("key", 2).unwrap(),
                vec![make_block(&first), make_block(&second)],
            )
            .unwrap();

            let unique = unique_metadata(&tensor, MetadataAxis::Samples, &["a"], None).unwrap();

            let mut expected = first.iter().chain(&second).map(|e| e[0]).collect::<Vec<_>>();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(unique.values(), expected.as_slice());
        }
    }
}
