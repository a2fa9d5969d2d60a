//! Merging of the two slide scans into one selection.

use crate::types::MergedSlideSet;
use std::collections::BTreeSet;

/// Union of image-slide numbers and visual-slide numbers, ascending, without
/// duplicates.
pub fn merge(
    image_slides: impl IntoIterator<Item = usize>,
    visual_slides: impl IntoIterator<Item = usize>,
) -> MergedSlideSet {
    let combined: BTreeSet<usize> = image_slides.into_iter().chain(visual_slides).collect();
    MergedSlideSet::from_unsorted(combined.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_merge_basic() {
        let merged = merge([1, 4], [1, 3]);
        assert_eq!(merged.as_slice(), &[1, 3, 4]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::<usize>::new(), Vec::<usize>::new()).is_empty());
        assert_eq!(merge([2], Vec::<usize>::new()).as_slice(), &[2]);
        assert_eq!(merge(Vec::<usize>::new(), [7, 2]).as_slice(), &[2, 7]);
    }

    proptest! {
        #[test]
        fn merged_is_sorted_union_without_duplicates(
            images in proptest::collection::vec(1usize..200, 0..40),
            visuals in proptest::collection::vec(1usize..200, 0..40),
        ) {
            let merged = merge(images.clone(), visuals.clone());
            let slice = merged.as_slice();

            prop_assert!(slice.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(merged.is_empty(), images.is_empty() && visuals.is_empty());
            for n in images.iter().chain(visuals.iter()) {
                prop_assert!(slice.contains(n));
            }
            for n in slice {
                prop_assert!(images.contains(n) || visuals.contains(n));
            }
        }
    }
}
