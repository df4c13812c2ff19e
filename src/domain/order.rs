//! Merging recovered sibling order with the authoritative child set

use std::collections::HashSet;
use std::hash::Hash;

/// Orders `authoritative` children using `chain` where it is usable.
///
/// Chain elements come first, in chain order, as long as they belong to the
/// authoritative set. The remaining authoritative children follow in their
/// original order. The result holds every authoritative child exactly once
/// and nothing else.
pub fn merge_order<T>(chain: Option<&[T]>, authoritative: &[T]) -> Vec<T>
where
    T: Copy + Eq + Hash,
{
    let allowed: HashSet<T> = authoritative.iter().copied().collect();
    let mut placed: HashSet<T> = HashSet::with_capacity(authoritative.len());
    let mut merged = Vec::with_capacity(authoritative.len());

    let from_chain = chain
        .unwrap_or_default()
        .iter()
        .filter(|item| allowed.contains(*item));
    for &item in from_chain.chain(authoritative) {
        if placed.insert(item) {
            merged.push(item);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::full_chain(Some(vec!['c', 'a', 'b']), vec!['a', 'b', 'c'], vec!['c', 'a', 'b'])]
    #[case::no_chain(None, vec!['x', 'y'], vec!['x', 'y'])]
    #[case::partial_chain(Some(vec!['c', 'a']), vec!['a', 'b', 'c'], vec!['c', 'a', 'b'])]
    #[case::empty_chain(Some(vec![]), vec!['a', 'b'], vec!['a', 'b'])]
    #[case::foreign_element(Some(vec!['z', 'b']), vec!['a', 'b'], vec!['b', 'a'])]
    #[case::repeated_element(Some(vec!['b', 'b', 'a']), vec!['a', 'b'], vec!['b', 'a'])]
    #[case::no_children(Some(vec!['a']), vec![], vec![])]
    fn given_chain_and_children_when_merging_then_orders_as_expected(
        #[case] chain: Option<Vec<char>>,
        #[case] authoritative: Vec<char>,
        #[case] expected: Vec<char>,
    ) {
        let merged = merge_order(chain.as_deref(), &authoritative);

        assert_eq!(merged, expected);
    }

    #[test]
    fn given_any_chain_when_merging_then_result_is_permutation_of_children() {
        let authoritative: Vec<u32> = (0..20).collect();
        let chains: Vec<Vec<u32>> = vec![
            (0..20).rev().collect(),
            (10..40).collect(),
            vec![3, 3, 7, 99, 1],
            (0..20).step_by(3).collect(),
        ];

        for chain in &chains {
            let mut merged = merge_order(Some(chain.as_slice()), &authoritative);
            merged.sort_unstable();
            assert_eq!(merged, authoritative, "chain {:?}", chain);
        }
    }
}
