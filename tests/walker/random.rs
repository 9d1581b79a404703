use std::collections::HashSet;

use hyperspace::{
    HyperParameterGrid, HyperSpaceWalker, ReseedPolicy, SamplingMemory, SearchCriteria,
    SearchStrategy,
};

use crate::{drain, target_encoding_grid};

fn indices(walker: &HyperSpaceWalker) -> Vec<u64> {
    drain(&mut walker.iterator())
        .iter()
        .map(|p| p.index())
        .collect()
}

fn random_walker(grid: HyperParameterGrid, seed: u64, memory: SamplingMemory) -> HyperSpaceWalker {
    let criteria = SearchCriteria::builder()
        .strategy(SearchStrategy::RandomDiscrete)
        .seed(seed)
        .sampling_memory(memory)
        .build()
        .unwrap();
    HyperSpaceWalker::new(grid, criteria, []).unwrap()
}

#[test]
fn random_search_never_repeats_within_a_pass() {
    for memory in [
        SamplingMemory::default(),
        SamplingMemory::VisitedSet { max_retries: 1 },
        SamplingMemory::Bijection,
    ] {
        let walker = random_walker(target_encoding_grid(), 11, memory);
        let drawn = indices(&walker);

        assert_eq!(drawn.len(), 54, "{memory:?}");
        let unique: HashSet<u64> = drawn.iter().copied().collect();
        assert_eq!(unique.len(), 54, "{memory:?}");
    }
}

#[test]
fn random_order_differs_from_cartesian() {
    let walker = random_walker(target_encoding_grid(), 5, SamplingMemory::default());
    let drawn = indices(&walker);
    assert_ne!(drawn, (0..54).collect::<Vec<_>>());
}

#[test]
fn same_seed_same_order() {
    for memory in [SamplingMemory::default(), SamplingMemory::Bijection] {
        let a = random_walker(target_encoding_grid(), 42, memory);
        let b = random_walker(target_encoding_grid(), 42, memory);
        assert_eq!(indices(&a), indices(&b), "{memory:?}");
    }
}

#[test]
fn different_seeds_give_different_orders() {
    let a = random_walker(target_encoding_grid(), 1, SamplingMemory::default());
    let b = random_walker(target_encoding_grid(), 2, SamplingMemory::default());
    assert_ne!(indices(&a), indices(&b));
}

#[test]
fn replay_policy_repeats_order_after_reset() {
    let walker = random_walker(target_encoding_grid(), 9, SamplingMemory::default());
    let mut it = walker.iterator();

    let first: Vec<u64> = drain(&mut it).iter().map(|p| p.index()).collect();
    it.reset();
    let second: Vec<u64> = drain(&mut it).iter().map(|p| p.index()).collect();
    assert_eq!(first, second);
}

#[test]
fn continue_policy_reshuffles_after_reset() {
    let criteria = SearchCriteria::builder()
        .strategy(SearchStrategy::RandomDiscrete)
        .seed(9)
        .reseed_policy(ReseedPolicy::Continue)
        .build()
        .unwrap();
    let walker = HyperSpaceWalker::new(target_encoding_grid(), criteria, []).unwrap();
    let mut it = walker.iterator();

    let first: Vec<u64> = drain(&mut it).iter().map(|p| p.index()).collect();
    it.reset();
    let second: Vec<u64> = drain(&mut it).iter().map(|p| p.index()).collect();

    assert_eq!(second.len(), 54);
    assert_ne!(first, second);
}

#[test]
fn bijection_covers_large_sparse_space() {
    // 7 * 11 * 13 = 1001 is just past a power-of-two boundary.
    let grid = HyperParameterGrid::builder()
        .param("a", 0..7)
        .param("b", 0..11)
        .param("c", 0..13)
        .build()
        .unwrap();
    let walker = random_walker(grid, 77, SamplingMemory::Bijection);

    let drawn = indices(&walker);
    let unique: HashSet<u64> = drawn.iter().copied().collect();
    assert_eq!(drawn.len(), 1001);
    assert_eq!(unique.len(), 1001);
}
