use hyperspace::{
    Draw, Error, HyperSpaceWalker, IteratorState, SearchCriteria, SearchStrategy, StopReason,
};

use crate::{blending_off_once, drain, target_encoding_grid};

fn random_with_budget(max_models: u64, seed: u64) -> SearchCriteria {
    SearchCriteria::builder()
        .strategy(SearchStrategy::RandomDiscrete)
        .max_models(max_models)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn max_models_caps_accepted_permutations() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .criteria(random_with_budget(10, 1))
        .filter(blending_off_once())
        .build()
        .unwrap();
    let mut it = walker.iterator();

    assert_eq!(drain(&mut it).len(), 10);
    assert_eq!(
        it.state(),
        IteratorState::Exhausted(StopReason::BudgetReached)
    );
}

#[test]
fn each_failure_buys_one_more_model() {
    for seed in 0..20 {
        let walker = HyperSpaceWalker::builder(target_encoding_grid())
            .criteria(random_with_budget(10, seed))
            .filter(blending_off_once())
            .build()
            .unwrap();
        let mut it = walker.iterator();

        let mut returned = Vec::new();
        while it.has_next(None) {
            if let Draw::Accepted(p) = it.next(None).unwrap() {
                returned.push(p);
                // The third model fails to train.
                if returned.len() == 3 {
                    it.notify_failed(None).unwrap();
                }
            }
        }

        assert_eq!(returned.len(), 11, "seed {seed}");
        assert_eq!(it.accepted_count(), 11, "seed {seed}");
        assert_eq!(it.failed_count(), 1, "seed {seed}");
    }
}

#[test]
fn every_failure_is_compensated() {
    let criteria = SearchCriteria::builder().max_models(5).build().unwrap();
    let walker = HyperSpaceWalker::new(target_encoding_grid(), criteria, []).unwrap();
    let mut it = walker.iterator();

    let mut returned = 0;
    while it.has_next(None) {
        if it.next(None).unwrap().is_accepted() {
            returned += 1;
            if returned % 2 == 0 {
                it.notify_failed(None).unwrap();
            }
        }
    }
    // 9 accepted with 4 failures leaves 5 successful models.
    assert_eq!(returned, 9);
    assert_eq!(it.remaining_budget(), Some(0));
}

#[test]
fn rejections_do_not_consume_budget() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .criteria(SearchCriteria::builder().max_models(28).build().unwrap())
        .filter(blending_off_once())
        .build()
        .unwrap();
    let mut it = walker.iterator();

    // Only 28 permutations survive the filter. The budget closes the
    // iterator before the trailing rejected combinations are drawn.
    assert_eq!(drain(&mut it).len(), 28);
    assert_eq!(
        it.state(),
        IteratorState::Exhausted(StopReason::BudgetReached)
    );
}

#[test]
fn budget_larger_than_space_stops_on_exhaustion() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .criteria(random_with_budget(1_000, 3))
        .build()
        .unwrap();
    let mut it = walker.iterator();

    assert_eq!(drain(&mut it).len(), 54);
    assert_eq!(
        it.state(),
        IteratorState::Exhausted(StopReason::SpaceExhausted)
    );
    assert_eq!(it.remaining_budget(), Some(946));
}

#[test]
fn failure_reported_before_has_next_extends_budget() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .criteria(random_with_budget(2, 4))
        .build()
        .unwrap();
    let mut it = walker.iterator();

    assert!(it.next(None).unwrap().is_accepted());
    assert!(it.next(None).unwrap().is_accepted());
    // Reporting before has_next observes the full budget keeps it open.
    it.notify_failed(None).unwrap();
    assert!(it.has_next(None));
    assert!(it.next(None).unwrap().is_accepted());
    assert!(!it.has_next(None));

    // Once the budget has closed the iterator, a late failure is refused
    // and the counts stay as they were.
    assert!(matches!(
        it.notify_failed(None),
        Err(Error::IllegalState(_))
    ));
    assert_eq!(it.failed_count(), 1);
    assert_eq!(it.remaining_budget(), Some(0));
    assert!(!it.has_next(None));
    assert!(matches!(it.next(None), Err(Error::IllegalState(_))));
}
