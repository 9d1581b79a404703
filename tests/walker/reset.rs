use hyperspace::{Draw, HyperParameterGrid, HyperSpaceWalker, SearchCriteria, Value};

use crate::{blending_off_once, drain, target_encoding_grid};

/// Three permutations, all with blending disabled.
fn blending_off_grid() -> HyperParameterGrid {
    HyperParameterGrid::builder()
        .param("_blending", [false])
        .param("_noise_level", [0.0, 0.01, 0.1])
        .param("_k", [1.0])
        .param("_f", [3.0])
        .build()
        .unwrap()
}

#[test]
fn reset_clears_suppression_state() {
    let walker = HyperSpaceWalker::builder(blending_off_grid())
        .criteria(SearchCriteria::random_discrete())
        .filter(blending_off_once())
        .build()
        .unwrap();
    let mut it = walker.iterator();

    let mut returned = Vec::new();
    let mut was_reset = false;
    while it.has_next(None) {
        let draw = it.next(None).unwrap();
        if !was_reset && returned.len() == 1 {
            // Discard this draw and start over.
            it.reset();
            was_reset = true;
        } else if let Draw::Accepted(p) = draw {
            returned.push(p);
        }
    }

    // Without the reset only one permutation would pass the filter.
    assert_eq!(returned.len(), 2);
}

#[test]
fn reset_mid_pass_restarts_from_the_beginning() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .build()
        .unwrap();
    let mut it = walker.iterator();

    for _ in 0..10 {
        it.next(None).unwrap();
    }
    it.reset();
    assert_eq!(it.draws(), 0);

    let first = it.next(None).unwrap().into_accepted().unwrap();
    assert_eq!(first.index(), 0);
    assert_eq!(first.get("_blending"), Some(&Value::Bool(true)));
}

#[test]
fn reset_keeps_counts() {
    let criteria = SearchCriteria::builder().max_models(30).build().unwrap();
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .criteria(criteria)
        .filter(blending_off_once())
        .build()
        .unwrap();
    let mut it = walker.iterator();

    // First pass: 27 blending-on permutations plus one blending-off.
    assert_eq!(drain(&mut it).len(), 28);
    assert_eq!(it.accepted_count(), 28);

    it.reset();
    // The budget spans passes, so only two more are allowed.
    assert_eq!(drain(&mut it).len(), 2);
    assert_eq!(it.accepted_count(), 30);
}

#[test]
fn reset_on_fresh_iterator_is_harmless() {
    let walker = HyperSpaceWalker::builder(blending_off_grid())
        .filter(blending_off_once())
        .build()
        .unwrap();
    let mut it = walker.iterator();
    it.reset();
    it.reset();
    assert_eq!(drain(&mut it).len(), 1);
}
