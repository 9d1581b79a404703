use std::collections::HashSet;

use hyperspace::{
    Draw, HyperParameterGrid, HyperSpaceWalker, IteratorState, SearchCriteria, StopReason, Value,
};

use crate::{drain, target_encoding_grid};

#[test]
fn cartesian_visits_every_combination_once() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .build()
        .unwrap();
    let mut it = walker.iterator();

    let visited = drain(&mut it);
    assert_eq!(visited.len(), 54);

    let indices: Vec<u64> = visited.iter().map(|p| p.index()).collect();
    assert_eq!(indices, (0..54).collect::<Vec<_>>());
    assert_eq!(
        it.state(),
        IteratorState::Exhausted(StopReason::SpaceExhausted)
    );
}

#[test]
fn cartesian_order_varies_last_parameter_fastest() {
    let grid = HyperParameterGrid::builder()
        .param("a", [1, 2])
        .param("b", ["x", "y", "z"])
        .build()
        .unwrap();
    let walker = HyperSpaceWalker::builder(grid).build().unwrap();

    let rendered: Vec<String> = drain(&mut walker.iterator())
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        rendered,
        [
            "{a=1, b=x}",
            "{a=1, b=y}",
            "{a=1, b=z}",
            "{a=2, b=x}",
            "{a=2, b=y}",
            "{a=2, b=z}",
        ]
    );
}

#[test]
fn permutations_bind_every_parameter() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .build()
        .unwrap();

    let mut seen = HashSet::new();
    for p in drain(&mut walker.iterator()) {
        assert_eq!(p.len(), 4);
        let key: Vec<String> = p.iter().map(|(_, v)| v.to_string()).collect();
        assert!(seen.insert(key), "duplicate permutation {p}");
    }
    assert_eq!(seen.len(), 54);
}

#[test]
fn single_combination_grid() {
    let grid = HyperParameterGrid::builder()
        .param("only", [Value::from("one")])
        .build()
        .unwrap();
    let walker = HyperSpaceWalker::new(grid, SearchCriteria::random_discrete(), []).unwrap();
    let mut it = walker.iterator();

    assert_eq!(it.max_hyper_space_size(), 1);
    assert!(it.has_next(None));
    let draw = it.next(None).unwrap();
    assert_eq!(
        draw.accepted().and_then(|p| p.get("only")).and_then(Value::as_str),
        Some("one")
    );
    assert!(!it.has_next(None));
}

#[test]
fn has_next_is_idempotent() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .build()
        .unwrap();
    let mut it = walker.iterator();

    for _ in 0..5 {
        assert!(it.has_next(None));
    }
    assert_eq!(it.draws(), 0);
    assert!(matches!(it.next(None).unwrap(), Draw::Accepted(_)));
    assert_eq!(it.draws(), 1);
}

#[test]
fn walker_reports_space_size() {
    let walker = HyperSpaceWalker::builder(target_encoding_grid())
        .build()
        .unwrap();
    assert_eq!(walker.max_hyper_space_size(), 54);
    assert_eq!(walker.iterator().max_hyper_space_size(), 54);
}
