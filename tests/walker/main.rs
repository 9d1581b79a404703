#![allow(clippy::float_cmp)]

use hyperspace::{
    Draw, FilterFunction, HyperParameterGrid, HyperSpaceIterator, Permutation, Value,
};

mod budget;
mod exhaustive;
mod random;
mod reset;

/// The target-encoding grid: 2 x 3 x 3 x 3 = 54 combinations.
fn target_encoding_grid() -> HyperParameterGrid {
    HyperParameterGrid::builder()
        .param("_blending", [true, false])
        .param("_noise_level", [0.0, 0.01, 0.1])
        .param("_k", [1.0, 2.0, 3.0])
        .param("_f", [1.0, 2.0, 3.0])
        .build()
        .unwrap()
}

/// Keeps only the first permutation with blending disabled.
fn blending_off_once() -> FilterFunction {
    FilterFunction::first_match(|p| p.get("_blending").and_then(Value::as_bool) == Some(false))
}

/// Rejects every permutation with `k = 3` and `f = 1`.
fn no_k3_f1() -> FilterFunction {
    FilterFunction::stateless(|p| {
        !(p.get("_k").and_then(Value::as_float) == Some(3.0)
            && p.get("_f").and_then(Value::as_float) == Some(1.0))
    })
}

/// Runs the canonical `has_next` / `next` loop and collects accepted draws.
fn drain(it: &mut HyperSpaceIterator) -> Vec<Permutation> {
    let mut accepted = Vec::new();
    while it.has_next(None) {
        if let Draw::Accepted(p) = it.next(None).unwrap() {
            accepted.push(p);
        }
    }
    accepted
}
