//! Lazy generation of combination indices.
//!
//! The generator never materializes the Cartesian product. It hands out
//! indices in `[0, size)`, each exactly once per pass, and the iterator
//! decodes them through the grid.

use std::collections::HashSet;

use crate::criteria::{ReseedPolicy, SamplingMemory, SearchStrategy};

const FEISTEL_ROUNDS: usize = 4;

/// A keyed permutation of `[0, 4^half_bits)` built from a balanced Feistel
/// network. Cycle walking restricts it to any smaller domain.
#[derive(Debug, Clone)]
struct Feistel {
    keys: [u64; FEISTEL_ROUNDS],
    half_bits: u32,
}

impl Feistel {
    fn new(size: u64, rng: &mut fastrand::Rng) -> Self {
        let bits = if size <= 1 {
            0
        } else {
            u64::BITS - (size - 1).leading_zeros()
        };
        Self {
            keys: core::array::from_fn(|_| rng.u64(..)),
            half_bits: bits.div_ceil(2).max(1),
        }
    }

    fn permute(&self, x: u64) -> u64 {
        let mask = (1u64 << self.half_bits) - 1;
        let mut left = x >> self.half_bits;
        let mut right = x & mask;
        for key in &self.keys {
            let next = left ^ (mix(right ^ key) & mask);
            left = right;
            right = next;
        }
        (left << self.half_bits) | right
    }

    /// Maps `x < size` to a unique index `< size`.
    fn walk(&self, x: u64, size: u64) -> u64 {
        let mut y = self.permute(x);
        // The cycle through x contains x itself, so this terminates.
        while y >= size {
            y = self.permute(y);
        }
        y
    }
}

/// `SplitMix64` finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Debug)]
enum Memory {
    Visited {
        seen: HashSet<u64>,
        max_retries: u32,
    },
    Bijection(Feistel),
}

#[derive(Debug)]
struct RandomOrder {
    rng: fastrand::Rng,
    seed: u64,
    reseed: ReseedPolicy,
    memory: Memory,
}

impl RandomOrder {
    fn draw(&mut self, size: u64, position: u64) -> u64 {
        match &mut self.memory {
            Memory::Visited { seen, max_retries } => {
                let mut candidate = self.rng.u64(0..size);
                for _ in 1..*max_retries {
                    if !seen.contains(&candidate) {
                        break;
                    }
                    candidate = self.rng.u64(0..size);
                }
                // Linear probe once retries are spent. An unvisited index
                // exists because fewer than `size` have been drawn.
                while seen.contains(&candidate) {
                    candidate = (candidate + 1) % size;
                }
                seen.insert(candidate);
                candidate
            }
            Memory::Bijection(feistel) => feistel.walk(position, size),
        }
    }

    fn reset(&mut self, size: u64) {
        if self.reseed == ReseedPolicy::Replay {
            self.rng = fastrand::Rng::with_seed(self.seed);
        }
        match &mut self.memory {
            Memory::Visited { seen, .. } => seen.clear(),
            Memory::Bijection(feistel) => *feistel = Feistel::new(size, &mut self.rng),
        }
    }
}

#[derive(Debug)]
enum Order {
    Sequential,
    Random(RandomOrder),
}

/// Produces every index of a space of `size` combinations exactly once per
/// pass, in Cartesian or random order.
#[derive(Debug)]
pub(crate) struct PermutationGenerator {
    size: u64,
    drawn: u64,
    order: Order,
}

impl PermutationGenerator {
    pub(crate) fn new(
        size: u64,
        strategy: SearchStrategy,
        seed: u64,
        reseed: ReseedPolicy,
        memory: SamplingMemory,
    ) -> Self {
        let order = match strategy {
            SearchStrategy::Cartesian => Order::Sequential,
            SearchStrategy::RandomDiscrete => {
                let mut rng = fastrand::Rng::with_seed(seed);
                let memory = match memory {
                    SamplingMemory::VisitedSet { max_retries } => Memory::Visited {
                        seen: HashSet::new(),
                        max_retries,
                    },
                    SamplingMemory::Bijection => {
                        Memory::Bijection(Feistel::new(size, &mut rng))
                    }
                };
                Order::Random(RandomOrder {
                    rng,
                    seed,
                    reseed,
                    memory,
                })
            }
        };
        Self {
            size,
            drawn: 0,
            order,
        }
    }

    /// Returns `true` while this pass has undrawn indices.
    pub(crate) fn has_remaining(&self) -> bool {
        self.drawn < self.size
    }

    /// Indices drawn since construction or the last reset.
    pub(crate) fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Draws the next index of this pass.
    pub(crate) fn next_index(&mut self) -> Option<u64> {
        if !self.has_remaining() {
            return None;
        }
        let index = match &mut self.order {
            Order::Sequential => self.drawn,
            Order::Random(random) => random.draw(self.size, self.drawn),
        };
        self.drawn += 1;
        Some(index)
    }

    /// Rewinds to the start of a new pass.
    pub(crate) fn reset(&mut self) {
        self.drawn = 0;
        if let Order::Random(random) = &mut self.order {
            random.reset(self.size);
        }
    }
}
