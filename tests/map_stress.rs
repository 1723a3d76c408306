//! Stress tests for the ordered map.
//!
//! These tests verify, through the public contract only:
//! 1. In-order traversal stays sorted across arbitrary mutation
//! 2. The height bound max_depth <= 2*log2(n+1) holds at scale
//! 3. Insert/remove round-trips drain the tree completely
//! 4. Workloads are deterministic (seeded RNG, same seed = same run)
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test map_stress
//! ```

use libris::OrderedMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Entry count for the large ordered-insert test
const LARGE_COUNT: usize = 100_000;

/// Operation count for the churn test
const CHURN_OPS: usize = 50_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn u32_order(a: &u32, b: &u32) -> std::cmp::Ordering {
    a.cmp(b)
}

fn new_map() -> OrderedMap<u32, u32> {
    OrderedMap::empty(u32_order)
}

/// Collected values in visit order. Keys mirror values throughout these
/// tests, so this doubles as the key sequence.
fn values_in_order(map: &OrderedMap<u32, u32>) -> Vec<u32> {
    let mut out = Vec::with_capacity(map.len());
    map.for_each(|&v| out.push(v));
    out
}

fn assert_sorted_strict(values: &[u32]) {
    for pair in values.windows(2) {
        assert!(pair[0] < pair[1], "traversal out of order: {pair:?}");
    }
}

fn assert_height_bound(map: &OrderedMap<u32, u32>) {
    let bound = 2.0 * ((map.len() + 1) as f64).log2();
    assert!(
        (map.max_depth() as f64) <= bound,
        "depth {} exceeds bound {bound:.2} at {} entries",
        map.max_depth(),
        map.len()
    );
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Shuffled bulk insert at scale: sorted traversal plus the height bound.
#[test]
fn stress_bulk_insert_stays_balanced() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut keys: Vec<u32> = (0..LARGE_COUNT as u32).collect();
    keys.shuffle(&mut rng);

    let mut map: OrderedMap<u32, u32> = OrderedMap::with_capacity(u32_order, LARGE_COUNT);
    for &k in &keys {
        map.put(k, k);
    }

    assert_eq!(map.len(), LARGE_COUNT);
    assert_height_bound(&map);

    let values = values_in_order(&map);
    assert_eq!(values.len(), LARGE_COUNT);
    assert_sorted_strict(&values);
}

/// Strictly ascending insert is the classic BST worst case; the fixup must
/// keep it logarithmic.
#[test]
fn stress_ascending_insert_stays_balanced() {
    let mut map: OrderedMap<u32, u32> = OrderedMap::with_capacity(u32_order, LARGE_COUNT);
    for k in 0..LARGE_COUNT as u32 {
        map.put(k, k);
    }

    assert_height_bound(&map);
    assert_sorted_strict(&values_in_order(&map));
}

/// Insert everything, remove everything in a different shuffled order: the
/// tree must end empty with depth zero.
#[test]
fn stress_round_trip_drains_completely() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut keys: Vec<u32> = (0..20_000).collect();
    keys.shuffle(&mut rng);

    let mut map = new_map();
    for &k in &keys {
        map.put(k, k);
    }

    keys.shuffle(&mut rng);
    for (i, &k) in keys.iter().enumerate() {
        map.remove(&k);
        // spot-check the bound while draining (every step would be O(n^2))
        if i % 1_000 == 0 {
            assert_height_bound(&map);
        }
    }

    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.max_depth(), 0);
}

/// Random interleaved put/remove churn checked against a model map.
#[test]
fn stress_churn_matches_model() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    let mut map = new_map();
    let mut model = std::collections::BTreeMap::new();

    for _ in 0..CHURN_OPS {
        let k: u32 = rng.gen_range(0..5_000);
        if rng.gen_bool(0.55) {
            map.put(k, k);
            model.insert(k, k);
        } else {
            map.remove(&k);
            model.remove(&k);
        }
    }

    assert_eq!(map.len(), model.len());
    let expected: Vec<u32> = model.values().copied().collect();
    assert_eq!(values_in_order(&map), expected);
    assert_height_bound(&map);

    for k in model.keys() {
        assert!(map.contains_key(k));
    }
}

/// Same seed twice produces identical observable state.
#[test]
fn stress_deterministic_replay() {
    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut map = new_map();
        for _ in 0..10_000 {
            let k: u32 = rng.gen_range(0..2_000);
            if rng.gen_bool(0.6) {
                map.put(k, k.wrapping_mul(31));
            } else {
                map.remove(&k);
            }
        }
        (map.len(), map.max_depth(), values_in_order(&map))
    };

    assert_eq!(run(99), run(99));
}
