//! Small helpers over the injected random source.
//!
//! Every random decision in the crate goes through a caller-provided
//! `&mut impl Rng`, so tests can replay a run with a seeded generator.

use rand::Rng;

/// Uniform draw in `[0, 1)`.
pub fn roll_unit(rng: &mut impl Rng) -> f64 {
    rng.gen::<f64>()
}

/// Returns true with probability `chance` (a fraction, not a percentage).
pub fn roll_chance(chance: f64, rng: &mut impl Rng) -> bool {
    roll_unit(rng) < chance
}

/// Roll against a percentage in `0..=100`.
pub fn roll_percent(percent: f64, rng: &mut impl Rng) -> bool {
    roll_unit(rng) * 100.0 < percent
}

/// Picks one element uniformly. Returns `None` on an empty slice.
pub fn pick_uniform<'a, T>(items: &'a [T], rng: &mut impl Rng) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.gen_range(0..items.len())])
}

/// Weighted index roll. Returns `None` when all weights are zero.
pub fn pick_weighted(weights: &[u32], rng: &mut impl Rng) -> Option<usize> {
    let total: u32 = weights.iter().sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for (index, weight) in weights.iter().enumerate() {
        if roll < *weight {
            return Some(index);
        }
        roll -= weight;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn test_roll_percent_bounds() {
        let mut rng = create_test_rng();
        for _ in 0..1000 {
            assert!(!roll_percent(0.0, &mut rng));
            assert!(roll_percent(100.0, &mut rng));
        }
    }

    #[test]
    fn test_pick_uniform_empty() {
        let mut rng = create_test_rng();
        let empty: [u32; 0] = [];
        assert!(pick_uniform(&empty, &mut rng).is_none());
    }

    #[test]
    fn test_pick_uniform_covers_all() {
        let mut rng = create_test_rng();
        let items = [1, 2, 3, 4];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(*pick_uniform(&items, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_pick_weighted_skips_zero_weights() {
        let mut rng = create_test_rng();
        for _ in 0..500 {
            assert_eq!(pick_weighted(&[0, 5, 0], &mut rng), Some(1));
        }
        assert_eq!(pick_weighted(&[0, 0], &mut rng), None);
    }
}
