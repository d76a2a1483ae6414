use std::collections::HashMap;

use itertools::Itertools;

use baduk_ai::board::Move;

/// Draw `1000 * expected.len()` samples and check that every expected move shows up
/// with a frequency within 20% of uniform, using the same tolerance for every move.
pub fn test_sampler_uniform(expected: &[Move], mut sampler: impl FnMut() -> Move) {
    assert!(
        expected.iter().all_unique(),
        "Got duplicate move in expected: {:?}",
        expected
    );
    assert!(!expected.is_empty(), "expected moves must be nonempty");

    let samples_per_move = 1000;
    let total_samples = samples_per_move * expected.len();

    let mut counts: HashMap<Move, u64> = expected.iter().map(|&mv| (mv, 0)).collect();

    for _ in 0..total_samples {
        let sample = sampler();
        match counts.get_mut(&sample) {
            None => panic!("Non-expected move {} was sampled", sample),
            Some(count) => *count += 1,
        }
    }

    for mv in expected {
        let count = *counts.get(mv).unwrap();
        let relative = count as f32 / samples_per_move as f32;

        assert!(
            (0.8..1.2).contains(&relative),
            "Move {} was over/under sampled {} ~ {}",
            mv,
            count,
            relative,
        );
    }
}
