use rand::Rng;

use crate::model::{MAX_LEVEL, Question};

/// Number of questions in the upcoming-questions preview.
pub const PREVIEW_LEN: usize = 5;

/// Generates one question for the given level.
///
/// Each operand is drawn independently and uniformly from `[1, 2·level]`.
/// Stateless and re-entrant; callers own the RNG so tests can seed one.
/// The level is clamped to `[1, MAX_LEVEL]` before the draw.
pub fn generate<R: Rng + ?Sized>(level: u8, rng: &mut R) -> Question {
    let bound = level.clamp(1, MAX_LEVEL) * 2;
    Question::new(rng.random_range(1..=bound), rng.random_range(1..=bound))
}

/// Generates `n` independent questions for the given level.
///
/// Draws are independent, not guaranteed distinct.
pub fn generate_batch<R: Rng + ?Sized>(level: u8, n: usize, rng: &mut R) -> Vec<Question> {
    (0..n).map(|_| generate(level, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn level_one_operands_stay_in_one_to_two() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let q = generate(1, &mut rng);
            assert!((1..=2).contains(&q.num1));
            assert!((1..=2).contains(&q.num2));
        }
    }

    #[test]
    fn level_ten_operands_stay_in_one_to_twenty() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let q = generate(10, &mut rng);
            assert!((1..=20).contains(&q.num1));
            assert!((1..=20).contains(&q.num2));
        }
    }

    #[test]
    fn full_operand_range_is_reachable() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 6];
        for _ in 0..1000 {
            let q = generate(3, &mut rng);
            seen[usize::from(q.num1) - 1] = true;
            seen[usize::from(q.num2) - 1] = true;
        }
        assert!(seen.iter().all(|s| *s), "not all of [1,6] drawn: {seen:?}");
    }

    #[test]
    fn out_of_range_level_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        let q = generate(0, &mut rng);
        assert!((1..=2).contains(&q.num1));

        let q = generate(200, &mut rng);
        assert!((1..=20).contains(&q.num1));
    }

    #[test]
    fn batch_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(9);
        let batch = generate_batch(2, PREVIEW_LEN, &mut rng);
        assert_eq!(batch.len(), PREVIEW_LEN);
        for q in batch {
            assert!((1..=4).contains(&q.num1));
            assert!((1..=4).contains(&q.num2));
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let a = generate_batch(5, 10, &mut StdRng::seed_from_u64(123));
        let b = generate_batch(5, 10, &mut StdRng::seed_from_u64(123));
        assert_eq!(a, b);
    }
}
