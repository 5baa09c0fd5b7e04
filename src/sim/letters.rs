//! Weighted letter generation
//!
//! Stateless apart from the caller's RNG, so a seeded game always draws the
//! same letters.

use rand::Rng;

/// Relative draw weight per letter
pub const LETTER_WEIGHTS: [(char, u32); 26] = [
    // Common
    ('E', 12),
    ('A', 9),
    ('I', 9),
    ('O', 8),
    ('N', 6),
    ('R', 6),
    ('T', 6),
    ('L', 4),
    ('S', 4),
    ('U', 4),
    // Mid-frequency
    ('D', 4),
    ('G', 3),
    ('B', 2),
    ('C', 2),
    ('M', 2),
    ('P', 2),
    ('F', 2),
    ('H', 2),
    ('V', 2),
    ('W', 2),
    ('Y', 2),
    // Rare
    ('K', 1),
    ('J', 1),
    ('X', 1),
    ('Q', 1),
    ('Z', 1),
];

/// Sum of all weights
pub const TOTAL_WEIGHT: u32 = {
    let mut total = 0;
    let mut i = 0;
    while i < LETTER_WEIGHTS.len() {
        total += LETTER_WEIGHTS[i].1;
        i += 1;
    }
    total
};

/// Draw one letter according to [`LETTER_WEIGHTS`]
pub fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    let mut roll = rng.random_range(0..TOTAL_WEIGHT);
    for &(letter, weight) in &LETTER_WEIGHTS {
        if roll < weight {
            return letter;
        }
        roll -= weight;
    }
    // Unreachable while TOTAL_WEIGHT matches the table
    'E'
}

/// Draw `count` independent letters for a drop.
///
/// `round` does not affect weighting yet; it is kept so difficulty scaling can
/// hook in without changing callers.
pub fn drop_letters<R: Rng + ?Sized>(rng: &mut R, count: usize, _round: u32) -> Vec<char> {
    (0..count).map(|_| random_letter(rng)).collect()
}

/// Frequency weight of a letter (0 for non-letters)
pub fn weight_of(letter: char) -> u32 {
    let upper = letter.to_ascii_uppercase();
    LETTER_WEIGHTS
        .iter()
        .find(|(l, _)| *l == upper)
        .map(|(_, w)| *w)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_weights_cover_alphabet() {
        for letter in 'A'..='Z' {
            assert!(weight_of(letter) > 0, "{letter} missing");
        }
        assert_eq!(TOTAL_WEIGHT, LETTER_WEIGHTS.iter().map(|(_, w)| w).sum::<u32>());
        assert!(weight_of('E') > weight_of('D'));
        assert!(weight_of('D') > weight_of('Q'));
    }

    #[test]
    fn test_drop_letters_count_and_alphabet() {
        let mut rng = Pcg32::seed_from_u64(7);
        let letters = drop_letters(&mut rng, 40, 1);
        assert_eq!(letters.len(), 40);
        assert!(letters.iter().all(|c| c.is_ascii_uppercase()));
        assert!(drop_letters(&mut rng, 0, 1).is_empty());
    }

    #[test]
    fn test_same_seed_same_letters() {
        let mut a = Pcg32::seed_from_u64(12345);
        let mut b = Pcg32::seed_from_u64(12345);
        assert_eq!(drop_letters(&mut a, 16, 3), drop_letters(&mut b, 16, 3));
    }

    #[test]
    fn test_common_letters_dominate() {
        let mut rng = Pcg32::seed_from_u64(99);
        let letters = drop_letters(&mut rng, 5000, 1);
        let e = letters.iter().filter(|&&c| c == 'E').count();
        let z = letters.iter().filter(|&&c| c == 'Z').count();
        assert!(e > z * 4, "E={e} Z={z}");
    }
}
