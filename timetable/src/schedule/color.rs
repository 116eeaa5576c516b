use rand::seq::SliceRandom;
use rand::Rng;

/// Display colours a placement can be given. Purely cosmetic.
pub const PALETTE: [&str; 8] = [
    "#f28b82", "#fbbc04", "#fff475", "#ccff90", "#a7ffeb", "#cbf0f8", "#aecbfa", "#d7aefb",
];

/// Picks a colour for a new placement. Repeats across subjects are allowed.
pub fn pick_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    PALETTE
        .choose(rng)
        .copied()
        .unwrap_or(PALETTE[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_colors() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first: Vec<String> = (0..10).map(|_| pick_color(&mut a)).collect();
        let second: Vec<String> = (0..10).map(|_| pick_color(&mut b)).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|c| PALETTE.contains(&c.as_str())));
    }
}
