//! Guaranteed-power quota
//!
//! Half the players (rounded down) are promised a civilization power. The
//! subset is drawn once per match from a shuffle keyed by the match seed.

use crate::rng::SeededRng;
use rand::seq::SliceRandom;

/// Number of players promised a power
#[inline]
pub fn power_quota(player_count: usize) -> usize {
    player_count / 2
}

/// One flag per player: whether that player's first pick is a power
pub fn guaranteed_power_slots(match_seed: &str, player_count: usize) -> Vec<bool> {
    let mut order: Vec<usize> = (0..player_count).collect();
    let mut rng = SeededRng::new(match_seed);
    order.shuffle(&mut rng);

    let mut slots = vec![false; player_count];
    for &index in order.iter().take(power_quota(player_count)) {
        slots[index] = true;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_is_half_rounded_down() {
        for count in 0..=10 {
            let slots = guaranteed_power_slots("EF-1", count);
            assert_eq!(slots.len(), count);
            assert_eq!(slots.iter().filter(|&&s| s).count(), count / 2);
        }
    }

    #[test]
    fn test_quota_is_seeded() {
        assert_eq!(
            guaranteed_power_slots("quota", 8),
            guaranteed_power_slots("quota", 8)
        );
        let distinct: std::collections::HashSet<Vec<bool>> = (0..20)
            .map(|i| guaranteed_power_slots(&format!("quota-{}", i), 8))
            .collect();
        assert!(distinct.len() > 1);
    }
}
