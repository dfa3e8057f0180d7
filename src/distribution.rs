//! Pro-rata split of a cycle's distribution pool.
//!
//! All values are integers scaled by `10^precision` of the pool token.
//! Shares are truncated toward zero, so the shares of one cycle never sum
//! past the pool; the remainder (fewer smallest units than there are
//! participants) stays unallocated.

use crate::AuctionError;

/// `floor(pool * contributed / total_contributed)`.
///
/// Returns 0 when nothing was contributed to the cycle.
pub fn pro_rata_share(
    pool: i128,
    contributed: i128,
    total_contributed: i128,
) -> Result<i128, AuctionError> {
    if pool <= 0 || contributed <= 0 || total_contributed <= 0 {
        return Ok(0);
    }
    let contributed = core::cmp::min(contributed, total_contributed);

    if let Some(raw) = pool.checked_mul(contributed) {
        return Ok(raw / total_contributed);
    }

    // pool = q * total + r, so pool * c / total = q * c + floor(r * c / total).
    let quotient = pool / total_contributed;
    let remainder = pool % total_contributed;
    let whole = quotient
        .checked_mul(contributed)
        .ok_or(AuctionError::ArithmeticOverflow)?;
    let fraction = remainder
        .checked_mul(contributed)
        .ok_or(AuctionError::ArithmeticOverflow)?
        / total_contributed;
    whole
        .checked_add(fraction)
        .ok_or(AuctionError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use arbitrary::{Arbitrary, Unstructured};
    use std::vec::Vec;

    const POOL: i128 = 1_000_000; // 100.0000 at precision 4

    #[test]
    fn empty_cycle_pays_nothing() {
        assert_eq!(pro_rata_share(POOL, 0, 0), Ok(0));
        assert_eq!(pro_rata_share(POOL, 100_000, 0), Ok(0));
    }

    #[test]
    fn single_contributor_takes_whole_pool() {
        assert_eq!(pro_rata_share(POOL, 100_000, 100_000), Ok(POOL));
    }

    #[test]
    fn splits_by_ratio() {
        assert_eq!(pro_rata_share(POOL, 100_000, 400_000), Ok(250_000));
        assert_eq!(pro_rata_share(POOL, 300_000, 400_000), Ok(750_000));
    }

    #[test]
    fn truncates_toward_zero() {
        // 1_000_000 / 3 = 333_333.33..
        assert_eq!(pro_rata_share(POOL, 1, 3), Ok(333_333));
        assert_eq!(pro_rata_share(1, 1, 2), Ok(0));
    }

    #[test]
    fn zero_pool_pays_nothing() {
        assert_eq!(pro_rata_share(0, 5, 10), Ok(0));
    }

    #[test]
    fn large_values_use_split_path() {
        let pool = i128::MAX / 2;
        let total = 4_i128;
        assert_eq!(pro_rata_share(pool, 4, total), Ok(pool));
        assert_eq!(pro_rata_share(pool, 2, total), Ok(pool / 2));
    }

    #[test]
    fn overflow_is_reported() {
        let pool = 3_i128 << 80;
        let total = 1_i128 << 81;
        assert_eq!(
            pro_rata_share(pool, total - 1, total),
            Err(AuctionError::ArithmeticOverflow)
        );
    }

    #[derive(Arbitrary, Debug)]
    struct CycleInput {
        pool: u32,
        contributions: Vec<u32>,
    }

    #[test]
    fn shares_never_exceed_pool() {
        let seed: Vec<u8> = (0..4096u32)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
            .collect();
        let mut u = Unstructured::new(&seed);
        while !u.is_empty() {
            let input = CycleInput::arbitrary(&mut u).unwrap();
            let contributions: Vec<i128> = input
                .contributions
                .iter()
                .filter(|c| **c > 0)
                .map(|c| *c as i128)
                .collect();
            if contributions.is_empty() {
                continue;
            }
            let pool = input.pool as i128;
            let total: i128 = contributions.iter().sum();
            let paid: i128 = contributions
                .iter()
                .map(|c| pro_rata_share(pool, *c, total).unwrap())
                .sum();
            assert!(paid <= pool);
            assert!(pool - paid < contributions.len() as i128);
        }
    }
}
