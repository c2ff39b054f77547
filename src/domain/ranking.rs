//! Comparative ranking of a quote batch.
//!
//! The best quote is the one with the maximum destination amount; every
//! other successful quote is annotated with how much worse it is, as a
//! percentage with two decimals and a leading sign. All math is exact
//! integer arithmetic on `U256` — destination amounts routinely exceed
//! the 53-bit range where f64 stays faithful.

use alloy::primitives::U256;

/// Hundredths of a percent, the markup display resolution.
const PERCENT_HUNDREDTHS: u64 = 10_000;

/// Compute markup annotations for a batch of destination amounts, in
/// batch order.
///
/// `None` entries are failed results and pass through unranked. A
/// zero-amount "success" neither competes for best nor receives a
/// markup; if no positive amount exists the whole batch is returned
/// unranked.
pub fn markups(destination_amounts: &[Option<U256>]) -> Vec<Option<String>> {
    let best = destination_amounts
        .iter()
        .flatten()
        .copied()
        .filter(|amount| !amount.is_zero())
        .max();

    let Some(best) = best else {
        return vec![None; destination_amounts.len()];
    };

    destination_amounts
        .iter()
        .map(|entry| match entry {
            Some(amount) if !amount.is_zero() => markup_percentage(best, *amount),
            _ => None,
        })
        .collect()
}

/// `best / amount - 1`, formatted as `+DD.DD%`.
///
/// Computed as `(best - amount) * 10_000 / amount` in hundredths of a
/// percent, rounding down. Markup is never negative because `best` is
/// the batch maximum.
fn markup_percentage(best: U256, amount: U256) -> Option<String> {
    let hundredths = (best - amount)
        .checked_mul(U256::from(PERCENT_HUNDREDTHS))
        .map(|scaled| scaled / amount)?;
    let hundredths = u128::try_from(hundredths).ok()?;
    Some(format!("+{}.{:02}%", hundredths / 100, hundredths % 100))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(values: &[u64]) -> Vec<Option<U256>> {
        values.iter().map(|v| Some(U256::from(*v))).collect()
    }

    #[test]
    fn markup_relative_to_best() {
        let ranked = markups(&amounts(&[100, 90, 120]));
        assert_eq!(
            ranked,
            vec![
                Some("+20.00%".to_string()),
                Some("+33.33%".to_string()),
                Some("+0.00%".to_string()),
            ]
        );
    }

    #[test]
    fn failed_results_pass_through_unranked() {
        let ranked = markups(&[Some(U256::from(50u64)), None, Some(U256::from(100u64))]);
        assert_eq!(
            ranked,
            vec![Some("+100.00%".to_string()), None, Some("+0.00%".to_string())]
        );
    }

    #[test]
    fn all_failed_batch_is_a_noop() {
        assert_eq!(markups(&[None, None]), vec![None, None]);
    }

    #[test]
    fn zero_amount_success_is_not_ranked() {
        let ranked = markups(&[Some(U256::ZERO), Some(U256::from(10u64))]);
        assert_eq!(ranked, vec![None, Some("+0.00%".to_string())]);
    }

    #[test]
    fn all_zero_batch_is_a_noop() {
        assert_eq!(markups(&[Some(U256::ZERO)]), vec![None]);
    }

    #[test]
    fn amounts_beyond_u64_rank_exactly() {
        // 2e20 vs 1e20: one is 100% worse than the other.
        let big = U256::from(10u64).pow(U256::from(20u64));
        let ranked = markups(&[Some(big), Some(big + big)]);
        assert_eq!(
            ranked,
            vec![Some("+100.00%".to_string()), Some("+0.00%".to_string())]
        );
    }

    #[test]
    fn empty_batch() {
        assert!(markups(&[]).is_empty());
    }
}
