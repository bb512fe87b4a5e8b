//! Proportional discount allocation
//!
//! One discount value is entered for the whole batch; each item takes
//! a share proportional to its amount's weight in the batch subtotal.

/// One item's share of the batch discount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountShare {
    pub discount: f64,
    pub net: f64,
}

/// Distribute `total_discount` across `amounts` proportionally.
///
/// A zero subtotal allocates zero to every item. The discount is not
/// clamped to the subtotal; an oversized discount produces negative
/// nets. No remainder-correction step runs: the shares sum to the
/// total only within f64 rounding.
pub fn allocate_discount(amounts: &[f64], total_discount: f64) -> Vec<DiscountShare> {
    let subtotal: f64 = amounts.iter().sum();

    amounts
        .iter()
        .map(|&amount| {
            let proportion = if subtotal > 0.0 { amount / subtotal } else { 0.0 };
            let discount = total_discount * proportion;
            DiscountShare {
                discount,
                net: amount - discount,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_proportional_shares() {
        let shares = allocate_discount(&[1000.0, 3000.0], 400.0);
        assert_eq!(shares[0].discount, 100.0);
        assert_eq!(shares[0].net, 900.0);
        assert_eq!(shares[1].discount, 300.0);
        assert_eq!(shares[1].net, 2700.0);
    }

    #[test]
    fn test_shares_sum_to_total_discount() {
        let amounts = [333.33, 1250.0, 19.99, 8400.5, 0.01];
        let total = 777.77;
        let shares = allocate_discount(&amounts, total);

        let allocated: f64 = shares.iter().map(|s| s.discount).sum();
        assert!((allocated - total).abs() < EPSILON);

        for (share, amount) in shares.iter().zip(amounts) {
            assert!((share.net - (amount - share.discount)).abs() < EPSILON);
            assert!(share.net >= 0.0);
        }
    }

    #[test]
    fn test_zero_subtotal_allocates_nothing() {
        let shares = allocate_discount(&[0.0, 0.0, 0.0], 500.0);
        for share in shares {
            assert_eq!(share.discount, 0.0);
            assert_eq!(share.net, 0.0);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(allocate_discount(&[], 100.0).is_empty());
    }

    #[test]
    fn test_single_item_takes_full_discount() {
        let shares = allocate_discount(&[2500.0], 400.0);
        assert_eq!(shares[0].discount, 400.0);
        assert_eq!(shares[0].net, 2100.0);
    }

    #[test]
    fn test_oversized_discount_goes_negative_unclamped() {
        let shares = allocate_discount(&[100.0, 100.0], 400.0);
        assert_eq!(shares[0].discount, 200.0);
        assert_eq!(shares[0].net, -100.0);
        assert_eq!(shares[1].net, -100.0);
    }

    #[test]
    fn test_zero_discount_leaves_amounts_whole() {
        let shares = allocate_discount(&[500.0, 1500.0], 0.0);
        assert_eq!(shares[0].discount, 0.0);
        assert_eq!(shares[0].net, 500.0);
        assert_eq!(shares[1].net, 1500.0);
    }
}
