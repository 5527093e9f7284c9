//! Order money arithmetic
//!
//! All amounts are integer cents. Line totals are exact integer products;
//! tax is the only place rounding happens, computed through `rust_decimal`
//! with half-up (away from zero) rounding to 2 decimal places. Recomputing
//! totals from the same items always yields the same result - there is no
//! accumulated drift.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::money::{cents_to_decimal, decimal_to_cents};

/// Tax rate applied to the order subtotal (2%)
fn tax_rate() -> Decimal {
    Decimal::new(2, 2)
}

/// Derived monetary fields of an order header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

/// Line item total: quantity times the snapshotted unit price, exact.
pub fn line_total_cents(quantity: i64, unit_price_cents: i64) -> i64 {
    quantity.saturating_mul(unit_price_cents)
}

/// Tax on a subtotal: `round(subtotal × 0.02, 2 dp, half-up)`.
pub fn tax_cents(subtotal_cents: i64) -> i64 {
    let tax = (cents_to_decimal(subtotal_cents) * tax_rate())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // After rounding to 2 dp this conversion is exact; it only saturates on
    // amounts beyond any realistic order size
    decimal_to_cents(tax).unwrap_or(i64::MAX)
}

/// Recompute an order's totals from its current line item totals.
pub fn order_totals(item_totals: &[i64]) -> OrderTotals {
    let subtotal_cents: i64 = item_totals.iter().sum();
    let tax_cents = tax_cents(subtotal_cents);
    OrderTotals {
        subtotal_cents,
        tax_cents,
        total_cents: subtotal_cents + tax_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_order_is_all_zero() {
        let t = order_totals(&[]);
        assert_eq!(t.subtotal_cents, 0);
        assert_eq!(t.tax_cents, 0);
        assert_eq!(t.total_cents, 0);
    }

    #[test]
    fn line_total_is_exact_integer_product() {
        assert_eq!(line_total_cents(3, 1000), 3000);
        assert_eq!(line_total_cents(7, 333), 2331);
    }

    #[test]
    fn subtotal_hundred_gives_tax_two_exactly() {
        // 100.00 * 0.02 = 2.00, no floating point drift
        let t = order_totals(&[10_000]);
        assert_eq!(t.subtotal_cents, 10_000);
        assert_eq!(t.tax_cents, 200);
        assert_eq!(t.total_cents, 10_200);
    }

    #[test]
    fn scenario_three_at_ten() {
        // 3 x 10.00 -> subtotal 30.00, tax 0.60, total 30.60
        let t = order_totals(&[line_total_cents(3, 1000)]);
        assert_eq!(t.subtotal_cents, 3000);
        assert_eq!(t.tax_cents, 60);
        assert_eq!(t.total_cents, 3060);
    }

    #[test]
    fn tax_rounds_half_up_at_the_midpoint() {
        // subtotal 0.25 -> raw tax 0.005 -> rounds up to 0.01
        assert_eq!(tax_cents(25), 1);
        // subtotal 0.75 -> raw tax 0.015 -> rounds up to 0.02
        assert_eq!(tax_cents(75), 2);
        // subtotal 0.20 -> raw tax 0.004 -> rounds down to 0.00
        assert_eq!(tax_cents(20), 0);
    }

    #[test]
    fn recomputation_is_stable() {
        let items = [1234, 567, 8901];
        let first = order_totals(&items);
        for _ in 0..1000 {
            assert_eq!(order_totals(&items), first);
        }
    }

    #[test]
    fn penny_items_accumulate_exactly() {
        // 1000 one-cent lines: subtotal 10.00, tax 0.20
        let items = vec![1i64; 1000];
        let t = order_totals(&items);
        assert_eq!(t.subtotal_cents, 1000);
        assert_eq!(t.tax_cents, 20);
        assert_eq!(t.total_cents, 1020);
    }

    #[test]
    fn invariant_total_equals_subtotal_plus_tax() {
        for subtotal in [1i64, 49, 50, 99, 12345, 999_999] {
            let t = order_totals(&[subtotal]);
            assert_eq!(t.total_cents, t.subtotal_cents + t.tax_cents);
        }
    }
}
