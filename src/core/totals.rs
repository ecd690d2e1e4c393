//! Monetary totals computation.
//!
//! One pure function derives subtotal, tax and total from the line items and
//! a tax rate. Creation and full update both go through it - there is no
//! incremental recompute path, so stored totals can never drift from the
//! item sums. All arithmetic is exact decimal.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;

/// Derived monetary fields of a quotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of `quantity * unit_price` over all items
    pub subtotal: Decimal,
    /// `subtotal * rate / 100`
    pub tax: Decimal,
    /// `subtotal + tax`
    pub total: Decimal,
}

/// The subtotal of a single line.
#[must_use]
pub fn line_subtotal(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

/// Computes quotation totals from `(quantity, unit_price)` pairs and a tax
/// rate percentage.
///
/// # Errors
/// Rejects an empty item set, quantities below 1, negative prices and a
/// negative rate, each naming the field at fault.
pub fn compute(items: &[(i32, Decimal)], rate_percent: Decimal) -> Result<Totals> {
    if items.is_empty() {
        return Err(Error::Validation {
            field: "items",
            message: "at least one line item is required".to_string(),
        });
    }

    if rate_percent < Decimal::ZERO {
        return Err(Error::Validation {
            field: "tax_rate",
            message: format!("tax rate cannot be negative: {rate_percent}"),
        });
    }

    let mut subtotal = Decimal::ZERO;
    for &(quantity, unit_price) in items {
        if quantity < 1 {
            return Err(Error::Validation {
                field: "quantity",
                message: format!("quantity must be at least 1: {quantity}"),
            });
        }
        if unit_price < Decimal::ZERO {
            return Err(Error::Validation {
                field: "unit_price",
                message: format!("unit price cannot be negative: {unit_price}"),
            });
        }
        subtotal += line_subtotal(quantity, unit_price);
    }

    let tax = subtotal * rate_percent / Decimal::ONE_HUNDRED;
    Ok(Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_reference_scenario() {
        // 2 x 100.00 + 1 x 50.00 at 16%
        let totals = compute(&[(2, d("100.00")), (1, d("50.00"))], d("16")).unwrap();
        assert_eq!(totals.subtotal, d("250.00"));
        assert_eq!(totals.tax, d("40.0000"));
        assert_eq!(totals.total, d("290.0000"));
    }

    #[test]
    fn test_zero_rate() {
        let totals = compute(&[(3, d("19.99"))], Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, d("59.97"));
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, d("59.97"));
    }

    #[test]
    fn test_no_drift_across_many_items() {
        // Sums that would accumulate error in binary floating point
        let items: Vec<(i32, Decimal)> = (0..100).map(|_| (1, d("0.10"))).collect();
        let totals = compute(&items, Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, d("10.00"));
    }

    #[test]
    fn test_total_is_subtotal_plus_tax() {
        let totals = compute(&[(7, d("33.33")), (2, d("0.01"))], d("16")).unwrap();
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    #[test]
    fn test_empty_items_rejected() {
        let err = compute(&[], d("16")).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { field: "items", .. }
        ));
    }

    #[test]
    fn test_bad_quantity_rejected() {
        let err = compute(&[(0, d("10.00"))], d("16")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "quantity", .. }));

        let err = compute(&[(-3, d("10.00"))], d("16")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "quantity", .. }));
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = compute(&[(1, d("-0.01"))], d("16")).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation { field: "unit_price", .. }
        ));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = compute(&[(1, d("10.00"))], d("-16")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "tax_rate", .. }));
    }
}
