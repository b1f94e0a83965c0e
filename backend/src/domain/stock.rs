//! Pure stock-transition planner.
//!
//! Every quantity change goes through one of the `plan_*` functions before it
//! reaches storage. The persistence adapter locks the product row, asks the
//! planner for the transition and applies it in the same transaction, so the
//! rules here are the single place that decides quantities and eBay status
//! side effects.

use super::EbayStatus;

/// Outcome of a planned stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockTransition {
    /// Quantity before the movement.
    pub previous_quantity: i32,
    /// Quantity after the movement. Never negative.
    pub new_quantity: i32,
    /// Status to store alongside the new quantity. `None` keeps the current one.
    pub ebay_status: Option<EbayStatus>,
}

impl StockTransition {
    /// Signed change in quantity.
    pub fn delta(&self) -> i32 {
        self.new_quantity - self.previous_quantity
    }
}

/// Reasons a stock movement is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StockTransitionError {
    /// A stock-out asked for more than is on hand.
    #[error("insufficient stock")]
    InsufficientStock { available: i32, requested: i32 },
    /// The requested quantity is outside the range the operation accepts.
    #[error("invalid quantity {quantity}")]
    InvalidQuantity { quantity: i32 },
    /// The result would not fit the quantity column.
    #[error("quantity overflow")]
    Overflow,
}

/// Stock arrives: `current + quantity`, with `quantity >= 1`.
///
/// Restocking an empty product flags it as needing a listing.
///
/// # Examples
/// ```
/// use stockroom::domain::{EbayStatus, plan_stock_in};
///
/// let plan = plan_stock_in(0, 3).expect("valid movement");
/// assert_eq!(plan.new_quantity, 3);
/// assert_eq!(plan.ebay_status, Some(EbayStatus::ReadyToList));
/// ```
pub fn plan_stock_in(current: i32, quantity: i32) -> Result<StockTransition, StockTransitionError> {
    if quantity < 1 {
        return Err(StockTransitionError::InvalidQuantity { quantity });
    }
    let new_quantity = current
        .checked_add(quantity)
        .ok_or(StockTransitionError::Overflow)?;
    Ok(StockTransition {
        previous_quantity: current,
        new_quantity,
        ebay_status: restock_status(current, new_quantity),
    })
}

/// Stock leaves through a sale: `current - quantity`, with `quantity >= 1`.
///
/// Selling the last unit marks the product as sold on eBay.
pub fn plan_stock_out(
    current: i32,
    quantity: i32,
) -> Result<StockTransition, StockTransitionError> {
    if quantity < 1 {
        return Err(StockTransitionError::InvalidQuantity { quantity });
    }
    let new_quantity = current
        .checked_sub(quantity)
        .filter(|remaining| *remaining >= 0)
        .ok_or(StockTransitionError::InsufficientStock {
            available: current,
            requested: quantity,
        })?;
    let ebay_status = (new_quantity == 0).then_some(EbayStatus::SoldOnEbay);
    Ok(StockTransition {
        previous_quantity: current,
        new_quantity,
        ebay_status,
    })
}

/// A count replaces the quantity outright, with `quantity >= 0`.
pub fn plan_stock_take(
    current: i32,
    quantity: i32,
) -> Result<StockTransition, StockTransitionError> {
    if quantity < 0 {
        return Err(StockTransitionError::InvalidQuantity { quantity });
    }
    Ok(StockTransition {
        previous_quantity: current,
        new_quantity: quantity,
        ebay_status: restock_status(current, quantity),
    })
}

fn restock_status(previous: i32, new: i32) -> Option<EbayStatus> {
    (previous == 0 && new > 0).then_some(EbayStatus::ReadyToList)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1, 1, Some(EbayStatus::ReadyToList))]
    #[case(0, 4, 4, Some(EbayStatus::ReadyToList))]
    #[case(2, 3, 5, None)]
    fn stock_in_adds_and_flags_restock(
        #[case] current: i32,
        #[case] quantity: i32,
        #[case] expected: i32,
        #[case] status: Option<EbayStatus>,
    ) {
        let plan = plan_stock_in(current, quantity).expect("valid movement");
        assert_eq!(plan.previous_quantity, current);
        assert_eq!(plan.new_quantity, expected);
        assert_eq!(plan.ebay_status, status);
    }

    #[rstest]
    #[case(0)]
    #[case(-2)]
    fn stock_in_rejects_non_positive(#[case] quantity: i32) {
        assert_eq!(
            plan_stock_in(5, quantity),
            Err(StockTransitionError::InvalidQuantity { quantity })
        );
    }

    #[rstest]
    fn stock_in_reports_overflow() {
        assert_eq!(
            plan_stock_in(i32::MAX, 1),
            Err(StockTransitionError::Overflow)
        );
    }

    #[rstest]
    #[case(5, 2, 3, None)]
    #[case(5, 5, 0, Some(EbayStatus::SoldOnEbay))]
    #[case(1, 1, 0, Some(EbayStatus::SoldOnEbay))]
    fn stock_out_subtracts(
        #[case] current: i32,
        #[case] quantity: i32,
        #[case] expected: i32,
        #[case] status: Option<EbayStatus>,
    ) {
        let plan = plan_stock_out(current, quantity).expect("valid movement");
        assert_eq!(plan.new_quantity, expected);
        assert_eq!(plan.ebay_status, status);
        assert_eq!(plan.delta(), -quantity);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(2, 3)]
    fn stock_out_refuses_overdraw(#[case] current: i32, #[case] quantity: i32) {
        assert_eq!(
            plan_stock_out(current, quantity),
            Err(StockTransitionError::InsufficientStock {
                available: current,
                requested: quantity,
            })
        );
    }

    #[rstest]
    #[case(0, 3, Some(EbayStatus::ReadyToList))]
    #[case(4, 0, None)]
    #[case(4, 9, None)]
    #[case(0, 0, None)]
    fn stock_take_sets_exact_quantity(
        #[case] current: i32,
        #[case] quantity: i32,
        #[case] status: Option<EbayStatus>,
    ) {
        let plan = plan_stock_take(current, quantity).expect("valid movement");
        assert_eq!(plan.new_quantity, quantity);
        assert_eq!(plan.ebay_status, status);
    }

    #[rstest]
    fn stock_take_rejects_negative() {
        assert_eq!(
            plan_stock_take(3, -1),
            Err(StockTransitionError::InvalidQuantity { quantity: -1 })
        );
    }

    #[rstest]
    fn quantity_stays_non_negative_over_a_sequence() {
        let mut quantity = 0;
        let moves: [(&str, i32); 7] = [
            ("in", 3),
            ("out", 2),
            ("out", 5),
            ("take", 4),
            ("out", 4),
            ("out", 1),
            ("in", 1),
        ];
        for (kind, amount) in moves {
            let plan = match kind {
                "in" => plan_stock_in(quantity, amount),
                "out" => plan_stock_out(quantity, amount),
                _ => plan_stock_take(quantity, amount),
            };
            if let Ok(plan) = plan {
                quantity = plan.new_quantity;
            }
            assert!(quantity >= 0);
        }
        assert_eq!(quantity, 1);
    }
}
