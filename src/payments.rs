//! Fixed amount-bracket payment tables.
//!
//! Each function is a step function over disjoint half-open brackets
//! `[low, high)`; amounts outside every bracket cost 0. The delivery table
//! stops at 5000 while the duty table starts there, so amounts in between
//! get no delivery charge. That gap is in the reference tables and is kept
//! as-is.

/// (low, high, charge) with `low <= amount < high`.
type Bracket = (f64, f64, f64);

const DUTY_BRACKETS: &[Bracket] = &[
    (5000.0, 6500.0, 1999.0),
    (6500.0, 8000.0, 2399.0),
    (8000.0, 9500.0, 2799.0),
    (9500.0, 11000.0, 3299.0),
    (11000.0, 13500.0, 3986.0),
    (13500.0, 16000.0, 4586.0),
    (16000.0, 18000.0, 5186.0),
    (18000.0, 20000.0, 5786.0),
    (20000.0, f64::INFINITY, 6486.0),
];

const DELIVERY_BRACKETS: &[Bracket] = &[
    (0.0, 500.0, 349.0),
    (500.0, 1500.0, 489.0),
    (1500.0, 2500.0, 589.0),
    (2500.0, 3500.0, 689.0),
    (3500.0, 5000.0, 789.0),
];

const INSURANCE_BRACKETS: &[Bracket] = &[
    (0.0, 3000.0, 2750.0),
    (3000.0, 7000.0, 3450.0),
    (7000.0, 12000.0, 4150.0),
    (12000.0, 20000.0, 4850.0),
];

const DEPOSIT_BRACKETS: &[Bracket] = &[
    (0.0, 3000.0, 4750.0),
    (3000.0, 7000.0, 5250.0),
    (7000.0, 12000.0, 5750.0),
    (12000.0, 20000.0, 6250.0),
];

fn lookup(brackets: &[Bracket], amount: f64) -> f64 {
    brackets
        .iter()
        .find(|(low, high, _)| amount >= *low && amount < *high)
        .map(|(_, _, charge)| *charge)
        .unwrap_or(0.0)
}

pub fn duty_for(amount: f64) -> f64 {
    lookup(DUTY_BRACKETS, amount)
}

pub fn delivery_for(amount: f64) -> f64 {
    lookup(DELIVERY_BRACKETS, amount)
}

pub fn insurance_for(amount: f64) -> f64 {
    lookup(INSURANCE_BRACKETS, amount)
}

pub fn deposit_for(amount: f64) -> f64 {
    lookup(DEPOSIT_BRACKETS, amount)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentBreakdown {
    pub duty: f64,
    pub delivery: f64,
    pub insurance: f64,
    pub deposit: f64,
}

impl PaymentBreakdown {
    pub fn total(&self) -> f64 {
        self.duty + self.delivery + self.insurance + self.deposit
    }
}

pub fn calculate_payments(amount: f64) -> PaymentBreakdown {
    PaymentBreakdown {
        duty: duty_for(amount),
        delivery: delivery_for(amount),
        insurance: insurance_for(amount),
        deposit: deposit_for(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_amounts() {
        let breakdown = calculate_payments(12000.0);
        assert_eq!(breakdown.duty, 3986.0);

        let breakdown = calculate_payments(1000.0);
        assert_eq!(breakdown.delivery, 489.0);
        assert_eq!(breakdown.insurance, 2750.0);
        assert_eq!(breakdown.deposit, 4750.0);
    }

    #[test]
    fn test_all_categories_non_negative() {
        for amount in [0.0, 1.0, 499.99, 500.0, 4999.0, 5000.0, 12000.0, 50000.0] {
            let b = calculate_payments(amount);
            assert!(b.duty >= 0.0);
            assert!(b.delivery >= 0.0);
            assert!(b.insurance >= 0.0);
            assert!(b.deposit >= 0.0);
        }
    }

    #[test]
    fn test_step_function_within_bracket() {
        // Two amounts inside [11000, 13500) must cost the same duty.
        assert_eq!(duty_for(11000.0), duty_for(13499.99));
        // Two amounts inside [500, 1500) must cost the same delivery.
        assert_eq!(delivery_for(500.0), delivery_for(1499.0));
    }

    #[test]
    fn test_bracket_boundaries_are_half_open() {
        assert_eq!(duty_for(11000.0), 3986.0);
        assert_eq!(duty_for(13500.0), 4586.0);
        assert_eq!(delivery_for(4999.99), 789.0);
        assert_eq!(delivery_for(5000.0), 0.0);
    }

    #[test]
    fn test_delivery_gap_above_5000() {
        // Known gap: no delivery bracket covers [5000, inf).
        assert_eq!(delivery_for(5000.0), 0.0);
        assert_eq!(delivery_for(7500.0), 0.0);
        assert_eq!(delivery_for(100000.0), 0.0);
    }

    #[test]
    fn test_amounts_below_duty_floor() {
        assert_eq!(duty_for(0.0), 0.0);
        assert_eq!(duty_for(4999.99), 0.0);
        assert_eq!(duty_for(5000.0), 1999.0);
    }

    #[test]
    fn test_open_ended_duty_bracket() {
        assert_eq!(duty_for(20000.0), 6486.0);
        assert_eq!(duty_for(1_000_000.0), 6486.0);
    }
}
