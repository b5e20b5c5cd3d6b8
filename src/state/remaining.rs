//! Remaining budget accumulator
//!
//! The only value changed optimistically: a successful expense submission
//! decrements it locally until the next authoritative fetch overwrites it.

/// Where the current value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetOrigin {
    Fetched,
    Estimated,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RemainingBudget {
    amount: Option<f64>,
    origin: BudgetOrigin,
}

impl RemainingBudget {
    pub fn new() -> Self {
        Self {
            amount: None,
            origin: BudgetOrigin::Fetched,
        }
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn origin(&self) -> BudgetOrigin {
        self.origin
    }

    /// No budget recorded yet (null or zero)
    pub fn is_unset(&self) -> bool {
        self.amount.is_none_or(|amount| amount == 0.0)
    }

    /// Overwrite with an authoritative value, whatever the local estimate says
    pub fn set_fetched(&mut self, amount: Option<f64>) {
        self.amount = amount;
        self.origin = BudgetOrigin::Fetched;
    }

    /// Seed a freshly set total before the server confirms it
    pub fn seed(&mut self, total: f64) {
        self.amount = Some(total);
        self.origin = BudgetOrigin::Estimated;
    }

    /// Account for a confirmed expense locally
    pub fn decrement(&mut self, spent: f64) {
        if let Some(amount) = self.amount.as_mut() {
            *amount -= spent;
            self.origin = BudgetOrigin::Estimated;
        }
    }
}

impl Default for RemainingBudget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_overwrites_estimate() {
        let mut remaining = RemainingBudget::new();
        remaining.set_fetched(Some(1000.0));
        remaining.decrement(250.0);
        assert_eq!(remaining.amount(), Some(750.0));
        assert_eq!(remaining.origin(), BudgetOrigin::Estimated);
        remaining.set_fetched(Some(800.0));
        assert_eq!(remaining.amount(), Some(800.0));
        assert_eq!(remaining.origin(), BudgetOrigin::Fetched);
    }

    #[test]
    fn null_or_zero_is_unset() {
        let mut remaining = RemainingBudget::new();
        assert!(remaining.is_unset());
        remaining.set_fetched(Some(0.0));
        assert!(remaining.is_unset());
        remaining.decrement(10.0);
        assert_eq!(remaining.amount(), Some(-10.0));
        remaining.set_fetched(None);
        remaining.decrement(10.0);
        assert_eq!(remaining.amount(), None);
    }
}
