// Bid increment rules: map a current bid amount to the next legal step.

use serde::{Deserialize, Serialize};

/// An inclusive amount range mapped to a bid increment.
///
/// Rules are evaluated in configured order; the first rule whose range
/// contains the current amount wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidIncrementRule {
    /// Lower bound of the range (inclusive).
    pub min_amount: u32,
    /// Upper bound of the range (inclusive).
    pub max_amount: u32,
    /// Step size applied while the current amount is inside the range.
    pub increment: u32,
}

impl BidIncrementRule {
    /// Whether `amount` falls inside this rule's range.
    pub fn contains(&self, amount: u32) -> bool {
        self.min_amount <= amount && amount <= self.max_amount
    }
}

/// Resolve the increment for `current_amount` against the configured rules.
/// Falls back to 1 when no rule matches.
pub fn next_increment(current_amount: u32, rules: &[BidIncrementRule]) -> u32 {
    rules
        .iter()
        .find(|rule| rule.contains(current_amount))
        .map(|rule| rule.increment)
        .unwrap_or(1)
}

/// The next proposed bid for one-click raises: current amount plus the
/// resolved increment. Free-form amounts bypass this and go straight to the
/// bid validator.
pub fn next_bid(current_amount: u32, rules: &[BidIncrementRule]) -> u32 {
    current_amount + next_increment(current_amount, rules)
}
