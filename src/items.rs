//! Items

/// A candidate for selection, in fixed-point units.
///
/// `cost` is in the currency's minor units and `return_value` is in return units
/// (see [`crate::catalog::RETURN_SCALE`]). Both are signed so that bad input can be
/// reported by the solver instead of being unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Item {
    id: String,
    cost: i64,
    return_value: i64,
}

impl Item {
    /// Creates a new item with the given id, cost and return.
    pub fn new(id: impl Into<String>, cost: i64, return_value: i64) -> Self {
        Self {
            id: id.into(),
            cost,
            return_value,
        }
    }

    /// Returns the display id of the item
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the cost of the item
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Returns the absolute return of the item if selected
    pub fn return_value(&self) -> i64 {
        self.return_value
    }
}

/// Sums the cost of a list of items, returning `None` on overflow.
pub fn total_cost<'a>(items: impl IntoIterator<Item = &'a Item>) -> Option<i64> {
    items
        .into_iter()
        .try_fold(0_i64, |acc, item| acc.checked_add(item.cost))
}

/// Sums the return of a list of items, returning `None` on overflow.
pub fn total_return<'a>(items: impl IntoIterator<Item = &'a Item>) -> Option<i64> {
    items
        .into_iter()
        .try_fold(0_i64, |acc, item| acc.checked_add(item.return_value))
}
