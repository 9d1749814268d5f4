//! Order lifecycle engine.
//!
//! Every status change goes through [`check_transition`] or
//! [`OrderAction::apply`], both driven by the table in
//! [`OrderStatus::allowed_next`].

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::validation::ValidationError;
use crate::value_objects::Money;

use super::{OrderError, OrderStatus};

/// Outcome of a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The order already had the requested status.
    Unchanged,

    /// The status moves along the transition table.
    Changed { from: OrderStatus, to: OrderStatus },
}

impl Transition {
    /// Returns the status after the transition.
    pub fn target(&self, current: OrderStatus) -> OrderStatus {
        match self {
            Transition::Unchanged => current,
            Transition::Changed { to, .. } => *to,
        }
    }
}

/// Checks a manual status change against the transition table.
///
/// Requesting the current status is an idempotent no-op.
pub fn check_transition(
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<Transition, OrderError> {
    if current == requested {
        return Ok(Transition::Unchanged);
    }
    if !current.can_transition_to(requested) {
        return Err(OrderError::InvalidStateTransition {
            from: current,
            to: requested,
        });
    }
    Ok(Transition::Changed {
        from: current,
        to: requested,
    })
}

/// A dedicated lifecycle step with a single target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderAction {
    Confirm,
    Deliver,
    Cancel,
}

impl OrderAction {
    /// Returns the status this action moves the order to.
    pub fn target(&self) -> OrderStatus {
        match self {
            OrderAction::Confirm => OrderStatus::Confirmed,
            OrderAction::Deliver => OrderStatus::Delivered,
            OrderAction::Cancel => OrderStatus::Cancelled,
        }
    }

    /// Applies the action to an order in `current` status.
    ///
    /// Unlike [`check_transition`] there is no same-status pass-through:
    /// confirming a confirmed order fails.
    pub fn apply(&self, current: OrderStatus) -> Result<OrderStatus, OrderError> {
        let target = self.target();
        if !current.can_transition_to(target) {
            return Err(OrderError::InvalidState {
                current,
                action: *self,
            });
        }
        Ok(target)
    }

    /// Returns the action name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Confirm => "confirm",
            OrderAction::Deliver => "deliver",
            OrderAction::Cancel => "cancel",
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the price a product contributes to an order total.
///
/// Unavailable products cannot be ordered.
pub fn line_price(product: &Product) -> Result<Money, ValidationError> {
    if !product.is_available() {
        return Err(ValidationError::ProductUnavailable(product.name.clone()));
    }
    Ok(product.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::RestaurantId;

    fn product(name: &str, cents: i64) -> Product {
        Product::new(
            name,
            "",
            Money::from_cents(cents),
            "Prato Principal",
            RestaurantId::new(),
        )
    }

    #[test]
    fn test_same_status_is_unchanged() {
        for status in OrderStatus::ALL {
            assert_eq!(check_transition(status, status), Ok(Transition::Unchanged));
        }
    }

    #[test]
    fn test_allowed_transition_changes_status() {
        let transition = check_transition(OrderStatus::Pending, OrderStatus::Confirmed).unwrap();
        assert_eq!(
            transition,
            Transition::Changed {
                from: OrderStatus::Pending,
                to: OrderStatus::Confirmed
            }
        );
        assert_eq!(transition.target(OrderStatus::Pending), OrderStatus::Confirmed);
    }

    #[test]
    fn test_disallowed_transition_names_pair() {
        let err = check_transition(OrderStatus::Delivered, OrderStatus::Pending).unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidStateTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending
            }
        );
        assert!(err.to_string().contains("DELIVERED"));
        assert!(err.to_string().contains("PENDING"));
    }

    #[test]
    fn test_pending_cannot_skip_to_delivered() {
        assert!(check_transition(OrderStatus::Pending, OrderStatus::Delivered).is_err());
    }

    #[test]
    fn test_actions_follow_table() {
        assert_eq!(
            OrderAction::Confirm.apply(OrderStatus::Pending),
            Ok(OrderStatus::Confirmed)
        );
        assert_eq!(
            OrderAction::Deliver.apply(OrderStatus::Confirmed),
            Ok(OrderStatus::Delivered)
        );
        assert_eq!(
            OrderAction::Cancel.apply(OrderStatus::Pending),
            Ok(OrderStatus::Cancelled)
        );
        assert_eq!(
            OrderAction::Cancel.apply(OrderStatus::Confirmed),
            Ok(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn test_actions_have_no_same_status_pass_through() {
        assert_eq!(
            OrderAction::Confirm.apply(OrderStatus::Confirmed),
            Err(OrderError::InvalidState {
                current: OrderStatus::Confirmed,
                action: OrderAction::Confirm
            })
        );
        assert!(OrderAction::Cancel.apply(OrderStatus::Cancelled).is_err());
        assert!(OrderAction::Deliver.apply(OrderStatus::Pending).is_err());
        assert!(OrderAction::Cancel.apply(OrderStatus::Delivered).is_err());
    }

    #[test]
    fn test_line_price_of_available_product() {
        let tikka = product("Frango Tikka Masala", 4550);

        assert_eq!(line_price(&tikka), Ok(Money::from_cents(4550)));
    }

    #[test]
    fn test_line_price_rejects_unavailable_product() {
        let mut samosa = product("Samosa (2 unidades)", 1500);
        samosa.make_unavailable();

        assert_eq!(
            line_price(&samosa),
            Err(ValidationError::ProductUnavailable(
                "Samosa (2 unidades)".to_string()
            ))
        );
    }
}
