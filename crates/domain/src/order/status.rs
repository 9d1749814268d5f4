//! Order status state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// The status of an order in its lifecycle.
///
/// Status transitions:
/// ```text
/// Pending ──► Confirmed ──► Delivered
///    │            │
///    └────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order was placed and awaits the restaurant (initial state).
    #[default]
    Pending,

    /// Restaurant accepted the order.
    Confirmed,

    /// Order reached the customer (terminal state).
    Delivered,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Returns the statuses reachable from this one.
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Delivered, OrderStatus::Cancelled],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    /// Returns true if `next` is on the transition table for this status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Returns true if the order can be confirmed in this status.
    pub fn can_confirm(&self) -> bool {
        self.can_transition_to(OrderStatus::Confirmed)
    }

    /// Returns true if the order can be delivered in this status.
    pub fn can_deliver(&self) -> bool {
        self.can_transition_to(OrderStatus::Delivered)
    }

    /// Returns true if the order can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        self.can_transition_to(OrderStatus::Cancelled)
    }

    /// Returns true if this is a terminal status (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    /// Parses a status name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}
