//! Order entity, lifecycle engine and service.

pub mod lifecycle;
mod model;
mod service;
mod status;

pub use lifecycle::{OrderAction, Transition, check_transition, line_price};
pub use model::{Order, OrderData, ValidOrder};
pub use service::OrderService;
pub use status::OrderStatus;

use thiserror::Error;

/// Errors raised by the order lifecycle engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Requested status is not on the transition table.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidStateTransition { from: OrderStatus, to: OrderStatus },

    /// A dedicated action was attempted from the wrong status.
    #[error("Cannot {action} an order with status {current}")]
    InvalidState {
        current: OrderStatus,
        action: OrderAction,
    },
}
