//! Order entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::validation::{self, ValidationError};
use crate::value_objects::{CustomerId, Money, OrderId, RestaurantId};

use super::lifecycle::{self, OrderAction, Transition};
use super::{OrderError, OrderStatus};

/// An order placed by a customer at one restaurant.
///
/// The customer and restaurant are referenced by id only; changes to them
/// never cascade into the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: Option<OrderId>,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    status: OrderStatus,
    pub total_value: Money,
    pub customer_id: CustomerId,
    pub restaurant_id: RestaurantId,
    pub items: String,
}

/// Input for registering or updating an order.
///
/// The status is kept as text so that unknown values are reported as
/// validation errors instead of being rejected by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    pub order_number: String,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_value: Option<f64>,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
    #[serde(default)]
    pub items: String,
}

/// Order fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidOrder {
    pub order_number: String,
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    pub total_value: Money,
    pub customer_id: CustomerId,
    pub restaurant_id: RestaurantId,
    pub items: String,
}

impl OrderData {
    pub fn new(
        order_number: impl Into<String>,
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
        total_value: f64,
        items: impl Into<String>,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            customer_id: Some(customer_id),
            restaurant_id: Some(restaurant_id),
            total_value: Some(total_value),
            items: items.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_order_date(mut self, order_date: DateTime<Utc>) -> Self {
        self.order_date = Some(order_date);
        self
    }

    /// Runs the field-level checks.
    pub fn validate(self) -> Result<ValidOrder, ValidationError> {
        validation::required("Order number", &self.order_number)?;
        let customer_id = self.customer_id.ok_or(ValidationError::CustomerRequired)?;
        let restaurant_id = self
            .restaurant_id
            .ok_or(ValidationError::RestaurantRequired)?;
        let total_value = validation::total_value(self.total_value)?;
        if self.items.trim().is_empty() {
            return Err(ValidationError::EmptyItems);
        }
        let status = self
            .status
            .as_deref()
            .map(str::parse::<OrderStatus>)
            .transpose()?;

        Ok(ValidOrder {
            order_number: self.order_number,
            order_date: self.order_date,
            status,
            total_value,
            customer_id,
            restaurant_id,
            items: self.items,
        })
    }
}

impl Order {
    /// Creates an order from validated input, defaulting the date to now
    /// and the status to [`OrderStatus::Pending`].
    pub fn new(valid: ValidOrder) -> Self {
        Self {
            id: None,
            order_number: valid.order_number,
            order_date: valid.order_date.unwrap_or_else(Utc::now),
            status: valid.status.unwrap_or_default(),
            total_value: valid.total_value,
            customer_id: valid.customer_id,
            restaurant_id: valid.restaurant_id,
            items: valid.items,
        }
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns true if the order is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Moves to `requested` along the transition table.
    ///
    /// Requesting the current status leaves the order unchanged.
    pub fn transition_to(&mut self, requested: OrderStatus) -> Result<Transition, OrderError> {
        let transition = lifecycle::check_transition(self.status, requested)?;
        self.status = transition.target(self.status);
        Ok(transition)
    }

    /// Runs a dedicated lifecycle action, returning the previous status.
    pub fn perform(&mut self, action: OrderAction) -> Result<OrderStatus, OrderError> {
        let previous = self.status;
        self.status = action.apply(previous)?;
        Ok(previous)
    }

    pub fn confirm(&mut self) -> Result<OrderStatus, OrderError> {
        self.perform(OrderAction::Confirm)
    }

    pub fn deliver(&mut self) -> Result<OrderStatus, OrderError> {
        self.perform(OrderAction::Deliver)
    }

    pub fn cancel(&mut self) -> Result<OrderStatus, OrderError> {
        self.perform(OrderAction::Cancel)
    }

    /// Overwrites the content fields of the order. The order number and
    /// date are kept; the status is changed separately through
    /// [`Order::transition_to`].
    pub fn apply_update(&mut self, valid: ValidOrder) {
        self.total_value = valid.total_value;
        self.customer_id = valid.customer_id;
        self.restaurant_id = valid.restaurant_id;
        self.items = valid.items;
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn collection() -> &'static str {
        "orders"
    }

    fn entity_name() -> &'static str {
        "Order"
    }

    fn id(&self) -> Option<OrderId> {
        self.id
    }

    fn set_id(&mut self, id: OrderId) {
        self.id = Some(id);
    }
}
