//! Order service providing the lifecycle and total-calculation operations.

use chrono::{DateTime, Utc};
use store::RecordStore;
use tokio::sync::Mutex;

use crate::customer::Customer;
use crate::entity::Entity;
use crate::error::DomainError;
use crate::product::Product;
use crate::repository::Repository;
use crate::restaurant::Restaurant;
use crate::validation::{self, ValidationError};
use crate::value_objects::{CustomerId, Money, OrderId, ProductId, RestaurantId};

use super::{Order, OrderAction, OrderData, OrderStatus, Transition, lifecycle};

/// Service for managing orders.
///
/// Customers, restaurants and products are resolved by id through the same
/// record store whenever an operation needs them.
pub struct OrderService<S: RecordStore> {
    orders: Repository<S, Order>,
    customers: Repository<S, Customer>,
    restaurants: Repository<S, Restaurant>,
    products: Repository<S, Product>,
    writes: Mutex<()>,
}

impl<S: RecordStore + Clone> OrderService<S> {
    /// Creates a new order service with the given record store.
    pub fn new(store: S) -> Self {
        Self {
            orders: Repository::new(store.clone()),
            customers: Repository::new(store.clone()),
            restaurants: Repository::new(store.clone()),
            products: Repository::new(store),
            writes: Mutex::new(()),
        }
    }
}

impl<S: RecordStore> OrderService<S> {
    /// Returns a reference to the order repository.
    pub fn repository(&self) -> &Repository<S, Order> {
        &self.orders
    }

    /// Registers a new order.
    ///
    /// The date defaults to now and the status to PENDING. The referenced
    /// customer and restaurant must exist.
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, data: OrderData) -> Result<Order, DomainError> {
        let valid = data.validate()?;

        let _guard = self.writes.lock().await;
        self.require_references(valid.customer_id, valid.restaurant_id)
            .await?;

        let order = self.orders.save(Order::new(valid)).await?;
        metrics::counter!("orders_registered_total").increment(1);
        tracing::info!(
            order_id = ?order.id,
            order_number = %order.order_number,
            status = %order.status(),
            "order registered"
        );
        Ok(order)
    }

    /// Lists every order in registration order.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        self.orders.all().await
    }

    /// Loads an order, failing with NotFound if absent.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Order, DomainError> {
        self.orders.get(id).await
    }

    /// Loads an order, returning None if absent.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        self.orders.find_by_id(id).await
    }

    /// Lists the orders of a customer.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, DomainError> {
        self.orders
            .find(
                self.orders
                    .query()
                    .eq("customer_id", customer_id.to_string()),
            )
            .await
    }

    /// Lists orders with the given status, parsed case-insensitively.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_status(&self, status: &str) -> Result<Vec<Order>, DomainError> {
        let status: OrderStatus = status.parse()?;
        self.orders
            .find(self.orders.query().eq("status", status.as_str()))
            .await
    }

    /// Lists a customer's orders with the given status.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_customer_and_status(
        &self,
        customer_id: CustomerId,
        status: &str,
    ) -> Result<Vec<Order>, DomainError> {
        let status: OrderStatus = status.parse()?;
        self.orders
            .find(
                self.orders
                    .query()
                    .eq("customer_id", customer_id.to_string())
                    .eq("status", status.as_str()),
            )
            .await
    }

    /// Lists orders placed within `[start, end]`.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, DomainError> {
        validation::date_range(start, end)?;
        self.orders
            .find(self.orders.query().timestamp_between("order_date", start, end))
            .await
    }

    /// Lists a customer's orders placed within `[start, end]`.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_customer_and_date_range(
        &self,
        customer_id: CustomerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, DomainError> {
        validation::date_range(start, end)?;
        self.orders
            .find(
                self.orders
                    .query()
                    .eq("customer_id", customer_id.to_string())
                    .timestamp_between("order_date", start, end),
            )
            .await
    }

    /// Overwrites an order's content fields.
    ///
    /// A status carried by `data` goes through the transition table like
    /// any other status change; the current status is accepted as a no-op.
    /// The order number is validated but never replaced.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: OrderId, data: OrderData) -> Result<Order, DomainError> {
        let _guard = self.writes.lock().await;
        let mut order = self.orders.get(id).await?;
        let valid = data.validate()?;

        if valid.customer_id != order.customer_id || valid.restaurant_id != order.restaurant_id {
            self.require_references(valid.customer_id, valid.restaurant_id)
                .await?;
        }

        let transition = match valid.status {
            Some(status) => order.transition_to(status)?,
            None => Transition::Unchanged,
        };
        order.apply_update(valid);

        let order = self.orders.save(order).await?;
        record_transition(transition);
        tracing::info!(order_id = %id, "order updated");
        Ok(order)
    }

    /// Sums the prices of the given products.
    ///
    /// Every product must exist and be available; the first failure aborts
    /// the calculation.
    #[tracing::instrument(skip(self))]
    pub async fn calculate_order_total(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Money, DomainError> {
        if product_ids.is_empty() {
            return Err(ValidationError::EmptyProductList.into());
        }

        let mut total = Money::zero();
        for id in product_ids {
            let product = self.products.get(*id).await?;
            total += lifecycle::line_price(&product)?;
        }

        metrics::counter!("order_totals_calculated_total").increment(1);
        tracing::debug!(products = product_ids.len(), %total, "order total calculated");
        Ok(total)
    }

    /// Moves a PENDING order to CONFIRMED.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(&self, id: OrderId) -> Result<Order, DomainError> {
        self.perform(id, OrderAction::Confirm).await
    }

    /// Moves a CONFIRMED order to DELIVERED.
    #[tracing::instrument(skip(self))]
    pub async fn deliver(&self, id: OrderId) -> Result<Order, DomainError> {
        self.perform(id, OrderAction::Deliver).await
    }

    /// Cancels a PENDING or CONFIRMED order.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order, DomainError> {
        self.perform(id, OrderAction::Cancel).await
    }

    /// Sets the status of an order along the transition table.
    ///
    /// Setting the current status succeeds without writing anything.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: &str) -> Result<Order, DomainError> {
        let requested: OrderStatus = status.parse()?;

        let _guard = self.writes.lock().await;
        let mut order = self.orders.get(id).await?;

        let transition = order.transition_to(requested)?;
        if transition == Transition::Unchanged {
            tracing::debug!(order_id = %id, status = %requested, "order already has status");
            return Ok(order);
        }

        let order = self.orders.save(order).await?;
        record_transition(transition);
        tracing::info!(order_id = %id, status = %requested, "order status updated");
        Ok(order)
    }

    /// Physically removes an order.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), DomainError> {
        let _guard = self.writes.lock().await;
        if !self.orders.delete(id).await? {
            return Err(DomainError::not_found(Order::entity_name(), id));
        }
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    async fn perform(&self, id: OrderId, action: OrderAction) -> Result<Order, DomainError> {
        let _guard = self.writes.lock().await;
        let mut order = self.orders.get(id).await?;

        let previous = order.perform(action)?;
        let order = self.orders.save(order).await?;
        record_transition(Transition::Changed {
            from: previous,
            to: order.status(),
        });
        tracing::info!(order_id = %id, %action, from = %previous, to = %order.status(), "order status changed");
        Ok(order)
    }

    async fn require_references(
        &self,
        customer_id: CustomerId,
        restaurant_id: RestaurantId,
    ) -> Result<(), DomainError> {
        if self.customers.find_by_id(customer_id).await?.is_none() {
            return Err(ValidationError::UnknownCustomer(customer_id).into());
        }
        if self.restaurants.find_by_id(restaurant_id).await?.is_none() {
            return Err(ValidationError::UnknownRestaurant(restaurant_id).into());
        }
        Ok(())
    }
}

fn record_transition(transition: Transition) {
    if let Transition::Changed { from, to } = transition {
        metrics::counter!(
            "order_status_transitions_total",
            "from" => from.as_str(),
            "to" => to.as_str()
        )
        .increment(1);
    }
}
