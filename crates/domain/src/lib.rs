//! Domain layer for the delivery marketplace.
//!
//! This crate provides:
//! - Customer, Restaurant, Product and Order entities
//! - Validation rules guarding every mutation
//! - The order lifecycle engine (status transition table and totals)
//! - A typed `Repository` over the record store and one service per entity

pub mod customer;
pub mod entity;
pub mod error;
pub mod order;
pub mod product;
pub mod repository;
pub mod restaurant;
pub mod validation;
pub mod value_objects;

pub use customer::{Customer, CustomerData, CustomerService};
pub use entity::Entity;
pub use error::DomainError;
pub use order::{
    Order, OrderAction, OrderData, OrderError, OrderService, OrderStatus, Transition,
};
pub use product::{Product, ProductData, ProductService};
pub use repository::Repository;
pub use restaurant::{Restaurant, RestaurantData, RestaurantService};
pub use validation::ValidationError;
pub use value_objects::{CustomerId, Money, OrderId, ProductId, RestaurantId};
