//! Restaurant entity and service.

mod model;
mod service;

pub use model::{Restaurant, RestaurantData};
pub use service::RestaurantService;
