//! Customer entity and service.

mod model;
mod service;

pub use model::{Customer, CustomerData};
pub use service::CustomerService;
