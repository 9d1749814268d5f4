//! Product (menu item) entity and service.

mod model;
mod service;

pub use model::{Product, ProductData};
pub use service::ProductService;
