use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::validation::{self, ValidationError};
use crate::value_objects::{Money, ProductId, RestaurantId};

/// A menu item offered by one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub category: String,
    pub restaurant_id: RestaurantId,
    available: bool,
}

/// Input for registering or updating a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<f64>,
    pub category: String,
    #[serde(default)]
    pub restaurant_id: Option<RestaurantId>,
}

impl ProductData {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Some(price),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn for_restaurant(mut self, restaurant_id: RestaurantId) -> Self {
        self.restaurant_id = Some(restaurant_id);
        self
    }

    /// Runs the field-level checks and returns the validated price.
    ///
    /// The owning restaurant is checked separately since it needs the store.
    pub fn validate(&self) -> Result<Money, ValidationError> {
        validation::name(&self.name)?;
        validation::required("Category", &self.category)?;
        validation::price(self.price)
    }
}

impl Product {
    /// Creates an available product.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        category: impl Into<String>,
        restaurant_id: RestaurantId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            restaurant_id,
            available: true,
        }
    }

    /// Returns true if the product can be ordered.
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn make_available(&mut self) {
        self.available = true;
    }

    pub fn make_unavailable(&mut self) {
        self.available = false;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn collection() -> &'static str {
        "products"
    }

    fn entity_name() -> &'static str {
        "Product"
    }

    fn id(&self) -> Option<ProductId> {
        self.id
    }

    fn set_id(&mut self, id: ProductId) {
        self.id = Some(id);
    }
}
