//! Product service.

use store::RecordStore;
use tokio::sync::Mutex;

use crate::error::DomainError;
use crate::repository::Repository;
use crate::restaurant::Restaurant;
use crate::validation::{self, ValidationError};
use crate::value_objects::{ProductId, RestaurantId};

use super::{Product, ProductData};

/// Service for managing products.
///
/// Reads restaurants to enforce that a product always belongs to an
/// existing, online restaurant when it is created or moved.
pub struct ProductService<S: RecordStore> {
    products: Repository<S, Product>,
    restaurants: Repository<S, Restaurant>,
    writes: Mutex<()>,
}

impl<S: RecordStore + Clone> ProductService<S> {
    /// Creates a new product service with the given record store.
    pub fn new(store: S) -> Self {
        Self {
            products: Repository::new(store.clone()),
            restaurants: Repository::new(store),
            writes: Mutex::new(()),
        }
    }
}

impl<S: RecordStore> ProductService<S> {
    /// Returns a reference to the product repository.
    pub fn repository(&self) -> &Repository<S, Product> {
        &self.products
    }

    /// Registers a new, available product.
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, data: ProductData) -> Result<Product, DomainError> {
        let price = data.validate()?;
        let restaurant_id = data.restaurant_id.ok_or(ValidationError::RestaurantRequired)?;

        let _guard = self.writes.lock().await;
        self.require_active_restaurant(restaurant_id).await?;

        let product = Product::new(
            data.name,
            data.description,
            price,
            data.category,
            restaurant_id,
        );
        let product = self.products.save(product).await?;
        metrics::counter!("products_registered_total").increment(1);
        tracing::info!(product_id = ?product.id, %restaurant_id, "product registered");
        Ok(product)
    }

    /// Registers a product under the given restaurant, ignoring any
    /// restaurant carried by `data`.
    pub async fn register_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
        data: ProductData,
    ) -> Result<Product, DomainError> {
        self.register(data.for_restaurant(restaurant_id)).await
    }

    /// Lists products that can be ordered.
    #[tracing::instrument(skip(self))]
    pub async fn list_available(&self) -> Result<Vec<Product>, DomainError> {
        self.products
            .find(self.products.query().eq("available", true))
            .await
    }

    /// Lists products that are currently off the menu.
    #[tracing::instrument(skip(self))]
    pub async fn list_unavailable(&self) -> Result<Vec<Product>, DomainError> {
        self.products
            .find(self.products.query().eq("available", false))
            .await
    }

    /// Loads a product, failing with NotFound if absent.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.products.get(id).await
    }

    /// Loads a product, returning None if absent.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        self.products.find_by_id(id).await
    }

    /// Returns whether a product can be ordered.
    #[tracing::instrument(skip(self))]
    pub async fn check_availability(&self, id: ProductId) -> Result<bool, DomainError> {
        Ok(self.products.get(id).await?.is_available())
    }

    /// Updates an available product's descriptive fields and price.
    ///
    /// Moving the product to another restaurant requires that restaurant
    /// to exist and be online. Availability is never changed here.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: ProductId, data: ProductData) -> Result<Product, DomainError> {
        let _guard = self.writes.lock().await;
        let mut product = self.products.get(id).await?;

        if !product.is_available() {
            return Err(ValidationError::UnavailableProduct.into());
        }
        let price = data.validate()?;

        if let Some(restaurant_id) = data.restaurant_id {
            if restaurant_id != product.restaurant_id {
                self.require_active_restaurant(restaurant_id).await?;
                product.restaurant_id = restaurant_id;
            }
        }

        product.name = data.name;
        product.description = data.description;
        product.category = data.category;
        product.price = price;

        let product = self.products.save(product).await?;
        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Changes only the price of a product.
    #[tracing::instrument(skip(self))]
    pub async fn update_price(
        &self,
        id: ProductId,
        price: Option<f64>,
    ) -> Result<Product, DomainError> {
        let price = validation::price(price)?;

        let _guard = self.writes.lock().await;
        let mut product = self.products.get(id).await?;
        let previous = product.price;

        product.price = price;
        let product = self.products.save(product).await?;
        tracing::info!(product_id = %id, %previous, %price, "product price changed");
        Ok(product)
    }

    /// Takes a product off the menu.
    #[tracing::instrument(skip(self))]
    pub async fn make_unavailable(&self, id: ProductId) -> Result<Product, DomainError> {
        self.modify(id, Product::make_unavailable).await
    }

    /// Puts a product back on the menu.
    #[tracing::instrument(skip(self))]
    pub async fn make_available(&self, id: ProductId) -> Result<Product, DomainError> {
        self.modify(id, Product::make_available).await
    }

    /// Finds available products whose name contains `name`, ignoring case.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, DomainError> {
        self.products
            .find(
                self.products
                    .query()
                    .eq("available", true)
                    .contains_ignore_case("name", name),
            )
            .await
    }

    /// Finds products of exactly this category.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Product>, DomainError> {
        self.products
            .find(self.products.query().eq("category", category))
            .await
    }

    /// Lists every product of a restaurant.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, DomainError> {
        self.products
            .find(
                self.products
                    .query()
                    .eq("restaurant_id", restaurant_id.to_string()),
            )
            .await
    }

    /// Finds available products priced within `[min, max]`.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_price_range(
        &self,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Vec<Product>, DomainError> {
        let (min, max) = validation::price_range(min, max)?;

        // Prices are stored in cents. Bounds snap to whole cents so that a
        // price sitting exactly on a bound survives f64 scaling.
        let min_cents = (min * 100.0 - 1e-6).ceil();
        let max_cents = (max * 100.0 + 1e-6).floor();
        self.products
            .find(
                self.products
                    .query()
                    .eq("available", true)
                    .number_between("price", min_cents, max_cents),
            )
            .await
    }

    async fn require_active_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<(), DomainError> {
        let restaurant = self
            .restaurants
            .find_by_id(restaurant_id)
            .await?
            .ok_or(ValidationError::UnknownRestaurant(restaurant_id))?;

        if !restaurant.is_active() {
            return Err(ValidationError::InactiveRestaurant.into());
        }
        Ok(())
    }

    async fn modify(&self, id: ProductId, change: fn(&mut Product)) -> Result<Product, DomainError> {
        let _guard = self.writes.lock().await;
        let mut product = self.products.get(id).await?;

        change(&mut product);
        let product = self.products.save(product).await?;
        tracing::info!(product_id = %id, available = product.is_available(), "product availability changed");
        Ok(product)
    }
}
