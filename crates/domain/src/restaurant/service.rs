//! Restaurant service.

use store::RecordStore;
use tokio::sync::Mutex;

use crate::error::DomainError;
use crate::repository::Repository;
use crate::validation::ValidationError;
use crate::value_objects::RestaurantId;

use super::{Restaurant, RestaurantData};

/// Highest rating a restaurant can have.
const MAX_RATING: f64 = 5.0;

/// Service for managing restaurants.
pub struct RestaurantService<S: RecordStore> {
    restaurants: Repository<S, Restaurant>,
    writes: Mutex<()>,
}

impl<S: RecordStore> RestaurantService<S> {
    /// Creates a new restaurant service with the given record store.
    pub fn new(store: S) -> Self {
        Self {
            restaurants: Repository::new(store),
            writes: Mutex::new(()),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Restaurant> {
        &self.restaurants
    }

    /// Registers a new, online restaurant.
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, data: RestaurantData) -> Result<Restaurant, DomainError> {
        let data = data.normalized();
        let fee = data.validate()?;

        let _guard = self.writes.lock().await;
        if self.phone_holder(&data.phone).await?.is_some() {
            return Err(ValidationError::PhoneTaken(data.phone).into());
        }

        let restaurant = self.restaurants.save(Restaurant::new(data, fee)).await?;
        metrics::counter!("restaurants_registered_total").increment(1);
        tracing::info!(restaurant_id = ?restaurant.id, "restaurant registered");
        Ok(restaurant)
    }

    /// Lists online restaurants.
    #[tracing::instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Restaurant>, DomainError> {
        self.restaurants
            .find(self.restaurants.query().eq("active", true))
            .await
    }

    /// Loads a restaurant, failing with NotFound if absent.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: RestaurantId) -> Result<Restaurant, DomainError> {
        self.restaurants.get(id).await
    }

    /// Loads a restaurant, returning None if absent.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, DomainError> {
        self.restaurants.find_by_id(id).await
    }

    /// Updates the descriptive fields of a restaurant.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: RestaurantId,
        data: RestaurantData,
    ) -> Result<Restaurant, DomainError> {
        let _guard = self.writes.lock().await;
        let mut restaurant = self.restaurants.get(id).await?;
        let data = data.normalized();
        let fee = data.validate()?;

        if data.phone != restaurant.phone {
            let holder = self.phone_holder(&data.phone).await?;
            if holder.is_some_and(|other| other.id != Some(id)) {
                return Err(ValidationError::PhoneTaken(data.phone).into());
            }
        }

        restaurant.apply_update(data, fee);
        let restaurant = self.restaurants.save(restaurant).await?;
        tracing::info!(restaurant_id = %id, "restaurant updated");
        Ok(restaurant)
    }

    /// Puts a restaurant online.
    #[tracing::instrument(skip(self))]
    pub async fn set_online(&self, id: RestaurantId) -> Result<Restaurant, DomainError> {
        self.modify(id, Restaurant::set_online).await
    }

    /// Takes a restaurant offline.
    #[tracing::instrument(skip(self))]
    pub async fn set_offline(&self, id: RestaurantId) -> Result<Restaurant, DomainError> {
        self.modify(id, Restaurant::set_offline).await
    }

    /// Flips a restaurant between online and offline.
    #[tracing::instrument(skip(self))]
    pub async fn toggle(&self, id: RestaurantId) -> Result<Restaurant, DomainError> {
        self.modify(id, Restaurant::toggle).await
    }

    /// Finds online restaurants whose name contains `name`, ignoring case.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Restaurant>, DomainError> {
        self.restaurants
            .find(
                self.restaurants
                    .query()
                    .eq("active", true)
                    .contains_ignore_case("name", name),
            )
            .await
    }

    /// Finds restaurants of exactly this category.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_category(&self, category: &str) -> Result<Vec<Restaurant>, DomainError> {
        self.restaurants
            .find(self.restaurants.query().eq("category", category))
            .await
    }

    /// Finds restaurants rated at least `min`.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_rating(&self, min: f64) -> Result<Vec<Restaurant>, DomainError> {
        if !(0.0..=MAX_RATING).contains(&min) {
            return Err(ValidationError::RatingOutOfRange.into());
        }
        self.restaurants
            .find(
                self.restaurants
                    .query()
                    .number_between("rating", min, MAX_RATING),
            )
            .await
    }

    async fn phone_holder(&self, phone: &str) -> Result<Option<Restaurant>, DomainError> {
        self.restaurants
            .find_one(self.restaurants.query().eq("phone", phone.trim()))
            .await
    }

    async fn modify(
        &self,
        id: RestaurantId,
        change: fn(&mut Restaurant),
    ) -> Result<Restaurant, DomainError> {
        let _guard = self.writes.lock().await;
        let mut restaurant = self.restaurants.get(id).await?;

        change(&mut restaurant);
        let restaurant = self.restaurants.save(restaurant).await?;
        tracing::info!(restaurant_id = %id, online = restaurant.is_active(), "restaurant status changed");
        Ok(restaurant)
    }
}
