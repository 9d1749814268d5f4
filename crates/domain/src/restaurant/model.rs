use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::validation::{self, ValidationError};
use crate::value_objects::{Money, RestaurantId};

/// A restaurant on the marketplace.
///
/// The active flag doubles as online/offline and may be flipped any number
/// of times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default)]
    pub id: Option<RestaurantId>,
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub delivery_fee: Money,
    pub rating: Option<f64>,
    active: bool,
}

/// Input for registering or updating a restaurant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantData {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub delivery_fee: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl RestaurantData {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_delivery_fee(mut self, fee: f64) -> Self {
        self.delivery_fee = Some(fee);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Trims the phone so lookups and storage use the same form.
    pub fn normalized(mut self) -> Self {
        self.phone = self.phone.trim().to_string();
        self
    }

    /// Runs the field-level checks and returns the validated delivery fee.
    pub fn validate(&self) -> Result<Money, ValidationError> {
        validation::name(&self.name)?;
        validation::required("Phone", &self.phone)?;
        validation::rating(self.rating)?;
        validation::delivery_fee(self.delivery_fee)
    }
}

impl Restaurant {
    /// Creates an online restaurant from input and its validated fee.
    pub fn new(data: RestaurantData, delivery_fee: Money) -> Self {
        Self {
            id: None,
            name: data.name,
            category: data.category,
            address: data.address,
            phone: data.phone,
            delivery_fee,
            rating: data.rating,
            active: true,
        }
    }

    /// Returns true while the restaurant is online.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_online(&mut self) {
        self.active = true;
    }

    pub fn set_offline(&mut self) {
        self.active = false;
    }

    /// Flips between online and offline.
    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    /// Overwrites the descriptive fields. The online flag is left untouched.
    pub fn apply_update(&mut self, data: RestaurantData, delivery_fee: Money) {
        self.name = data.name;
        self.category = data.category;
        self.address = data.address;
        self.phone = data.phone;
        self.delivery_fee = delivery_fee;
        self.rating = data.rating;
    }
}

impl Entity for Restaurant {
    type Id = RestaurantId;

    fn collection() -> &'static str {
        "restaurants"
    }

    fn entity_name() -> &'static str {
        "Restaurant"
    }

    fn id(&self) -> Option<RestaurantId> {
        self.id
    }

    fn set_id(&mut self, id: RestaurantId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sabor_da_india() -> RestaurantData {
        RestaurantData::new("Sabor da India", "(11) 4444-5555")
            .with_category("Indiana")
            .with_delivery_fee(7.0)
            .with_rating(4.8)
    }

    #[test]
    fn test_validate_returns_fee_in_cents() {
        assert_eq!(sabor_da_india().validate(), Ok(Money::from_cents(700)));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert_eq!(
            RestaurantData::new("Sabor", "").validate(),
            Err(ValidationError::Empty("Phone"))
        );
        assert_eq!(
            sabor_da_india().with_rating(7.5).validate(),
            Err(ValidationError::RatingOutOfRange)
        );
        assert_eq!(
            sabor_da_india().with_delivery_fee(-2.0).validate(),
            Err(ValidationError::NegativeDeliveryFee)
        );
    }

    #[test]
    fn test_toggle_is_reversible() {
        let mut restaurant = Restaurant::new(sabor_da_india(), Money::from_cents(700));
        assert!(restaurant.is_active());

        restaurant.toggle();
        assert!(!restaurant.is_active());
        restaurant.toggle();
        assert!(restaurant.is_active());

        restaurant.set_offline();
        restaurant.set_offline();
        assert!(!restaurant.is_active());
        restaurant.set_online();
        assert!(restaurant.is_active());
    }

    #[test]
    fn test_apply_update_keeps_online_flag() {
        let mut restaurant = Restaurant::new(sabor_da_india(), Money::from_cents(700));
        restaurant.set_offline();

        restaurant.apply_update(
            RestaurantData::new("Sabor da India II", "(11) 4444-0000"),
            Money::zero(),
        );

        assert_eq!(restaurant.name, "Sabor da India II");
        assert_eq!(restaurant.delivery_fee, Money::zero());
        assert!(!restaurant.is_active());
    }
}
