use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::validation::{self, ValidationError};
use crate::value_objects::CustomerId;

/// A registered customer.
///
/// Customers are never physically removed; deactivation is one-way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub registered_at: DateTime<Utc>,
    active: bool,
}

/// Input for registering or updating a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
}

impl CustomerData {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Trims the e-mail so lookups and storage use the same form.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }

    /// Runs the field-level checks shared by register and update.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::name(&self.name)?;
        validation::email(&self.email)
    }
}

impl Customer {
    /// Creates an active customer from validated input.
    pub fn new(data: CustomerData) -> Self {
        Self {
            id: None,
            name: data.name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            registered_at: data.registered_at.unwrap_or_else(Utc::now),
            active: true,
        }
    }

    /// Returns true while the customer has not been deactivated.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the customer inactive. Deactivating twice is allowed.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Overwrites the contact fields. Identity, registration time and the
    /// active flag are left untouched.
    pub fn apply_update(&mut self, data: CustomerData) {
        self.name = data.name;
        self.email = data.email;
        self.phone = data.phone;
        self.address = data.address;
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn collection() -> &'static str {
        "customers"
    }

    fn entity_name() -> &'static str {
        "Customer"
    }

    fn id(&self) -> Option<CustomerId> {
        self.id
    }

    fn set_id(&mut self, id: CustomerId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_is_active() {
        let customer = Customer::new(CustomerData::new("Ana Julia", "ana.j@email.com"));
        assert!(customer.is_active());
        assert!(customer.id.is_none());
    }

    #[test]
    fn test_registered_at_is_kept_when_given() {
        let at = Utc::now() - chrono::Duration::days(3);
        let data = CustomerData {
            registered_at: Some(at),
            ..CustomerData::new("Ana Julia", "ana.j@email.com")
        };
        assert_eq!(Customer::new(data).registered_at, at);
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let mut customer = Customer::new(CustomerData::new("Bruno Costa", "bruno@email.com"));
        customer.deactivate();
        customer.deactivate();
        assert!(!customer.is_active());
    }

    #[test]
    fn test_apply_update_keeps_active_flag_and_registration() {
        let mut customer = Customer::new(CustomerData::new("Carla", "carla@email.com"));
        let registered_at = customer.registered_at;

        customer.apply_update(
            CustomerData::new("Carla Dias", "carla.d@email.com").with_phone("(11) 9999-0000"),
        );

        assert_eq!(customer.name, "Carla Dias");
        assert_eq!(customer.phone, "(11) 9999-0000");
        assert_eq!(customer.registered_at, registered_at);
        assert!(customer.is_active());
    }

    #[test]
    fn test_validate_data() {
        assert!(CustomerData::new("Al", "a@x.com").validate().is_ok());
        assert!(CustomerData::new("A", "a@x.com").validate().is_err());
        assert_eq!(
            CustomerData::new("Al", "").validate(),
            Err(ValidationError::Empty("Email"))
        );
    }
}
