//! Customer service.

use store::RecordStore;
use tokio::sync::Mutex;

use crate::error::DomainError;
use crate::repository::Repository;
use crate::validation::ValidationError;
use crate::value_objects::CustomerId;

use super::{Customer, CustomerData};

/// Service for managing customers.
///
/// Mutations are serialized so the e-mail uniqueness check and the write
/// happen as one unit.
pub struct CustomerService<S: RecordStore> {
    customers: Repository<S, Customer>,
    writes: Mutex<()>,
}

impl<S: RecordStore> CustomerService<S> {
    /// Creates a new customer service with the given record store.
    pub fn new(store: S) -> Self {
        Self {
            customers: Repository::new(store),
            writes: Mutex::new(()),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &Repository<S, Customer> {
        &self.customers
    }

    /// Registers a new, active customer.
    #[tracing::instrument(skip(self))]
    pub async fn register(&self, data: CustomerData) -> Result<Customer, DomainError> {
        let data = data.normalized();
        data.validate()?;

        let _guard = self.writes.lock().await;
        if self.email_in_use(&data.email).await? {
            return Err(ValidationError::EmailTaken.into());
        }

        let customer = self.customers.save(Customer::new(data)).await?;
        metrics::counter!("customers_registered_total").increment(1);
        tracing::info!(customer_id = ?customer.id, "customer registered");
        Ok(customer)
    }

    /// Lists active customers in registration order.
    #[tracing::instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<Customer>, DomainError> {
        self.customers
            .find(self.customers.query().eq("active", true))
            .await
    }

    /// Loads a customer, failing with NotFound if absent.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: CustomerId) -> Result<Customer, DomainError> {
        self.customers.get(id).await
    }

    /// Loads a customer, returning None if absent.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DomainError> {
        self.customers.find_by_id(id).await
    }

    /// Updates an active customer's contact fields.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: CustomerId,
        data: CustomerData,
    ) -> Result<Customer, DomainError> {
        let _guard = self.writes.lock().await;
        let mut customer = self.customers.get(id).await?;

        if !customer.is_active() {
            return Err(ValidationError::InactiveCustomer.into());
        }
        let data = data.normalized();
        data.validate()?;

        if data.email != customer.email {
            let holder = self
                .customers
                .find_one(self.customers.query().eq("email", data.email.as_str()))
                .await?;
            if holder.is_some_and(|other| other.id != Some(id)) {
                return Err(ValidationError::EmailTaken.into());
            }
        }

        customer.apply_update(data);
        let customer = self.customers.save(customer).await?;
        tracing::info!(customer_id = %id, "customer updated");
        Ok(customer)
    }

    /// Soft-deletes a customer.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate(&self, id: CustomerId) -> Result<Customer, DomainError> {
        let _guard = self.writes.lock().await;
        let mut customer = self.customers.get(id).await?;

        customer.deactivate();
        let customer = self.customers.save(customer).await?;
        tracing::info!(customer_id = %id, "customer deactivated");
        Ok(customer)
    }

    /// Finds active customers whose name contains `name`, ignoring case.
    #[tracing::instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Customer>, DomainError> {
        self.customers
            .find(
                self.customers
                    .query()
                    .eq("active", true)
                    .contains_ignore_case("name", name),
            )
            .await
    }

    /// Finds the customer registered with exactly this e-mail address.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        self.customers
            .find_one(self.customers.query().eq("email", email.trim()))
            .await
    }

    async fn email_in_use(&self, email: &str) -> Result<bool, DomainError> {
        self.customers
            .exists(self.customers.query().eq("email", email))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::InMemoryRecordStore;

    fn service() -> CustomerService<InMemoryRecordStore> {
        CustomerService::new(InMemoryRecordStore::new())
    }

    #[tokio::test]
    async fn test_register_customer() {
        let service = service();

        let customer = service
            .register(CustomerData::new("Ana Julia", "ana.j@email.com"))
            .await
            .unwrap();

        assert!(customer.id.is_some());
        assert!(customer.is_active());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_name() {
        let service = service();

        let result = service
            .register(CustomerData::new("A", "a@x.com"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::TooShort { .. }))
        ));
        assert_eq!(service.repository().store().record_count().await, 0);
    }

    #[tokio::test]
    async fn test_email_is_unique_among_inactive_customers() {
        let service = service();
        let first = service
            .register(CustomerData::new("Bruno Costa", "bruno.costa@email.com"))
            .await
            .unwrap();
        service.deactivate(first.id.unwrap()).await.unwrap();

        let result = service
            .register(CustomerData::new("Bruno C", "bruno.costa@email.com"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::EmailTaken))
        ));
    }

    #[tokio::test]
    async fn test_update_changes_contact_fields() {
        let service = service();
        let customer = service
            .register(CustomerData::new("Carla", "carla@email.com"))
            .await
            .unwrap();
        let id = customer.id.unwrap();

        let updated = service
            .update(
                id,
                CustomerData::new("Carla Dias", "carla.d@email.com").with_address("Rua A, 10"),
            )
            .await
            .unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.email, "carla.d@email.com");
        assert_eq!(updated.address, "Rua A, 10");
        assert!(updated.is_active());
    }

    #[tokio::test]
    async fn test_update_keeping_own_email_is_allowed() {
        let service = service();
        let customer = service
            .register(CustomerData::new("Carla", "carla@email.com"))
            .await
            .unwrap();

        let updated = service
            .update(
                customer.id.unwrap(),
                CustomerData::new("Carla Dias", "carla@email.com"),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Carla Dias");
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_another_customer() {
        let service = service();
        service
            .register(CustomerData::new("Ana Julia", "ana.j@email.com"))
            .await
            .unwrap();
        let bruno = service
            .register(CustomerData::new("Bruno Costa", "bruno@email.com"))
            .await
            .unwrap();

        let result = service
            .update(
                bruno.id.unwrap(),
                CustomerData::new("Bruno Costa", "ana.j@email.com"),
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::EmailTaken))
        ));
    }

    #[tokio::test]
    async fn test_padded_email_is_stored_trimmed_and_stays_unique() {
        let service = service();
        let ana = service
            .register(CustomerData::new("Ana Julia", "  ana.j@email.com "))
            .await
            .unwrap();
        assert_eq!(ana.email, "ana.j@email.com");

        let result = service
            .register(CustomerData::new("Ana J", "ana.j@email.com "))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::EmailTaken))
        ));

        let bruno = service
            .register(CustomerData::new("Bruno Costa", "bruno@email.com"))
            .await
            .unwrap();
        let result = service
            .update(
                bruno.id.unwrap(),
                CustomerData::new("Bruno Costa", " ana.j@email.com"),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::EmailTaken))
        ));
        assert!(
            service
                .find_by_email("ana.j@email.com ")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let service = service();

        let result = service
            .update(CustomerId::new(), CustomerData::new("Al", "a@x.com"))
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_deactivate_twice_is_allowed() {
        let service = service();
        let customer = service
            .register(CustomerData::new("Al", "a@x.com"))
            .await
            .unwrap();
        let id = customer.id.unwrap();

        service.deactivate(id).await.unwrap();
        let again = service.deactivate(id).await.unwrap();

        assert!(!again.is_active());
        assert!(service.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_name_skips_inactive() {
        let service = service();
        let ana = service
            .register(CustomerData::new("Ana Julia", "ana.j@email.com"))
            .await
            .unwrap();
        service
            .register(CustomerData::new("Mariana", "mari@email.com"))
            .await
            .unwrap();
        service.deactivate(ana.id.unwrap()).await.unwrap();

        let found = service.search_by_name("ANA").await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Mariana");
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let service = service();
        service
            .register(CustomerData::new("Ana Julia", "ana.j@email.com"))
            .await
            .unwrap();

        assert!(
            service
                .find_by_email("ana.j@email.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(service.find_by_email("x@email.com").await.unwrap().is_none());
    }
}
