//! Sample data loaded at startup when `SEED_DATA` is enabled.
//!
//! Everything goes through the domain services, so the sample set obeys the
//! same validation rules as client requests.

use chrono::{Duration, Utc};
use domain::{CustomerData, DomainError, OrderData, ProductData, RestaurantData};
use store::RecordStore;

use crate::routes::AppState;

/// Counts of the records created by [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub customers: usize,
    pub restaurants: usize,
    pub products: usize,
    pub orders: usize,
}

/// Registers 3 customers, 2 restaurants, 5 products and 2 orders.
#[tracing::instrument(skip(state))]
pub async fn load<S: RecordStore>(state: &AppState<S>) -> Result<SeedSummary, DomainError> {
    tracing::info!("loading sample data");

    let customers = [
        CustomerData::new("Ana Julia", "ana.j@email.com")
            .with_phone("(11) 98888-1111")
            .with_address("Rua das Laranjeiras, 10"),
        CustomerData::new("Bruno Costa", "bruno.costa@email.com")
            .with_phone("(21) 97777-2222")
            .with_address("Av. Copacabana, 20"),
        CustomerData::new("Carla Dias", "carla.d@email.com")
            .with_phone("(31) 96666-3333")
            .with_address("Praça da Liberdade, 30"),
    ];
    let mut customer_ids = Vec::with_capacity(customers.len());
    for data in customers {
        let customer = state.customers.register(data).await?;
        customer_ids.push(saved(customer.id, "Customer")?);
    }
    tracing::info!(count = customer_ids.len(), "customers saved");

    let india = state
        .restaurants
        .register(
            RestaurantData::new("Sabor da India", "(11) 4444-5555")
                .with_category("Indiana")
                .with_address("Rua dos Timbiras, 100")
                .with_delivery_fee(7.0)
                .with_rating(4.8),
        )
        .await?;
    let pastel = state
        .restaurants
        .register(
            RestaurantData::new("O Rei do Pastel", "(11) 5555-6666")
                .with_category("Lanches")
                .with_address("Av. Afonso Pena, 200")
                .with_delivery_fee(3.0)
                .with_rating(4.5),
        )
        .await?;
    let india_id = saved(india.id, "Restaurant")?;
    let pastel_id = saved(pastel.id, "Restaurant")?;
    tracing::info!(count = 2, "restaurants saved");

    let products = [
        (
            india_id,
            ProductData::new("Frango Tikka Masala", 45.50, "Prato Principal")
                .with_description("Frango ao molho cremoso de especiarias"),
        ),
        (
            india_id,
            ProductData::new("Samosa (2 unidades)", 15.00, "Entrada")
                .with_description("Pastel indiano recheado com batata e ervilha"),
        ),
        (
            pastel_id,
            ProductData::new("Pastel de Carne", 8.00, "Pastel")
                .with_description("Pastel frito na hora com carne moída"),
        ),
        (
            pastel_id,
            ProductData::new("Pastel de Queijo", 8.00, "Pastel")
                .with_description("Pastel frito na hora com queijo mussarela"),
        ),
        (
            pastel_id,
            ProductData::new("Caldo de Cana 500ml", 10.00, "Bebida")
                .with_description("Caldo de cana puro"),
        ),
    ];
    let product_count = products.len();
    for (restaurant_id, data) in products {
        state
            .products
            .register_for_restaurant(restaurant_id, data)
            .await?;
    }
    tracing::info!(count = product_count, "products saved");

    let now = Utc::now();
    let orders = [
        OrderData::new(
            "PED-001",
            customer_ids[0],
            india_id,
            60.50,
            "1x Frango Tikka Masala, 1x Samosa (2 unidades)",
        )
        .with_status("PENDING")
        .with_order_date(now - Duration::hours(1)),
        OrderData::new(
            "PED-002",
            customer_ids[1],
            pastel_id,
            26.00,
            "1x Pastel de Carne, 1x Pastel de Queijo, 1x Caldo de Cana 500ml",
        )
        .with_status("CONFIRMED")
        .with_order_date(now),
    ];
    let order_count = orders.len();
    for data in orders {
        state.orders.register(data).await?;
    }
    tracing::info!(count = order_count, "orders saved");

    let summary = SeedSummary {
        customers: customer_ids.len(),
        restaurants: 2,
        products: product_count,
        orders: order_count,
    };
    tracing::info!(?summary, "sample data loaded");
    Ok(summary)
}

fn saved<I>(id: Option<I>, entity: &'static str) -> Result<I, DomainError> {
    id.ok_or_else(|| DomainError::not_found(entity, "<unsaved>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, OrderStatus};
    use store::InMemoryRecordStore;

    #[tokio::test]
    async fn test_load_registers_sample_set() {
        let state = AppState::new(InMemoryRecordStore::new());

        let summary = load(&state).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                customers: 3,
                restaurants: 2,
                products: 5,
                orders: 2,
            }
        );
        assert_eq!(state.customers.list_active().await.unwrap().len(), 3);
        assert_eq!(state.restaurants.list_active().await.unwrap().len(), 2);
        assert_eq!(state.products.list_available().await.unwrap().len(), 5);

        let orders = state.orders.list_all().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_number, "PED-001");
        assert_eq!(orders[0].status(), OrderStatus::Pending);
        assert_eq!(orders[0].total_value, Money::from_cents(6050));
        assert_eq!(orders[1].order_number, "PED-002");
        assert_eq!(orders[1].status(), OrderStatus::Confirmed);
        assert_eq!(orders[1].total_value, Money::from_cents(2600));
    }

    #[tokio::test]
    async fn test_load_twice_fails_on_duplicate_email() {
        let state = AppState::new(InMemoryRecordStore::new());
        load(&state).await.unwrap();

        let err = load(&state).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already exists");
    }
}
