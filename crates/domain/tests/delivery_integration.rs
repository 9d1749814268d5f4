//! Integration tests for the delivery domain services.
//!
//! These tests drive the four services against one shared in-memory store
//! and verify the cross-entity rules and the order lifecycle end to end.

use domain::{
    CustomerData, CustomerService, DomainError, Money, OrderData, OrderError, OrderService,
    OrderStatus, ProductData, ProductService, RestaurantData, RestaurantService, ValidationError,
};
use store::InMemoryRecordStore;

struct Marketplace {
    store: InMemoryRecordStore,
    customers: CustomerService<InMemoryRecordStore>,
    restaurants: RestaurantService<InMemoryRecordStore>,
    products: ProductService<InMemoryRecordStore>,
    orders: OrderService<InMemoryRecordStore>,
}

/// Helper to create all services over one store
fn create_marketplace() -> Marketplace {
    let store = InMemoryRecordStore::new();
    Marketplace {
        customers: CustomerService::new(store.clone()),
        restaurants: RestaurantService::new(store.clone()),
        products: ProductService::new(store.clone()),
        orders: OrderService::new(store.clone()),
        store,
    }
}

async fn seed_order(m: &Marketplace, status: &str) -> domain::OrderId {
    let customer = m
        .customers
        .register(CustomerData::new("Ana Julia", format!("ana.{status}@email.com")))
        .await
        .unwrap();
    let restaurant = m
        .restaurants
        .register(RestaurantData::new("Sabor da India", format!("(11) {status}")))
        .await
        .unwrap();

    m.orders
        .register(
            OrderData::new(
                "PED-001",
                customer.id.unwrap(),
                restaurant.id.unwrap(),
                60.5,
                "1x Frango Tikka Masala, 1x Samosa (2 unidades)",
            )
            .with_status(status),
        )
        .await
        .unwrap()
        .id
        .unwrap()
}

mod customers {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_fails_without_writing() {
        let m = create_marketplace();
        m.customers
            .register(CustomerData::new("Ana Julia", "ana.j@email.com"))
            .await
            .unwrap();
        let records_before = m.store.record_count().await;

        let result = m
            .customers
            .register(CustomerData::new("Ana Clara", "ana.j@email.com"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::EmailTaken))
        ));
        assert_eq!(m.store.record_count().await, records_before);
    }

    #[tokio::test]
    async fn register_duplicate_deactivate_then_update() {
        let m = create_marketplace();

        let al = m
            .customers
            .register(CustomerData::new("Al", "a@x.com"))
            .await
            .unwrap();
        assert!(al.is_active());
        let id = al.id.unwrap();

        let duplicate = m
            .customers
            .register(CustomerData::new("Alan", "a@x.com"))
            .await;
        assert!(duplicate.is_err());
        assert_eq!(m.customers.get(id).await.unwrap(), al);

        let deactivated = m.customers.deactivate(id).await.unwrap();
        assert!(!deactivated.is_active());

        let update = m
            .customers
            .update(id, CustomerData::new("Al Bundy", "a@x.com"))
            .await;
        assert!(matches!(
            update,
            Err(DomainError::Validation(ValidationError::InactiveCustomer))
        ));
        assert_eq!(m.customers.get(id).await.unwrap().name, "Al");
    }
}

mod products {
    use super::*;

    #[tokio::test]
    async fn inactive_restaurant_rejects_new_products() {
        let m = create_marketplace();
        let restaurant = m
            .restaurants
            .register(RestaurantData::new("O Rei do Pastel", "(11) 5555-6666"))
            .await
            .unwrap();
        let restaurant_id = restaurant.id.unwrap();
        m.restaurants.set_offline(restaurant_id).await.unwrap();

        let result = m
            .products
            .register(ProductData::new("Pastel de Carne", 8.0, "Pastel").for_restaurant(restaurant_id))
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "cannot add products to inactive restaurant");
        assert!(m.products.search_by_restaurant(restaurant_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inverted_price_range_fails_regardless_of_data() {
        let m = create_marketplace();

        let result = m.products.search_by_price_range(Some(10.0), Some(5.0)).await;

        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::InvertedPriceRange))
        ));
    }
}

mod order_lifecycle {
    use super::*;

    #[tokio::test]
    async fn dedicated_actions_succeed_only_from_their_source_status() {
        let cases = [
            ("PENDING", [true, false, true]),
            ("CONFIRMED", [false, true, true]),
            ("DELIVERED", [false, false, false]),
            ("CANCELLED", [false, false, false]),
        ];

        for (status, [confirm_ok, deliver_ok, cancel_ok]) in cases {
            let start: OrderStatus = status.parse().unwrap();

            for (action, expected_ok) in [("confirm", confirm_ok), ("deliver", deliver_ok), ("cancel", cancel_ok)] {
                let m = create_marketplace();
                let id = seed_order(&m, status).await;

                let result = match action {
                    "confirm" => m.orders.confirm(id).await,
                    "deliver" => m.orders.deliver(id).await,
                    _ => m.orders.cancel(id).await,
                };

                assert_eq!(result.is_ok(), expected_ok, "{action} from {status}");
                if !expected_ok {
                    assert!(matches!(
                        result,
                        Err(DomainError::Order(OrderError::InvalidState { .. }))
                    ));
                    assert_eq!(m.orders.get(id).await.unwrap().status(), start);
                }
            }
        }
    }

    #[tokio::test]
    async fn update_status_to_same_status_is_idempotent() {
        let m = create_marketplace();
        let id = seed_order(&m, "CONFIRMED").await;
        let before = m.orders.get(id).await.unwrap();

        for _ in 0..3 {
            let order = m.orders.update_status(id, "confirmed").await.unwrap();
            assert_eq!(order, before);
        }
        assert_eq!(m.orders.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn terminal_orders_cannot_change_status() {
        let m = create_marketplace();
        let id = seed_order(&m, "PENDING").await;
        m.orders.update_status(id, "CONFIRMED").await.unwrap();
        m.orders.update_status(id, "DELIVERED").await.unwrap();

        for next in ["PENDING", "CONFIRMED", "CANCELLED"] {
            let result = m.orders.update_status(id, next).await;
            assert!(matches!(
                result,
                Err(DomainError::Order(OrderError::InvalidStateTransition {
                    from: OrderStatus::Delivered,
                    ..
                }))
            ));
        }
    }

    #[tokio::test]
    async fn total_of_available_products() {
        let m = create_marketplace();
        let restaurant = m
            .restaurants
            .register(
                RestaurantData::new("Sabor da India", "(11) 4444-5555")
                    .with_category("Indiana")
                    .with_delivery_fee(7.0),
            )
            .await
            .unwrap();
        let restaurant_id = restaurant.id.unwrap();
        let tikka = m
            .products
            .register_for_restaurant(
                restaurant_id,
                ProductData::new("Frango Tikka Masala", 45.50, "Prato Principal"),
            )
            .await
            .unwrap();
        let samosa = m
            .products
            .register_for_restaurant(
                restaurant_id,
                ProductData::new("Samosa (2 unidades)", 15.00, "Entrada"),
            )
            .await
            .unwrap();
        let ids = [tikka.id.unwrap(), samosa.id.unwrap()];

        let total = m.orders.calculate_order_total(&ids).await.unwrap();
        assert_eq!(total, Money::from_cents(6050));

        m.products.make_unavailable(ids[1]).await.unwrap();
        let result = m.orders.calculate_order_total(&ids).await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::ProductUnavailable(name)))
                if name == "Samosa (2 unidades)"
        ));
    }
}
