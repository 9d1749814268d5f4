//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container and need a Docker daemon.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use serial_test::serial;
use sqlx::PgPool;
use store::{PostgresRecordStore, Record, RecordId, RecordQuery, RecordStore, RecordStoreExt};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresRecordStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and a cleared table
async fn get_test_store() -> PostgresRecordStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear table for test isolation
    sqlx::query("TRUNCATE TABLE records")
        .execute(&pool)
        .await
        .unwrap();

    PostgresRecordStore::new(pool)
}

fn product(name: &str, price: i64, available: bool) -> Record {
    Record::new(
        RecordId::new(),
        "products",
        serde_json::json!({
            "name": name,
            "price": price,
            "available": available,
        }),
    )
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn upsert_and_get_record() {
    let store = get_test_store().await;
    let record = product("Samosa", 1500, true);
    let id = record.id;

    store.upsert(record).await.unwrap();

    let stored = store.get("products", id).await.unwrap().unwrap();
    assert_eq!(stored.payload["name"], "Samosa");
    assert!(store.get("orders", id).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn upsert_replaces_payload_and_keeps_order() {
    let store = get_test_store().await;
    let first = product("Pastel de Carne", 800, true);
    let first_id = first.id;
    store.upsert(first).await.unwrap();
    store.upsert(product("Pastel de Queijo", 800, true)).await.unwrap();

    let mut changed = store.get("products", first_id).await.unwrap().unwrap();
    changed.payload["available"] = serde_json::json!(false);
    store.upsert(changed).await.unwrap();

    let all = store.query(RecordQuery::collection("products")).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first_id);
    assert_eq!(all[0].payload["available"], false);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn delete_record() {
    let store = get_test_store().await;
    let record = product("Caldo de Cana", 1000, true);
    let id = record.id;
    store.upsert(record).await.unwrap();

    assert!(store.delete("products", id).await.unwrap());
    assert!(!store.delete("products", id).await.unwrap());
    assert_eq!(store.count("products").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn query_filters_compile_to_jsonb() {
    let store = get_test_store().await;
    store.upsert(product("Pastel de Carne", 800, true)).await.unwrap();
    store.upsert(product("Pastel de Queijo", 850, false)).await.unwrap();
    store.upsert(product("Frango Tikka Masala", 4550, true)).await.unwrap();

    let available_pastel = store
        .query(
            RecordQuery::collection("products")
                .eq("available", true)
                .contains_ignore_case("name", "PASTEL"),
        )
        .await
        .unwrap();
    assert_eq!(available_pastel.len(), 1);
    assert_eq!(available_pastel[0].payload["name"], "Pastel de Carne");

    let mid_priced = store
        .query(RecordQuery::collection("products").number_between("price", 800.0, 1000.0))
        .await
        .unwrap();
    assert_eq!(mid_priced.len(), 2);

    assert!(
        store
            .exists(RecordQuery::collection("products").eq("name", "Frango Tikka Masala"))
            .await
            .unwrap()
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn query_by_timestamp_range() {
    let store = get_test_store().await;
    let now = Utc::now();
    let recent = Record::new(
        RecordId::new(),
        "orders",
        serde_json::json!({"order_date": now.to_rfc3339()}),
    );
    let old = Record::new(
        RecordId::new(),
        "orders",
        serde_json::json!({"order_date": (now - Duration::days(10)).to_rfc3339()}),
    );
    store.upsert(recent).await.unwrap();
    store.upsert(old).await.unwrap();

    let last_day = store
        .query(RecordQuery::collection("orders").timestamp_between(
            "order_date",
            now - Duration::days(1),
            now + Duration::days(1),
        ))
        .await
        .unwrap();

    assert_eq!(last_day.len(), 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires a Docker daemon"]
async fn query_with_limit_and_offset() {
    let store = get_test_store().await;
    for i in 0..5 {
        store
            .upsert(product(&format!("Item {i}"), 100 + i, true))
            .await
            .unwrap();
    }

    let page = store
        .query(RecordQuery::collection("products").offset(2).limit(2))
        .await
        .unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].payload["name"], "Item 2");
    assert_eq!(page[1].payload["name"], "Item 3");
}
