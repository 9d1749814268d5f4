//! HTTP route handlers.

pub mod customers;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod restaurants;

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use domain::{CustomerService, OrderService, ProductService, RestaurantService};
use serde::Deserialize;
use store::RecordStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecordStore> {
    pub customers: CustomerService<S>,
    pub restaurants: RestaurantService<S>,
    pub products: ProductService<S>,
    pub orders: OrderService<S>,
}

impl<S: RecordStore + Clone> AppState<S> {
    /// Builds every domain service over one shared store.
    pub fn new(store: S) -> Self {
        Self {
            customers: CustomerService::new(store.clone()),
            restaurants: RestaurantService::new(store.clone()),
            products: ProductService::new(store.clone()),
            orders: OrderService::new(store),
        }
    }
}

/// Embedded reference to another entity, as in `"restaurant": { "id": "..." }`.
#[derive(Debug, Deserialize)]
pub struct EntityRef<I> {
    pub id: I,
}

/// Query parameters of the date-range searches.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub start_date: String,
    pub end_date: String,
}

impl DateRangeParams {
    pub fn parse(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
        Ok((parse_datetime(&self.start_date)?, parse_datetime(&self.end_date)?))
    }
}

/// Parses a path identifier into one of the typed entity ids.
pub fn parse_id<T>(id: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = uuid::Error>,
{
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}

/// Accepts RFC 3339 timestamps as well as offset-less ISO date-times, which
/// are read as UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ApiError::BadRequest(format!("Invalid date-time: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::CustomerId;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_datetime("2024-05-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2024-05-01T14:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-05-01T12:30:00").unwrap(), expected);
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_parse_id() {
        let id = CustomerId::new();
        let parsed: CustomerId = parse_id(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(matches!(
            parse_id::<CustomerId>("42"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
