use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Filter, Record, RecordId, RecordQuery, Result,
    store::RecordStore,
};

const RECORD_COLUMNS: &str = "id, collection, payload, created_at, updated_at";

/// PostgreSQL-backed record store implementation.
///
/// All collections share one `records` table holding JSONB payloads;
/// a `BIGSERIAL` column preserves insertion order.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a new PostgreSQL record store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_record(row: PgRow) -> Result<Record> {
        Ok(Record {
            id: RecordId::from_uuid(row.try_get::<Uuid, _>("id")?),
            collection: row.try_get("collection")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Appends the SQL condition for a filter, numbering its placeholders from
/// `param_count`.
fn push_filter_sql(sql: &mut String, filter: &Filter, param_count: &mut usize) {
    let field = *param_count + 1;
    match filter {
        Filter::Equals { .. } => {
            *param_count += 2;
            sql.push_str(&format!(" AND payload -> ${field} = ${}", field + 1));
        }
        Filter::ContainsIgnoreCase { .. } => {
            *param_count += 2;
            sql.push_str(&format!(
                " AND strpos(lower(payload ->> ${field}), lower(${})) > 0",
                field + 1
            ));
        }
        Filter::NumberBetween { .. } => {
            *param_count += 3;
            sql.push_str(&format!(
                " AND jsonb_typeof(payload -> ${field}) = 'number' AND (payload ->> ${field})::double precision BETWEEN ${} AND ${}",
                field + 1,
                field + 2
            ));
        }
        Filter::TimestampBetween { .. } => {
            *param_count += 3;
            sql.push_str(&format!(
                " AND jsonb_typeof(payload -> ${field}) = 'string' AND (payload ->> ${field})::timestamptz BETWEEN ${} AND ${}",
                field + 1,
                field + 2
            ));
        }
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn upsert(&self, record: Record) -> Result<Record> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO records (id, collection, payload, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                payload = EXCLUDED.payload,
                updated_at = now()
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(record.id.as_uuid())
        .bind(&record.collection)
        .bind(&record.payload)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_record(row)
    }

    async fn get(&self, collection: &str, id: RecordId) -> Result<Option<Record>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE collection = $1 AND id = $2"
        ))
        .bind(collection)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_record).transpose()
    }

    async fn delete(&self, collection: &str, id: RecordId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, query: RecordQuery) -> Result<Vec<Record>> {
        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM records WHERE collection = $1");
        let mut param_count = 1;

        // Build dynamic query
        for filter in &query.filters {
            push_filter_sql(&mut sql, filter, &mut param_count);
        }

        sql.push_str(" ORDER BY seq ASC");

        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }
        if query.offset.is_some() {
            param_count += 1;
            sql.push_str(&format!(" OFFSET ${param_count}"));
        }

        // Build and execute query with parameters
        let mut sqlx_query = sqlx::query(&sql).bind(query.collection);

        for filter in query.filters {
            sqlx_query = match filter {
                Filter::Equals { field, value } => sqlx_query.bind(field).bind(value),
                Filter::ContainsIgnoreCase { field, needle } => {
                    sqlx_query.bind(field).bind(needle)
                }
                Filter::NumberBetween { field, min, max } => {
                    sqlx_query.bind(field).bind(min).bind(max)
                }
                Filter::TimestampBetween { field, from, to } => {
                    sqlx_query.bind(field).bind(from).bind(to)
                }
            };
        }
        if let Some(limit) = query.limit {
            sqlx_query = sqlx_query.bind(limit as i64);
        }
        if let Some(offset) = query.offset {
            sqlx_query = sqlx_query.bind(offset as i64);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        tracing::debug!(rows = rows.len(), "record query executed");
        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE collection = $1")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_placeholders_are_numbered_sequentially() {
        let mut sql = String::new();
        let mut param_count = 1;

        push_filter_sql(
            &mut sql,
            &Filter::Equals {
                field: "active".into(),
                value: serde_json::json!(true),
            },
            &mut param_count,
        );
        push_filter_sql(
            &mut sql,
            &Filter::NumberBetween {
                field: "price".into(),
                min: 0.0,
                max: 10.0,
            },
            &mut param_count,
        );

        assert_eq!(param_count, 6);
        assert!(sql.contains("payload -> $2 = $3"));
        assert!(sql.contains("BETWEEN $5 AND $6"));
    }

    #[test]
    fn contains_filter_uses_case_insensitive_position() {
        let mut sql = String::new();
        let mut param_count = 1;

        push_filter_sql(
            &mut sql,
            &Filter::ContainsIgnoreCase {
                field: "name".into(),
                needle: "pastel".into(),
            },
            &mut param_count,
        );

        assert_eq!(param_count, 3);
        assert!(sql.contains("strpos(lower(payload ->> $2), lower($3)) > 0"));
    }
}
