//! Best-effort audit trail over an append-only table.
//!
//! Writes never fail the triggering request: any insert error is logged and
//! dropped. Reads are ordinary filtered/paginated queries.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::audit::{ActionStat, AuditLogEntry, AuditLogFilters, NewAuditLog};
use crate::pagination::PageRequest;

#[derive(Clone)]
pub struct AuditLogService {
    pool: PgPool,
}

impl AuditLogService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fire-and-forget append. Failures are surfaced on the diagnostic
    /// channel only.
    pub async fn log(&self, entry: NewAuditLog) {
        let result = sqlx::query(
            "INSERT INTO audit_logs (user_id, action, resource, resource_id, details, ip_address) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.resource)
        .bind(&entry.resource_id)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            tracing::warn!(
                action = %entry.action,
                resource = %entry.resource,
                "Audit log write failed: {}",
                err
            );
        }
    }

    /// Filtered, newest-first page of the trail plus the matching total.
    pub async fn list(
        &self,
        filters: &AuditLogFilters,
        page: &PageRequest,
    ) -> Result<(Vec<AuditLogEntry>, i64), ApiError> {
        let mut conditions = Vec::new();
        let mut index = 0;
        let mut next = |column: &str| {
            index += 1;
            format!("{} = ${}", column, index)
        };

        if filters.user_id.is_some() {
            conditions.push(next("user_id"));
        }
        if filters.action.is_some() {
            conditions.push(next("action"));
        }
        if filters.resource.is_some() {
            conditions.push(next("resource"));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let select_sql = format!(
            "SELECT * FROM audit_logs{} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            clause,
            index + 1,
            index + 2
        );
        let count_sql = format!("SELECT COUNT(*) FROM audit_logs{}", clause);

        let mut select = sqlx::query_as::<_, AuditLogEntry>(&select_sql);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(user_id) = filters.user_id {
            select = select.bind(user_id);
            count = count.bind(user_id);
        }
        if let Some(action) = &filters.action {
            select = select.bind(action);
            count = count.bind(action);
        }
        if let Some(resource) = &filters.resource {
            select = select.bind(resource);
            count = count.bind(resource);
        }
        let select = select.bind(page.limit).bind(page.offset());

        let (rows, total) =
            tokio::try_join!(select.fetch_all(&self.pool), count.fetch_one(&self.pool))?;
        Ok((rows, total))
    }

    /// Most recent entries for one user.
    pub async fn user_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AuditLogEntry>, ApiError> {
        let rows = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_logs WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Per-action, per-day counts over the trailing window.
    pub async fn action_stats(&self, days: i32) -> Result<Vec<ActionStat>, ApiError> {
        let rows = sqlx::query_as::<_, ActionStat>(
            "SELECT action, COUNT(*) AS count, created_at::date AS date \
             FROM audit_logs \
             WHERE created_at >= now() - make_interval(days => $1) \
             GROUP BY action, created_at::date \
             ORDER BY date DESC, count DESC",
        )
        .bind(days)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Retention purge: delete entries older than the window, returning how
    /// many were removed.
    pub async fn purge_older_than(&self, days: i32) -> Result<u64, ApiError> {
        let result =
            sqlx::query("DELETE FROM audit_logs WHERE created_at < now() - make_interval(days => $1)")
                .bind(days)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
