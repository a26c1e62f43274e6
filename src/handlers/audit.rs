//! Admin read and retention paths over the audit trail.

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::parse_uuid;
use crate::models::audit::{ActionStat, AuditLogEntry, AuditLogFilters};
use crate::pagination::{PageMeta, PageRequest};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Audit pages default to 50 entries, not the catalog default.
const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditListParams {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub resource: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub days: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserLogParams {
    pub limit: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AuditListParams>,
) -> ApiResult<Vec<AuditLogEntry>> {
    let user_id = match &params.user_id {
        Some(raw) => Some(parse_uuid(raw, "user")?),
        None => None,
    };
    let filters = AuditLogFilters {
        user_id,
        action: params.action.clone(),
        resource: params.resource.clone(),
    };

    let page = PageRequest::with_default_limit(
        params.page.as_deref(),
        params.limit.as_deref(),
        DEFAULT_PAGE_SIZE,
    );

    let (logs, total) = state.audit.list(&filters, &page).await?;
    Ok(ApiResponse::success(logs).with_pagination(PageMeta::new(&page, total)))
}

pub async fn user_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserLogParams>,
) -> ApiResult<Vec<AuditLogEntry>> {
    let id = parse_uuid(&id, "user")?;
    let limit = params
        .limit
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|l| *l >= 1)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(crate::config::config().pagination.max_limit);

    let logs = state.audit.user_logs(id, limit).await?;
    Ok(ApiResponse::success(logs))
}

pub async fn action_stats(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> ApiResult<Vec<ActionStat>> {
    let days = parse_days(params.days.as_deref(), 7)?;
    let stats = state.audit.action_stats(days).await?;
    Ok(ApiResponse::success(stats))
}

pub async fn purge(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> ApiResult<Value> {
    let days = parse_days(params.days.as_deref(), 90)?;
    let deleted = state.audit.purge_older_than(days).await?;
    Ok(ApiResponse::success(json!({ "deleted": deleted }))
        .with_message(format!("{} audit log entries deleted", deleted)))
}

fn parse_days(raw: Option<&str>, default: i32) -> Result<i32, ApiError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| ApiError::bad_request("days must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_limit_falls_back_to_audit_default() {
        let page = PageRequest::with_default_limit(None, Some("abc"), DEFAULT_PAGE_SIZE);
        assert_eq!(page.limit, 50);
        let page = PageRequest::with_default_limit(None, None, DEFAULT_PAGE_SIZE);
        assert_eq!(page.limit, 50);
    }

    #[test]
    fn day_windows_parse_with_defaults() {
        assert_eq!(parse_days(None, 7).unwrap(), 7);
        assert_eq!(parse_days(Some("30"), 7).unwrap(), 30);
        assert!(parse_days(Some("0"), 7).is_err());
        assert!(parse_days(Some("-5"), 90).is_err());
        assert!(parse_days(Some("soon"), 90).is_err());
    }
}
