//! Catalog endpoints. Handlers shape requests and responses; the business
//! logic lives in `GameService`.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::filter::{resolve_sort_column, GameFilters};
use crate::handlers::parse_uuid;
use crate::models::game::{Game, GameInput, GameUpdate};
use crate::pagination::{PageMeta, PageRequest, SortOrder};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Raw pagination/sort query-string values. Everything is optional and
/// parsed permissively: junk falls back to the named defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub min_rating: Option<String>,
    pub max_price: Option<String>,
    pub in_stock: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl SearchParams {
    fn filters(&self) -> GameFilters {
        GameFilters {
            keyword: self.keyword.clone(),
            genre: self.genre.clone(),
            platform: self.platform.clone(),
            min_rating: self.min_rating.as_deref().and_then(|v| v.trim().parse().ok()),
            max_price: self.max_price.as_deref().and_then(|v| v.trim().parse().ok()),
            in_stock: self.in_stock.as_deref().map(|v| v == "true"),
            min_year: self.min_year.as_deref().and_then(|v| v.trim().parse().ok()),
            max_year: self.max_year.as_deref().and_then(|v| v.trim().parse().ok()),
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<GameInput>,
) -> ApiResult<Game> {
    let game = state.games.create(input).await?;
    Ok(ApiResponse::created(game).with_message("Game created successfully"))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Game> {
    let id = parse_uuid(&id, "game")?;
    let game = state
        .games
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Game not found"))?;
    Ok(ApiResponse::success(game))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Vec<Game>> {
    let page = PageRequest::from_raw(params.page.as_deref(), params.limit.as_deref());
    let sort_column = resolve_sort_column(params.sort_by.as_deref(), "created_at");
    let order = SortOrder::parse(params.sort_order.as_deref());

    let (games, total) = state.games.list(&page, sort_column, order).await?;
    Ok(ApiResponse::success(games).with_pagination(PageMeta::new(&page, total)))
}

/// Search defaults to sorting by rating; the metadata counts the filtered
/// set and the applied filters are echoed back.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<Game>> {
    let filters = params.filters();
    let page = PageRequest::from_raw(params.page.as_deref(), params.limit.as_deref());
    let sort_column = resolve_sort_column(params.sort_by.as_deref(), "rating");
    let order = SortOrder::parse(params.sort_order.as_deref());

    let (games, total) = state.games.search(&filters, &page, sort_column, order).await?;
    Ok(ApiResponse::success(games)
        .with_message(format!("{} game(s) found", total))
        .with_pagination(PageMeta::new(&page, total))
        .with_filters(&filters))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<GameUpdate>,
) -> ApiResult<Game> {
    let id = parse_uuid(&id, "game")?;
    let game = state
        .games
        .update(id, body)
        .await?
        .ok_or_else(|| ApiError::not_found("Game not found"))?;
    Ok(ApiResponse::success(game).with_message("Game updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Game> {
    let id = parse_uuid(&id, "game")?;
    let game = state
        .games
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Game not found"))?;
    Ok(ApiResponse::success(game).with_message("Game deleted successfully"))
}

pub async fn count(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let total = state.games.count().await?;
    Ok(ApiResponse::success(json!({ "totalGames": total })))
}

pub async fn genres(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let genres = state.games.genres().await?;
    Ok(ApiResponse::success(json!({ "genres": genres })))
}

pub async fn platforms(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let platforms = state.games.platforms().await?;
    Ok(ApiResponse::success(json!({ "platforms": platforms })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_parse_permissively() {
        let params = SearchParams {
            keyword: Some("zelda".to_string()),
            min_rating: Some("8.5".to_string()),
            max_price: Some("not-a-number".to_string()),
            in_stock: Some("true".to_string()),
            min_year: Some(" 2015 ".to_string()),
            ..Default::default()
        };
        let filters = params.filters();
        assert_eq!(filters.keyword.as_deref(), Some("zelda"));
        assert_eq!(filters.min_rating, Some(8.5));
        assert_eq!(filters.max_price, None);
        assert_eq!(filters.in_stock, Some(true));
        assert_eq!(filters.min_year, Some(2015));
    }

    #[test]
    fn in_stock_is_true_only_for_the_literal() {
        let params = SearchParams {
            in_stock: Some("banana".to_string()),
            ..Default::default()
        };
        assert_eq!(params.filters().in_stock, Some(false));

        let params = SearchParams::default();
        assert_eq!(params.filters().in_stock, None);
    }
}
