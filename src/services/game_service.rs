//! Catalog business logic: CRUD, filtered search and the stats reads.

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{bind_value_as, bind_value_scalar};
use crate::error::ApiError;
use crate::filter::{GameFilters, WhereBuilder};
use crate::models::game::{Game, GameInput, GameUpdate};
use crate::pagination::{PageRequest, SortOrder};

#[derive(Clone)]
pub struct GameService {
    pool: PgPool,
}

impl GameService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Validate and insert one game. Schema defaults (rating 0, price 0,
    /// in stock) apply to omitted optional fields.
    pub async fn create(&self, input: GameInput) -> Result<Game, ApiError> {
        if let Err(errors) = input.validate() {
            return Err(ApiError::validation("Validation error", errors));
        }

        let game = sqlx::query_as::<_, Game>(
            "INSERT INTO games \
             (id, title, description, genre, platform, release_year, publisher, rating, price, in_stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(input.title.trim())
        .bind(input.description.trim())
        .bind(&input.genre)
        .bind(&input.platform)
        .bind(input.release_year)
        .bind(input.publisher.trim())
        .bind(input.rating.unwrap_or(0.0))
        .bind(input.price.unwrap_or(0.0))
        .bind(input.in_stock.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(game)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, ApiError> {
        let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    /// Unfiltered page of the catalog. Page fetch and total count run
    /// concurrently.
    pub async fn list(
        &self,
        page: &PageRequest,
        sort_column: &'static str,
        order: SortOrder,
    ) -> Result<(Vec<Game>, i64), ApiError> {
        let sql = format!(
            "SELECT * FROM games ORDER BY {} {} LIMIT $1 OFFSET $2",
            sort_column,
            order.to_sql()
        );

        let rows = sqlx::query_as::<_, Game>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool);
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM games").fetch_one(&self.pool);

        let (rows, total) = tokio::try_join!(rows, total)?;
        Ok((rows, total))
    }

    /// Filtered page. The count runs against the same predicate so the
    /// pagination metadata reflects the filtered set, not the whole table.
    pub async fn search(
        &self,
        filters: &GameFilters,
        page: &PageRequest,
        sort_column: &'static str,
        order: SortOrder,
    ) -> Result<(Vec<Game>, i64), ApiError> {
        let predicate = WhereBuilder::build(filters);
        let clause = predicate.clause();
        let limit_param = predicate.next_param_index();

        let select_sql = format!(
            "SELECT * FROM games{} ORDER BY {} {} LIMIT ${} OFFSET ${}",
            clause,
            sort_column,
            order.to_sql(),
            limit_param,
            limit_param + 1
        );
        let count_sql = format!("SELECT COUNT(*) FROM games{}", clause);

        let mut select = sqlx::query_as::<_, Game>(&select_sql);
        for param in &predicate.params {
            select = bind_value_as(select, param);
        }
        let select = select.bind(page.limit).bind(page.offset());

        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in &predicate.params {
            count = bind_value_scalar(count, param);
        }

        let (rows, total) =
            tokio::try_join!(select.fetch_all(&self.pool), count.fetch_one(&self.pool))?;
        Ok((rows, total))
    }

    /// Partial update. Returns None when the id has no record.
    pub async fn update(&self, id: Uuid, update: GameUpdate) -> Result<Option<Game>, ApiError> {
        if let Err(errors) = update.validate() {
            return Err(ApiError::validation("Validation error", errors));
        }

        let sql = build_update_sql(&update);

        // Bind order must mirror the placeholder order in build_update_sql.
        let mut query = sqlx::query_as::<_, Game>(&sql);
        if let Some(title) = &update.title {
            query = query.bind(title.trim().to_string());
        }
        if let Some(description) = &update.description {
            query = query.bind(description.trim().to_string());
        }
        if let Some(genre) = &update.genre {
            query = query.bind(genre);
        }
        if let Some(platform) = &update.platform {
            query = query.bind(platform);
        }
        if let Some(release_year) = update.release_year {
            query = query.bind(release_year);
        }
        if let Some(publisher) = &update.publisher {
            query = query.bind(publisher.trim().to_string());
        }
        if let Some(rating) = update.rating {
            query = query.bind(rating);
        }
        if let Some(price) = update.price {
            query = query.bind(price);
        }
        if let Some(in_stock) = update.in_stock {
            query = query.bind(in_stock);
        }

        let game = query.bind(id).fetch_optional(&self.pool).await?;
        Ok(game)
    }

    /// Delete and return the removed record, or None when absent.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Game>, ApiError> {
        let game = sqlx::query_as::<_, Game>("DELETE FROM games WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    pub async fn count(&self) -> Result<i64, ApiError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM games")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// Distinct genres currently present in the catalog.
    pub async fn genres(&self) -> Result<Vec<String>, ApiError> {
        let genres =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT genre FROM games ORDER BY genre")
                .fetch_all(&self.pool)
                .await?;
        Ok(genres)
    }

    /// Distinct platforms, flattened out of the per-game arrays.
    pub async fn platforms(&self) -> Result<Vec<String>, ApiError> {
        let platforms = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT unnest(platform) AS platform FROM games ORDER BY platform",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(platforms)
    }
}

/// Assemble the dynamic SET clause, numbering placeholders in the fixed
/// field order the bind calls follow. `updated_at` always moves forward.
fn build_update_sql(update: &GameUpdate) -> String {
    let mut sets = Vec::new();
    let mut index = 0;
    let mut next = |column: &str| {
        index += 1;
        format!("{} = ${}", column, index)
    };

    if update.title.is_some() {
        sets.push(next("title"));
    }
    if update.description.is_some() {
        sets.push(next("description"));
    }
    if update.genre.is_some() {
        sets.push(next("genre"));
    }
    if update.platform.is_some() {
        sets.push(next("platform"));
    }
    if update.release_year.is_some() {
        sets.push(next("release_year"));
    }
    if update.publisher.is_some() {
        sets.push(next("publisher"));
    }
    if update.rating.is_some() {
        sets.push(next("rating"));
    }
    if update.price.is_some() {
        sets.push(next("price"));
    }
    if update.in_stock.is_some() {
        sets.push(next("in_stock"));
    }
    sets.push("updated_at = now()".to_string());

    format!(
        "UPDATE games SET {} WHERE id = ${} RETURNING *",
        sets.join(", "),
        index + 1
    )
}
