//! Translates a `GameFilters` object into a single conjunctive SQL predicate
//! with `$n` placeholders.
//!
//! Each present field contributes exactly one condition; the result is the
//! logical AND of all of them. A filter that matches nothing is a valid
//! outcome, not an error.

use serde_json::{json, Value};

use super::types::GameFilters;

/// A generated predicate: the text after `WHERE` plus its bind parameters,
/// numbered from `$1`.
#[derive(Debug, Clone)]
pub struct SqlWhere {
    pub conditions: Vec<String>,
    pub params: Vec<Value>,
}

impl SqlWhere {
    /// Returns `" WHERE ..."` (leading space included) or an empty string
    /// when no filter is present, ready to splice into a query.
    pub fn clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Placeholder index for the next parameter appended after this clause.
    pub fn next_param_index(&self) -> usize {
        self.params.len() + 1
    }
}

pub struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Fold every present filter field into the predicate, skipping absent
    /// ones. Field order is fixed so the generated SQL is deterministic.
    pub fn build(filters: &GameFilters) -> SqlWhere {
        let mut builder = Self::new();

        if let Some(keyword) = filters.keyword.as_deref().map(str::trim) {
            if !keyword.is_empty() {
                let pattern = contains_pattern(keyword);
                let title = builder.param(json!(pattern.clone()));
                let description = builder.param(json!(pattern));
                builder.conditions.push(format!(
                    "(title ILIKE {} OR description ILIKE {})",
                    title, description
                ));
            }
        }

        if let Some(genre) = filters.genre.as_deref().map(str::trim) {
            if !genre.is_empty() {
                // ILIKE on an escaped pattern gives case-insensitive exact match
                let p = builder.param(json!(escape_like(genre)));
                builder.conditions.push(format!("genre ILIKE {}", p));
            }
        }

        if let Some(platform) = filters.platform.as_deref().map(str::trim) {
            if !platform.is_empty() {
                let p = builder.param(json!(contains_pattern(platform)));
                builder.conditions.push(format!(
                    "EXISTS (SELECT 1 FROM unnest(platform) AS p WHERE p ILIKE {})",
                    p
                ));
            }
        }

        if let Some(min_rating) = filters.min_rating {
            let p = builder.param(json!(min_rating));
            builder.conditions.push(format!("rating >= {}", p));
        }

        if let Some(max_price) = filters.max_price {
            let p = builder.param(json!(max_price));
            builder.conditions.push(format!("price <= {}", p));
        }

        if let Some(in_stock) = filters.in_stock {
            let p = builder.param(json!(in_stock));
            builder.conditions.push(format!("in_stock = {}", p));
        }

        if let Some(min_year) = filters.min_year {
            let p = builder.param(json!(min_year));
            builder.conditions.push(format!("release_year >= {}", p));
        }

        if let Some(max_year) = filters.max_year {
            let p = builder.param(json!(max_year));
            builder.conditions.push(format!("release_year <= {}", p));
        }

        SqlWhere {
            conditions: builder.conditions,
            params: builder.params,
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

impl Default for WhereBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape LIKE metacharacters so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn contains_pattern(input: &str) -> String {
    format!("%{}%", escape_like(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::GameFilters;

    #[test]
    fn empty_filters_produce_no_clause() {
        let sql = WhereBuilder::build(&GameFilters::default());
        assert_eq!(sql.clause(), "");
        assert!(sql.params.is_empty());
        assert_eq!(sql.next_param_index(), 1);
    }

    #[test]
    fn keyword_matches_title_or_description() {
        let filters = GameFilters {
            keyword: Some("zelda".to_string()),
            ..Default::default()
        };
        let sql = WhereBuilder::build(&filters);
        assert_eq!(
            sql.clause(),
            " WHERE (title ILIKE $1 OR description ILIKE $2)"
        );
        assert_eq!(sql.params, vec![json!("%zelda%"), json!("%zelda%")]);
    }

    #[test]
    fn blank_keyword_imposes_no_constraint() {
        let filters = GameFilters {
            keyword: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(WhereBuilder::build(&filters).clause(), "");
    }

    #[test]
    fn genre_is_exact_not_substring() {
        let filters = GameFilters {
            genre: Some("RPG".to_string()),
            ..Default::default()
        };
        let sql = WhereBuilder::build(&filters);
        assert_eq!(sql.clause(), " WHERE genre ILIKE $1");
        // No wildcards around the value: "RPG" must not match "MMORPG"
        assert_eq!(sql.params, vec![json!("RPG")]);
    }

    #[test]
    fn platform_matches_any_list_element() {
        let filters = GameFilters {
            platform: Some("PC".to_string()),
            ..Default::default()
        };
        let sql = WhereBuilder::build(&filters);
        assert_eq!(
            sql.clause(),
            " WHERE EXISTS (SELECT 1 FROM unnest(platform) AS p WHERE p ILIKE $1)"
        );
        assert_eq!(sql.params, vec![json!("%PC%")]);
    }

    #[test]
    fn numeric_bounds_are_inclusive_and_independent() {
        let filters = GameFilters {
            min_year: Some(2000),
            ..Default::default()
        };
        let sql = WhereBuilder::build(&filters);
        assert_eq!(sql.clause(), " WHERE release_year >= $1");

        let filters = GameFilters {
            max_year: Some(2010),
            ..Default::default()
        };
        let sql = WhereBuilder::build(&filters);
        assert_eq!(sql.clause(), " WHERE release_year <= $1");
    }

    #[test]
    fn combined_filters_are_conjunctive() {
        let filters = GameFilters {
            genre: Some("RPG".to_string()),
            min_rating: Some(9.0),
            in_stock: Some(true),
            min_year: Some(2020),
            max_year: Some(2024),
            ..Default::default()
        };
        let sql = WhereBuilder::build(&filters);
        assert_eq!(
            sql.clause(),
            " WHERE genre ILIKE $1 AND rating >= $2 AND in_stock = $3 \
             AND release_year >= $4 AND release_year <= $5"
        );
        assert_eq!(
            sql.params,
            vec![json!("RPG"), json!(9.0), json!(true), json!(2020), json!(2024)]
        );
        assert_eq!(sql.next_param_index(), 6);
    }

    #[test]
    fn like_metacharacters_match_literally() {
        let filters = GameFilters {
            keyword: Some("100%_fun".to_string()),
            ..Default::default()
        };
        let sql = WhereBuilder::build(&filters);
        assert_eq!(sql.params[0], json!("%100\\%\\_fun%"));
    }
}
