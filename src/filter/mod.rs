pub mod builder;
pub mod types;

pub use builder::WhereBuilder;
pub use types::{resolve_sort_column, GameFilters};
