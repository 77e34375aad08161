use rusqlite::params;
use color_eyre::Result;
use eyre::eyre;
use super::entities::*;
use super::mappers::{map_category, map_category_with_count, CATEGORY_FIELDS};
use super::queries::{Order, OrderBy, SelectQuery};
use super::articles::PUBLISHED_CLAUSE;
use super::{insert, select_many, select_query, Pool};
use crate::utils::text_utils::is_hex_color;

// Scope filter: only categories that are switched on.
pub fn active(query: SelectQuery) -> SelectQuery {
  query.where_clause("categories.is_active = 1", vec![])
}

pub fn active_categories(
  pool: &Pool
) -> Result<Vec<Category>> {
  let query = active(SelectQuery::new(&[CATEGORY_FIELDS], "categories"))
    .order(OrderBy::new(Order::Asc, "categories.name"));
  select_query(pool, &query, map_category)
}

// Active categories with the amount of articles currently
// visible to the public in each of them.
pub fn active_categories_with_counts(
  pool: &Pool,
  now: i64
) -> Result<Vec<CategoryWithCount>> {
  select_many(
    pool,
    &format!(
      "SELECT {}, \
      (SELECT count(*) FROM articles WHERE articles.category_id = categories.id AND {}) \
      FROM categories WHERE categories.is_active = 1 \
      ORDER BY categories.name ASC",
      CATEGORY_FIELDS,
      PUBLISHED_CLAUSE
    ),
    params![now],
    map_category_with_count
  )
}

pub fn insert_category(
  pool: &Pool,
  category: &NewCategory,
  now: i64
) -> Result<i64> {
  // The schema only checks the length.
  if !is_hex_color(&category.color) {
    return Err(eyre!(
      "Category color has to look like #RRGGBB, got {}", 
      category.color
    ));
  }
  insert(
    pool,
    "INSERT INTO categories (name, slug, description, color, is_active, created_at, updated_at) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    params![
      category.name, 
      category.slug, 
      category.description, 
      category.color, 
      category.is_active, 
      now
    ]
  )
}
