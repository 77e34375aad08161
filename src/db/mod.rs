use rusqlite::{params_from_iter, Connection, OptionalExtension, Params, Row};
use r2d2_sqlite::SqliteConnectionManager;
pub mod entities;
mod mappers;
pub mod helpers;
pub mod queries;
pub mod users;
pub mod categories;
pub mod articles;
pub mod comments;
pub mod announcements;
pub mod contact_messages;
#[cfg(test)]
pub mod fixtures;
use eyre::{eyre, WrapErr};
use log::error;
use color_eyre::Result;
use std::convert::TryInto;
use queries::SelectQuery;

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<SqliteConnectionManager>;

const SCHEMA: &'static str = include_str!("schema.sql");

/**
 * All the DB stuff is done in a non-async way. Handlers call
 * these functions directly.
 */

// SQLite doesn't enforce foreign keys unless asked to, and 
// it has to be asked on every single connection.
fn enable_foreign_keys(conn: &mut Connection) -> Result<(), rusqlite::Error> {
  conn.execute_batch("PRAGMA foreign_keys = ON;")
}

pub fn open_pool(db_path: &str) -> Result<Pool> {
  let manager = SqliteConnectionManager::file(db_path)
    .with_init(enable_foreign_keys);
  Pool::new(manager)
    .context("Opening the database connection pool")
}

// Every in-memory connection is its own database, so the
// pool is limited to a single connection. Functions in here
// must never hold a connection while asking for another one.
#[cfg(test)]
pub fn memory_pool() -> Pool {
  let manager = SqliteConnectionManager::memory()
    .with_init(enable_foreign_keys);
  let pool = Pool::builder()
    .max_size(1)
    .build(manager)
    .unwrap();
  migrate(&pool).unwrap();
  pool
}

// Pool for the admin tool. A single connection means every
// call goes through the same one, which is what lets
// with_transaction work with the regular db functions.
pub fn open_single_connection_pool(db_path: &str) -> Result<Pool> {
  let manager = SqliteConnectionManager::file(db_path)
    .with_init(enable_foreign_keys);
  Pool::builder()
    .max_size(1)
    .build(manager)
    .context("Opening the single connection database pool")
}

// Runs f inside a transaction, rolled back if f fails. The pool
// has to have a single connection, otherwise the calls made by
// f could land on a connection outside of the transaction.
pub fn with_transaction<T, F>(pool: &Pool, f: F) -> Result<T>
  where F: FnOnce(&Pool) -> Result<T>
{
  if pool.max_size() != 1 {
    return Err(eyre!(
      "Transactions need a single connection pool, this one has {}", 
      pool.max_size()
    ));
  }
  pool.get()?.execute_batch("BEGIN IMMEDIATE")
    .context("Starting transaction")?;
  match f(pool) {
    Ok(value) => {
      pool.get()?.execute_batch("COMMIT")
        .context("Committing transaction")?;
      Ok(value)
    },
    Err(e) => {
      if let Err(rollback_error) = pool.get()?.execute_batch("ROLLBACK") {
        error!("Could not roll back transaction - {}", rollback_error);
      }
      Err(e)
    }
  }
}

pub fn migrate(pool: &Pool) -> Result<()> {
  let conn = pool.get()?;
  conn.execute_batch(SCHEMA)
    .context("Applying database schema")
}

// A page of results plus what's needed to draw the 
// pagination links. Pages are 1-based.
#[derive(Debug)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page: usize,
  pub per_page: usize,
  pub total: usize
}

impl<T> Page<T> {
  pub fn last_page(&self) -> usize {
    if self.total == 0 {
      1
    } else {
      (self.total + self.per_page - 1) / self.per_page
    }
  }

  pub fn has_previous(&self) -> bool {
    self.page > 1
  }

  pub fn has_next(&self) -> bool {
    self.page < self.last_page()
  }

  // Had to write a map for Page because the DTO conversion
  // happens after the query.
  pub fn map<U, F>(self, f: F) -> Page<U>
    where F: FnMut(T) -> U
  {
    Page {
      items: self.items.into_iter().map(f).collect(),
      page: self.page,
      per_page: self.per_page,
      total: self.total
    }
  }
}

// Stole most of the signature from the rusqlite doc.
// Careful to use a later version of the crate, 
// Google takes you to old versions of the doc.
fn select_many<T, P, F>(
  pool: &Pool, 
  query: &str, 
  params: P, 
  mapper: F
) -> Result<Vec<T>> 
  where
    P: Params,
    F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.get()?;
  let mut stmt = conn.prepare(query)?;
  let rows = stmt.query_map(params, mapper)
    .and_then(Iterator::collect)
    .context("Generic select_many query");
  rows
}

fn select_one<T, P, F>(
  pool: &Pool, 
  query: &str, 
  params: P, 
  mapper: F
) -> Result<Option<T>> 
  where
    P: Params,
    F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.get()?;
  let mut stmt = conn.prepare(query)?;
  let row = stmt.query_row(params, mapper)
    .optional()
    .context("Generic select_one query");
  row
}

fn select_query<T, F>(
  pool: &Pool,
  query: &SelectQuery,
  mapper: F
) -> Result<Vec<T>>
  where F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>
{
  select_many(
    pool, 
    &query.to_string(), 
    params_from_iter(query.params()), 
    mapper
  )
}

// Runs the count query first, then fetches the rows for the
// requested page. Asking for a page past the end just gives 
// an empty page.
fn select_page<T, F>(
  pool: &Pool,
  query: SelectQuery,
  page: usize,
  per_page: usize,
  mapper: F
) -> Result<Page<T>>
  where F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>
{
  let page = page.max(1);
  let total = count(
    pool, 
    &query.count_query(), 
    params_from_iter(query.params())
  )?;
  // Past the end there's nothing to fetch. Skipping the query
  // also keeps huge offsets away from SQLite, which only takes
  // an i64 there.
  let items = match helpers::page_offset(page, per_page) {
    Some(offset) if offset < total => {
      let query = query
        .limit(per_page)
        .offset(offset);
      select_query(pool, &query, mapper)?
    },
    _ => Vec::new()
  };
  Ok(Page {
    items,
    page,
    per_page,
    total
  })
}

fn count<P: Params>(
  pool: &Pool,
  query: &str,
  params: P
) -> Result<usize> {
  let conn = pool.get()?;
  let count: i64 = conn.query_row(query, params, |row| row.get(0))
    .context("Generic count query")?;
  // Convert the i64 to usize, can't really fail.
  count.try_into()
    .context("Negative count from database")
}

// Returns the new row id.
fn insert<P: Params>(
  pool: &Pool,
  query: &str,
  params: P
) -> Result<i64> {
  let conn = pool.get()?;
  conn.execute(query, params)
    .context("Generic insert query")?;
  Ok(conn.last_insert_rowid())
}
