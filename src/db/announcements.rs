use rusqlite::params;
use rusqlite::types::Value;
use color_eyre::Result;
use super::entities::*;
use super::mappers::{map_announcement, ANNOUNCEMENT_FIELDS, USER_FIELDS};
use super::queries::{Order, OrderBy, SelectQuery};
use super::{insert, select_page, select_query, Page, Pool};

fn base_query() -> SelectQuery {
  SelectQuery::new(&[ANNOUNCEMENT_FIELDS, USER_FIELDS], "announcements")
    .join("INNER JOIN users ON users.id = announcements.user_id")
}

// Scope filter: switched on and not expired yet. Expiry is
// checked against "now" on every read, nothing is precomputed.
pub fn visible(query: SelectQuery, now: i64) -> SelectQuery {
  query.where_clause(
    "announcements.is_active = 1 \
    AND (announcements.expires_at IS NULL OR announcements.expires_at > ?)",
    vec![Value::from(now)]
  )
}

// Builds the CASE expression giving each priority its rank
// so the ordering doesn't depend on engine specific 
// functions.
pub fn priority_rank_sql(column: &str) -> String {
  let whens: Vec<String> = Priority::ALL.iter()
    .map(|p| format!("WHEN '{}' THEN {}", p.as_str(), p.rank()))
    .collect();
  format!("CASE {} {} ELSE 0 END", column, whens.join(" "))
}

fn most_important_first(query: SelectQuery) -> SelectQuery {
  query
    .order(OrderBy::new(Order::Desc, &priority_rank_sql("announcements.priority")))
    .order(OrderBy::new(Order::Desc, "announcements.created_at"))
    .order(OrderBy::new(Order::Desc, "announcements.id"))
}

fn newest_first(query: SelectQuery) -> SelectQuery {
  query
    .order(OrderBy::new(Order::Desc, "announcements.created_at"))
    .order(OrderBy::new(Order::Desc, "announcements.id"))
}

pub fn visible_announcements_page(
  pool: &Pool,
  now: i64,
  page: usize,
  per_page: usize
) -> Result<Page<Announcement>> {
  let query = most_important_first(visible(base_query(), now));
  select_page(pool, query, page, per_page, map_announcement)
}

pub fn urgent_announcements(
  pool: &Pool,
  now: i64,
  limit: usize
) -> Result<Vec<Announcement>> {
  let query = newest_first(
    visible(base_query(), now)
      .where_clause(
        "announcements.priority = ?", 
        vec![Value::from(Priority::Urgent.as_str().to_string())]
      )
  ).limit(limit);
  select_query(pool, &query, map_announcement)
}

// Inactive, expired and missing all give None.
pub fn visible_announcement_by_id(
  pool: &Pool,
  announcement_id: i64,
  now: i64
) -> Result<Option<Announcement>> {
  let query = visible(base_query(), now)
    .where_clause("announcements.id = ?", vec![Value::from(announcement_id)])
    .limit(1);
  Ok(select_query(pool, &query, map_announcement)?.into_iter().next())
}

pub fn insert_announcement(
  pool: &Pool,
  announcement: &NewAnnouncement,
  now: i64
) -> Result<i64> {
  insert(
    pool,
    "INSERT INTO announcements (title, content, priority, is_active, expires_at, \
    user_id, created_at, updated_at) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    params![
      announcement.title,
      announcement.content,
      announcement.priority,
      announcement.is_active,
      announcement.expires_at,
      announcement.user_id,
      now
    ]
  )
}
