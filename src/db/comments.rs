use rusqlite::params;
use rusqlite::types::Value;
use color_eyre::Result;
use eyre::eyre;
use super::entities::*;
use super::mappers::{map_comment, COMMENT_FIELDS, USER_FIELDS};
use super::queries::{Order, OrderBy, SelectQuery};
use super::{insert, select_one, select_query, Pool};

fn base_query() -> SelectQuery {
  SelectQuery::new(&[COMMENT_FIELDS, USER_FIELDS], "comments")
    .join("LEFT JOIN users ON users.id = comments.user_id")
}

// Scope filter: comments that went through moderation.
pub fn approved(query: SelectQuery) -> SelectQuery {
  query.where_clause("comments.is_approved = 1", vec![])
}

// Oldest first, it's a conversation.
pub fn approved_comments_for_article(
  pool: &Pool,
  article_id: i64
) -> Result<Vec<Comment>> {
  let query = approved(base_query())
    .where_clause("comments.article_id = ?", vec![Value::from(article_id)])
    .order(OrderBy::new(Order::Asc, "comments.created_at"))
    .order(OrderBy::new(Order::Asc, "comments.id"));
  select_query(pool, &query, map_comment)
}

pub fn comment_by_id(
  pool: &Pool,
  comment_id: i64
) -> Result<Option<Comment>> {
  select_one(
    pool,
    &format!("{} WHERE comments.id = ?", base_query()),
    params![comment_id],
    map_comment
  )
}

// New comments always start unapproved, they go into the 
// moderation queue.
pub fn insert_comment(
  pool: &Pool,
  comment: &NewComment,
  now: i64
) -> Result<i64> {
  // Guest comments have to say who wrote them. The schema
  // has the same CHECK but this error message is nicer.
  if comment.user_id.is_none() 
    && (comment.author_name.is_none() || comment.author_email.is_none()) {
    return Err(eyre!("Guest comments need an author name and email"));
  }
  insert(
    pool,
    "INSERT INTO comments (article_id, user_id, author_name, author_email, content, \
    is_approved, approved_at, created_at, updated_at) \
    VALUES (?1, ?2, ?3, ?4, ?5, 0, NULL, ?6, ?6)",
    params![
      comment.article_id,
      comment.user_id,
      comment.author_name,
      comment.author_email,
      comment.content,
      now
    ]
  )
}

// Moderation. Only portal-admin calls this, the website
// itself never approves anything. Returns false when the
// comment doesn't exist or was already approved.
pub fn approve_comment(
  pool: &Pool,
  comment_id: i64,
  now: i64
) -> Result<bool> {
  let conn = pool.get()?;
  let changed = conn.execute(
    "UPDATE comments SET is_approved = 1, approved_at = ?1, updated_at = ?1 \
    WHERE id = ?2 AND is_approved = 0",
    params![now, comment_id]
  )?;
  Ok(changed == 1)
}
