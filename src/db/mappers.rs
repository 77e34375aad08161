use super::entities::*;
use rusqlite::{Row, Error};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

// Column lists and the mappers reading them have to stay
// in sync, so they live together here. Mappers read by
// index, the "_at" variants take the index of the first
// column so joined rows can be mapped piece by piece.

pub const USER_FIELDS: &'static str = 
  "users.id, users.name, users.email";

pub const CATEGORY_FIELDS: &'static str = 
  "categories.id, categories.name, categories.slug, categories.description, \
  categories.color, categories.is_active, categories.created_at, categories.updated_at";

pub const ARTICLE_FIELDS: &'static str = 
  "articles.id, articles.title, articles.slug, articles.excerpt, articles.content, \
  articles.featured_image, articles.category_id, articles.user_id, articles.is_featured, \
  articles.is_published, articles.published_at, articles.views_count, \
  articles.created_at, articles.updated_at";

pub const COMMENT_FIELDS: &'static str = 
  "comments.id, comments.article_id, comments.user_id, comments.author_name, \
  comments.author_email, comments.content, comments.is_approved, comments.approved_at, \
  comments.created_at, comments.updated_at";

pub const ANNOUNCEMENT_FIELDS: &'static str = 
  "announcements.id, announcements.title, announcements.content, announcements.priority, \
  announcements.is_active, announcements.expires_at, announcements.user_id, \
  announcements.created_at, announcements.updated_at";

const CATEGORY_COLUMN_COUNT: usize = 8;
const ARTICLE_COLUMN_COUNT: usize = 14;
const COMMENT_COLUMN_COUNT: usize = 10;
const ANNOUNCEMENT_COLUMN_COUNT: usize = 9;

pub fn map_user_at(row: &Row, offset: usize) -> Result<User, Error> {
  Ok(User {
    id: row.get(offset)?,
    name: row.get(offset + 1)?,
    email: row.get(offset + 2)?
  })
}

pub fn map_user(row: &Row) -> Result<User, Error> {
  map_user_at(row, 0)
}

pub fn map_category_at(row: &Row, offset: usize) -> Result<Category, Error> {
  Ok(Category {
    id: row.get(offset)?,
    name: row.get(offset + 1)?,
    slug: row.get(offset + 2)?,
    description: row.get(offset + 3)?,
    color: row.get(offset + 4)?,
    is_active: row.get(offset + 5)?,
    created_at: row.get(offset + 6)?,
    updated_at: row.get(offset + 7)?
  })
}

pub fn map_category(row: &Row) -> Result<Category, Error> {
  map_category_at(row, 0)
}

// Expects CATEGORY_FIELDS followed by the count.
pub fn map_category_with_count(row: &Row) -> Result<CategoryWithCount, Error> {
  Ok(CategoryWithCount {
    category: map_category_at(row, 0)?,
    published_articles_count: row.get(CATEGORY_COLUMN_COUNT)?
  })
}

// Expects ARTICLE_FIELDS, CATEGORY_FIELDS, USER_FIELDS.
pub fn map_article(row: &Row) -> Result<Article, Error> {
  Ok(Article {
    id: row.get(0)?,
    title: row.get(1)?,
    slug: row.get(2)?,
    excerpt: row.get(3)?,
    content: row.get(4)?,
    featured_image: row.get(5)?,
    category_id: row.get(6)?,
    user_id: row.get(7)?,
    is_featured: row.get(8)?,
    is_published: row.get(9)?,
    published_at: row.get(10)?,
    views_count: row.get(11)?,
    created_at: row.get(12)?,
    updated_at: row.get(13)?,
    category: map_category_at(row, ARTICLE_COLUMN_COUNT)?,
    author: map_user_at(row, ARTICLE_COLUMN_COUNT + CATEGORY_COLUMN_COUNT)?
  })
}

// Expects COMMENT_FIELDS then USER_FIELDS from a LEFT JOIN,
// the user columns are all NULL for guest comments.
pub fn map_comment(row: &Row) -> Result<Comment, Error> {
  let user_id: Option<i64> = row.get(COMMENT_COLUMN_COUNT)?;
  let user = match user_id {
    Some(_) => Some(map_user_at(row, COMMENT_COLUMN_COUNT)?),
    None => None
  };
  Ok(Comment {
    id: row.get(0)?,
    article_id: row.get(1)?,
    user_id: row.get(2)?,
    author_name: row.get(3)?,
    author_email: row.get(4)?,
    content: row.get(5)?,
    is_approved: row.get(6)?,
    approved_at: row.get(7)?,
    created_at: row.get(8)?,
    updated_at: row.get(9)?,
    user
  })
}

// Expects ANNOUNCEMENT_FIELDS then USER_FIELDS.
pub fn map_announcement(row: &Row) -> Result<Announcement, Error> {
  Ok(Announcement {
    id: row.get(0)?,
    title: row.get(1)?,
    content: row.get(2)?,
    priority: row.get(3)?,
    is_active: row.get(4)?,
    expires_at: row.get(5)?,
    user_id: row.get(6)?,
    created_at: row.get(7)?,
    updated_at: row.get(8)?,
    author: map_user_at(row, ANNOUNCEMENT_COLUMN_COUNT)?
  })
}

// Priorities are stored as text so the database stays readable
// with the sqlite3 CLI.
impl FromSql for Priority {
  fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
    value.as_str()?
      .parse()
      .map_err(|e: String| FromSqlError::Other(e.into()))
  }
}

impl ToSql for Priority {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    Ok(ToSqlOutput::from(self.as_str()))
  }
}
