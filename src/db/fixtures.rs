// Test data helpers. Everything is created relative to NOW
// so tests can use a FixedClock set to the same instant.

use super::Pool;
use super::entities::*;
use super::{users, categories, articles, announcements};
use crate::utils::text_utils::slugify;
use crate::utils::time_utils::SECONDS_PER_DAY;

// 2024-01-15 08:00:00 UTC
pub const NOW: i64 = 1705305600;

pub fn user(pool: &Pool) -> i64 {
  users::insert_user(
    pool,
    &NewUser {
      name: "Admin CSIRT".to_string(),
      email: "admin@okutimurkab-csirt.go.id".to_string()
    },
    NOW
  ).unwrap()
}

pub fn new_category(name: &str, slug: &str) -> NewCategory {
  NewCategory {
    name: name.to_string(),
    slug: slug.to_string(),
    description: Some(format!("All about {}", name)),
    color: "#DC2626".to_string(),
    is_active: true
  }
}

pub fn category(pool: &Pool, name: &str, slug: &str) -> i64 {
  categories::insert_category(pool, &new_category(name, slug), NOW).unwrap()
}

// Published yesterday, slug derived from the title.
pub fn new_article(title: &str, category_id: i64, user_id: i64) -> NewArticle {
  NewArticle {
    title: title.to_string(),
    slug: slugify(title),
    excerpt: None,
    content: format!("<p>Content of {}</p>", title),
    featured_image: None,
    category_id,
    user_id,
    is_featured: false,
    is_published: true,
    published_at: Some(NOW - SECONDS_PER_DAY),
    views_count: 0
  }
}

pub fn published_article(pool: &Pool, title: &str, category_id: i64, user_id: i64) -> i64 {
  articles::insert_article(pool, &new_article(title, category_id, user_id), NOW).unwrap()
}

pub fn guest_comment(article_id: i64, content: &str) -> NewComment {
  NewComment {
    article_id,
    user_id: None,
    author_name: Some("Budi".to_string()),
    author_email: Some("budi@example.org".to_string()),
    content: content.to_string()
  }
}

pub fn new_announcement(priority: Priority, user_id: i64) -> NewAnnouncement {
  NewAnnouncement {
    title: format!("{} announcement", priority),
    content: "Please read this carefully.".to_string(),
    priority,
    is_active: true,
    expires_at: None,
    user_id
  }
}

pub fn announcement(pool: &Pool, priority: Priority, user_id: i64, created_at: i64) -> i64 {
  announcements::insert_announcement(
    pool, 
    &new_announcement(priority, user_id), 
    created_at
  ).unwrap()
}
