use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Plain datatypes mapped from SQLite rows. Timestamps are
// UNIX seconds, SQLite has no real date type anyway.
// DTOs for the templates live in app::dtos.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id: i64,
  pub name: String,
  pub email: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
  pub id: i64,
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub color: String,
  pub is_active: bool,
  pub created_at: i64,
  pub updated_at: i64
}

// The home page wants the amount of published articles
// next to each category.
#[derive(Debug)]
pub struct CategoryWithCount {
  pub category: Category,
  pub published_articles_count: i64
}

// Articles are always loaded with their category and 
// author because every page showing an article shows
// both.
#[derive(Debug, Clone)]
pub struct Article {
  pub id: i64,
  pub title: String,
  pub slug: String,
  pub excerpt: Option<String>,
  pub content: String,
  pub featured_image: Option<String>,
  pub category_id: i64,
  pub user_id: i64,
  pub is_featured: bool,
  pub is_published: bool,
  pub published_at: Option<i64>,
  pub views_count: i64,
  pub created_at: i64,
  pub updated_at: i64,
  pub category: Category,
  pub author: User
}

#[derive(Debug, Clone)]
pub struct Comment {
  pub id: i64,
  pub article_id: i64,
  pub user_id: Option<i64>,
  pub author_name: Option<String>,
  pub author_email: Option<String>,
  pub content: String,
  pub is_approved: bool,
  pub approved_at: Option<i64>,
  pub created_at: i64,
  pub updated_at: i64,
  // Only present for comments posted by a logged in user:
  pub user: Option<User>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  Medium,
  High,
  Urgent
}

impl Priority {
  pub const ALL: [Priority; 4] = [
    Priority::Low, 
    Priority::Medium, 
    Priority::High, 
    Priority::Urgent
  ];

  // Explicit total order used for sorting. Higher is more
  // important. The SQL ordering expression is generated from
  // this, see db::announcements.
  pub fn rank(&self) -> i64 {
    match self {
      Priority::Low => 1,
      Priority::Medium => 2,
      Priority::High => 3,
      Priority::Urgent => 4
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Priority::Low => "low",
      Priority::Medium => "medium",
      Priority::High => "high",
      Priority::Urgent => "urgent"
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Priority {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Priority::ALL.iter()
      .find(|p| p.as_str() == s)
      .copied()
      .ok_or_else(|| format!("Unknown priority: {}", s))
  }
}

impl Default for Priority {
  fn default() -> Self {
    Priority::Medium
  }
}

#[derive(Debug, Clone)]
pub struct Announcement {
  pub id: i64,
  pub title: String,
  pub content: String,
  pub priority: Priority,
  pub is_active: bool,
  pub expires_at: Option<i64>,
  pub user_id: i64,
  pub created_at: i64,
  pub updated_at: i64,
  pub author: User
}

// Objects used for inserts. No ids, no timestamps, the 
// insert functions take care of those.

#[derive(Debug)]
pub struct NewUser {
  pub name: String,
  pub email: String
}

#[derive(Debug)]
pub struct NewCategory {
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub color: String,
  pub is_active: bool
}

#[derive(Debug)]
pub struct NewArticle {
  pub title: String,
  pub slug: String,
  pub excerpt: Option<String>,
  pub content: String,
  pub featured_image: Option<String>,
  pub category_id: i64,
  pub user_id: i64,
  pub is_featured: bool,
  pub is_published: bool,
  pub published_at: Option<i64>,
  pub views_count: i64
}

// Comments created through the website are never approved
// on creation, hence no approval fields here.
#[derive(Debug)]
pub struct NewComment {
  pub article_id: i64,
  pub user_id: Option<i64>,
  pub author_name: Option<String>,
  pub author_email: Option<String>,
  pub content: String
}

#[derive(Debug)]
pub struct NewAnnouncement {
  pub title: String,
  pub content: String,
  pub priority: Priority,
  pub is_active: bool,
  pub expires_at: Option<i64>,
  pub user_id: i64
}

#[derive(Debug)]
pub struct ContactMessage {
  pub name: String,
  pub email: String,
  pub subject: String,
  pub message: String
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn priority_ranks_are_a_total_order() {
    let mut sorted = vec![
      Priority::Low, Priority::Urgent, Priority::High, Priority::Medium
    ];
    sorted.sort_by_key(|p| std::cmp::Reverse(p.rank()));
    assert_eq!(
      vec![Priority::Urgent, Priority::High, Priority::Medium, Priority::Low],
      sorted
    );
  }

  #[test]
  fn priority_parses_from_storage_text() {
    assert_eq!(Ok(Priority::Urgent), "urgent".parse::<Priority>());
    assert_eq!(Ok(Priority::Low), "low".parse::<Priority>());
    assert!("URGENT".parse::<Priority>().is_err());
    assert_eq!("high", Priority::High.to_string());
  }
}
