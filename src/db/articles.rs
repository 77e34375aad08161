use rusqlite::params;
use rusqlite::types::Value;
use color_eyre::Result;
use eyre::WrapErr;
use super::entities::*;
use super::mappers::{map_article, ARTICLE_FIELDS, CATEGORY_FIELDS, USER_FIELDS};
use super::queries::{Order, OrderBy, SelectQuery};
use super::{insert, select_page, select_query, Page, Pool};
use crate::utils::text_utils::escape_like;

// An article is public when it's published AND its publication 
// date has been reached. Scheduled articles stay hidden until then.
// Shared with the category counts, takes "now" as its only param.
pub const PUBLISHED_CLAUSE: &'static str = 
  "articles.is_published = 1 AND articles.published_at IS NOT NULL \
  AND articles.published_at <= ?";

// Filters coming from the listing page. Both are optional
// and already trimmed, empty strings should be None.
#[derive(Debug, Default)]
pub struct ArticleFilters {
  pub category: Option<String>,
  pub search: Option<String>
}

fn base_query() -> SelectQuery {
  SelectQuery::new(
    &[ARTICLE_FIELDS, CATEGORY_FIELDS, USER_FIELDS], 
    "articles"
  )
    .join("INNER JOIN categories ON categories.id = articles.category_id")
    .join("INNER JOIN users ON users.id = articles.user_id")
}

// Scope filters:

pub fn published(query: SelectQuery, now: i64) -> SelectQuery {
  query.where_clause(PUBLISHED_CLAUSE, vec![Value::from(now)])
}

pub fn featured(query: SelectQuery) -> SelectQuery {
  query.where_clause("articles.is_featured = 1", vec![])
}

// Id is the tie breaker so pages stay stable when two 
// articles share a publication date.
fn newest_first(query: SelectQuery) -> SelectQuery {
  query
    .order(OrderBy::new(Order::Desc, "articles.published_at"))
    .order(OrderBy::new(Order::Desc, "articles.id"))
}

fn apply_filters(mut query: SelectQuery, filters: &ArticleFilters) -> SelectQuery {
  if let Some(category) = &filters.category {
    query = query.where_clause(
      "categories.slug = ?", 
      vec![Value::from(category.clone())]
    );
  }
  if let Some(search) = &filters.search {
    let pattern = format!("%{}%", escape_like(search));
    query = query.where_clause(
      "(articles.title LIKE ? ESCAPE '\\' OR articles.content LIKE ? ESCAPE '\\')",
      vec![Value::from(pattern.clone()), Value::from(pattern)]
    );
  }
  query
}

pub fn published_articles_page(
  pool: &Pool,
  filters: &ArticleFilters,
  now: i64,
  page: usize,
  per_page: usize
) -> Result<Page<Article>> {
  let query = newest_first(
    apply_filters(published(base_query(), now), filters)
  );
  select_page(pool, query, page, per_page, map_article)
}

pub fn latest_published_articles(
  pool: &Pool,
  now: i64,
  limit: usize
) -> Result<Vec<Article>> {
  let query = newest_first(published(base_query(), now))
    .limit(limit);
  select_query(pool, &query, map_article)
}

pub fn featured_published_articles(
  pool: &Pool,
  now: i64,
  limit: usize
) -> Result<Vec<Article>> {
  let query = newest_first(featured(published(base_query(), now)))
    .limit(limit);
  select_query(pool, &query, map_article)
}

// Unpublished and non-existent articles both give None, the
// handlers can't tell the difference and neither can visitors.
pub fn published_article_by_slug(
  pool: &Pool,
  slug: &str,
  now: i64
) -> Result<Option<Article>> {
  let query = published(base_query(), now)
    .where_clause("articles.slug = ?", vec![Value::from(slug.to_string())])
    .limit(1);
  Ok(select_query(pool, &query, map_article)?.into_iter().next())
}

// Other published articles from the same category.
pub fn related_articles(
  pool: &Pool,
  article: &Article,
  now: i64,
  limit: usize
) -> Result<Vec<Article>> {
  let query = newest_first(
    published(base_query(), now)
      .where_clause(
        "articles.category_id = ? AND articles.id != ?",
        vec![Value::from(article.category_id), Value::from(article.id)]
      )
  ).limit(limit);
  select_query(pool, &query, map_article)
}

// The increment happens in SQLite in a single statement, 
// concurrent views can't overwrite each other. Returns the 
// new count.
pub fn increment_views(
  pool: &Pool,
  article_id: i64
) -> Result<i64> {
  let conn = pool.get()?;
  let count = conn.query_row(
    "UPDATE articles SET views_count = views_count + 1 \
    WHERE id = ? RETURNING views_count",
    params![article_id],
    |row| row.get(0)
  ).context("Incrementing article views count");
  count
}

pub fn insert_article(
  pool: &Pool,
  article: &NewArticle,
  now: i64
) -> Result<i64> {
  insert(
    pool,
    "INSERT INTO articles (title, slug, excerpt, content, featured_image, \
    category_id, user_id, is_featured, is_published, published_at, views_count, \
    created_at, updated_at) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
    params![
      article.title,
      article.slug,
      article.excerpt,
      article.content,
      article.featured_image,
      article.category_id,
      article.user_id,
      article.is_featured,
      article.is_published,
      article.published_at,
      article.views_count,
      now
    ]
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{memory_pool, fixtures};
  use crate::utils::time_utils::SECONDS_PER_DAY;

  fn titles(articles: &[Article]) -> Vec<&str> {
    articles.iter().map(|a| a.title.as_str()).collect()
  }

  #[test]
  fn only_published_and_due_articles_are_listed() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let cat_id = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    fixtures::published_article(&pool, "Visible", cat_id, user_id);
    let mut draft = fixtures::new_article("Draft", cat_id, user_id);
    draft.is_published = false;
    insert_article(&pool, &draft, fixtures::NOW).unwrap();
    let mut no_date = fixtures::new_article("No date", cat_id, user_id);
    no_date.published_at = None;
    insert_article(&pool, &no_date, fixtures::NOW).unwrap();
    let mut tomorrow = fixtures::new_article("Tomorrow", cat_id, user_id);
    tomorrow.published_at = Some(fixtures::NOW + SECONDS_PER_DAY);
    insert_article(&pool, &tomorrow, fixtures::NOW).unwrap();

    let page = published_articles_page(
      &pool, &ArticleFilters::default(), fixtures::NOW, 1, 12
    ).unwrap();
    assert_eq!(1, page.total);
    assert_eq!(vec!["Visible"], titles(&page.items));

    // Once the clock passes the date the scheduled one shows up:
    let page = published_articles_page(
      &pool, &ArticleFilters::default(), fixtures::NOW + SECONDS_PER_DAY, 1, 12
    ).unwrap();
    assert_eq!(2, page.total);
    assert_eq!(vec!["Tomorrow", "Visible"], titles(&page.items));
  }

  #[test]
  fn listing_is_newest_first_and_paginated() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let cat_id = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    for i in 0..14 {
      let mut article = fixtures::new_article(&format!("Article {}", i), cat_id, user_id);
      article.published_at = Some(fixtures::NOW - 1000 + i);
      insert_article(&pool, &article, fixtures::NOW).unwrap();
    }
    let first = published_articles_page(
      &pool, &ArticleFilters::default(), fixtures::NOW, 1, 12
    ).unwrap();
    assert_eq!(14, first.total);
    assert_eq!(12, first.items.len());
    assert_eq!("Article 13", first.items[0].title);
    let second = published_articles_page(
      &pool, &ArticleFilters::default(), fixtures::NOW, 2, 12
    ).unwrap();
    assert_eq!(vec!["Article 1", "Article 0"], titles(&second.items));
    // Past the end is empty, not an error:
    let third = published_articles_page(
      &pool, &ArticleFilters::default(), fixtures::NOW, 3, 12
    ).unwrap();
    assert!(third.items.is_empty());
    assert_eq!(14, third.total);
  }

  #[test]
  fn search_matches_body_only_articles() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let cat_id = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    let mut body_only = fixtures::new_article("Weekly digest", cat_id, user_id);
    body_only.content = "<p>New ransomware strain spotted</p>".to_string();
    insert_article(&pool, &body_only, fixtures::NOW).unwrap();
    fixtures::published_article(&pool, "Ransomware in the title", cat_id, user_id);
    fixtures::published_article(&pool, "Unrelated", cat_id, user_id);

    let filters = ArticleFilters {
      category: None,
      search: Some("ransomware".to_string())
    };
    let page = published_articles_page(&pool, &filters, fixtures::NOW, 1, 12).unwrap();
    let mut found = titles(&page.items);
    found.sort();
    assert_eq!(vec!["Ransomware in the title", "Weekly digest"], found);
  }

  #[test]
  fn search_wildcards_are_literal() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let cat_id = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    fixtures::published_article(&pool, "Patch 100% of servers", cat_id, user_id);
    fixtures::published_article(&pool, "Patch 100 servers", cat_id, user_id);
    let filters = ArticleFilters {
      category: None,
      search: Some("100%".to_string())
    };
    let page = published_articles_page(&pool, &filters, fixtures::NOW, 1, 12).unwrap();
    assert_eq!(vec!["Patch 100% of servers"], titles(&page.items));
  }

  #[test]
  fn category_filter_uses_the_slug() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let siber = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    let daerah = fixtures::category(&pool, "Berita Daerah", "berita-daerah");
    fixtures::published_article(&pool, "Siber", siber, user_id);
    fixtures::published_article(&pool, "Daerah", daerah, user_id);
    let filters = ArticleFilters {
      category: Some("berita-daerah".to_string()),
      search: None
    };
    let page = published_articles_page(&pool, &filters, fixtures::NOW, 1, 12).unwrap();
    assert_eq!(vec!["Daerah"], titles(&page.items));
    assert_eq!("Berita Daerah", page.items[0].category.name);
    let filters = ArticleFilters {
      category: Some("does-not-exist".to_string()),
      search: None
    };
    let page = published_articles_page(&pool, &filters, fixtures::NOW, 1, 12).unwrap();
    assert_eq!(0, page.total);
  }

  #[test]
  fn featured_and_latest_are_limited() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let cat_id = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    for i in 0..5 {
      let mut article = fixtures::new_article(&format!("Featured {}", i), cat_id, user_id);
      article.is_featured = true;
      article.published_at = Some(fixtures::NOW - 100 + i);
      insert_article(&pool, &article, fixtures::NOW).unwrap();
    }
    for i in 0..5 {
      let mut article = fixtures::new_article(&format!("Plain {}", i), cat_id, user_id);
      article.published_at = Some(fixtures::NOW - 50 + i);
      insert_article(&pool, &article, fixtures::NOW).unwrap();
    }
    let featured = featured_published_articles(&pool, fixtures::NOW, 3).unwrap();
    assert_eq!(vec!["Featured 4", "Featured 3", "Featured 2"], titles(&featured));
    let latest = latest_published_articles(&pool, fixtures::NOW, 6).unwrap();
    assert_eq!(6, latest.len());
    assert_eq!("Plain 4", latest[0].title);
    assert_eq!("Featured 4", latest[5].title);
  }

  #[test]
  fn related_articles_exclude_self_and_other_categories() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let siber = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    let daerah = fixtures::category(&pool, "Berita Daerah", "berita-daerah");
    for i in 0..5 {
      let mut article = fixtures::new_article(&format!("Siber {}", i), siber, user_id);
      article.published_at = Some(fixtures::NOW - 100 + i);
      insert_article(&pool, &article, fixtures::NOW).unwrap();
    }
    fixtures::published_article(&pool, "Daerah", daerah, user_id);
    let article = published_article_by_slug(&pool, "siber-4", fixtures::NOW)
      .unwrap()
      .unwrap();
    let related = related_articles(&pool, &article, fixtures::NOW, 3).unwrap();
    assert_eq!(vec!["Siber 3", "Siber 2", "Siber 1"], titles(&related));
  }

  #[test]
  fn slug_lookup_hides_unpublished() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let cat_id = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    let mut draft = fixtures::new_article("Draft", cat_id, user_id);
    draft.is_published = false;
    insert_article(&pool, &draft, fixtures::NOW).unwrap();
    assert!(published_article_by_slug(&pool, "draft", fixtures::NOW).unwrap().is_none());
    assert!(published_article_by_slug(&pool, "nope", fixtures::NOW).unwrap().is_none());
  }

  #[test]
  fn views_are_incremented_one_by_one() {
    let pool = memory_pool();
    let user_id = fixtures::user(&pool);
    let cat_id = fixtures::category(&pool, "Keamanan Siber", "keamanan-siber");
    let id = fixtures::published_article(&pool, "Counted", cat_id, user_id);
    for expected in 1..=5 {
      assert_eq!(expected, increment_views(&pool, id).unwrap());
    }
    let article = published_article_by_slug(&pool, "counted", fixtures::NOW)
      .unwrap()
      .unwrap();
    assert_eq!(5, article.views_count);
  }
}
