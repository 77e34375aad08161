use serde::Serialize;
use crate::config::SiteInfo;
use crate::db::entities::*;
use crate::db::helpers::excerpt_from_content;
use crate::db::Page;
use crate::utils::time_utils::{self, DateFormat};
use crate::utils::text_utils::first_letter_to_upper;
use super::flash::Flash;
use super::helpers;
use super::validation::{CommentForm, ContactForm, ValidationErrors};

// I'm using the From trait to convert entities to DTOs.
// DTOs are what the templates see: dates already formatted,
// URLs already built, no email addresses.

const EXCERPT_LENGTH: usize = 200;
// Shown for guest comments that somehow lost their author.
const ANONYMOUS: &'static str = "Anonymous";

#[derive(Debug, Serialize)]
pub struct UserDto {
  pub id: i64,
  pub name: String
}

impl From<User> for UserDto {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      name: user.name
    }
  }
}

#[derive(Debug, Serialize)]
pub struct CategoryDto {
  pub id: i64,
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub color: String,
  pub url: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub articles_count: Option<i64>,
  // Set on the listing page for the category filter:
  pub selected: bool
}

impl From<Category> for CategoryDto {
  fn from(category: Category) -> Self {
    let url = helpers::page_url(
      "/articles",
      &[("category", &Some(category.slug.clone()))],
      1
    );
    Self {
      id: category.id,
      name: category.name,
      slug: category.slug,
      description: category.description,
      color: category.color,
      url,
      articles_count: None,
      selected: false
    }
  }
}

impl From<CategoryWithCount> for CategoryDto {
  fn from(with_count: CategoryWithCount) -> Self {
    let mut dto = CategoryDto::from(with_count.category);
    dto.articles_count = Some(with_count.published_articles_count);
    dto
  }
}

#[derive(Debug, Serialize)]
pub struct ArticleDto {
  pub id: i64,
  pub title: String,
  pub slug: String,
  pub url: String,
  pub excerpt: String,
  pub content: String,
  pub featured_image: Option<String>,
  pub is_featured: bool,
  pub published_at: String,
  // For the datetime attribute of <time>:
  pub published_on: String,
  pub views_count: i64,
  pub category: CategoryDto,
  pub author: UserDto
}

impl From<Article> for ArticleDto {
  fn from(article: Article) -> Self {
    // The excerpt is optional, fall back to the start of
    // the content without markup.
    let excerpt = match article.excerpt {
      Some(e) if !e.trim().is_empty() => e,
      _ => excerpt_from_content(&article.content, EXCERPT_LENGTH)
    };
    Self {
      id: article.id,
      url: format!("/articles/{}", article.slug),
      title: article.title,
      slug: article.slug,
      excerpt,
      content: article.content,
      featured_image: article.featured_image,
      is_featured: article.is_featured,
      published_at: article.published_at
        .map(|ts| time_utils::timestamp_to_date_string(ts, DateFormat::Long))
        .unwrap_or_default(),
      published_on: article.published_at
        .map(|ts| time_utils::timestamp_to_date_string(ts, DateFormat::USCompact))
        .unwrap_or_default(),
      views_count: article.views_count,
      category: article.category.into(),
      author: article.author.into()
    }
  }
}

// The email of guest commenters is never sent to templates.
#[derive(Debug, Serialize)]
pub struct CommentDto {
  pub id: i64,
  pub author: String,
  pub is_guest: bool,
  pub content: String,
  pub date: String
}

impl From<Comment> for CommentDto {
  fn from(comment: Comment) -> Self {
    let is_guest = comment.user.is_none();
    let author = match comment.user {
      Some(user) => user.name,
      None => comment.author_name.unwrap_or_else(|| ANONYMOUS.to_string())
    };
    Self {
      id: comment.id,
      author,
      is_guest,
      content: comment.content,
      date: time_utils::timestamp_to_date_string(comment.created_at, DateFormat::Standard)
    }
  }
}

#[derive(Debug, Serialize)]
pub struct AnnouncementDto {
  pub id: i64,
  pub title: String,
  pub content: String,
  pub url: String,
  pub priority: Priority,
  pub priority_label: String,
  pub is_urgent: bool,
  pub date: String,
  pub expires_at: Option<String>,
  pub author: UserDto
}

impl From<Announcement> for AnnouncementDto {
  fn from(announcement: Announcement) -> Self {
    Self {
      id: announcement.id,
      url: format!("/announcements/{}", announcement.id),
      title: announcement.title,
      content: announcement.content,
      priority: announcement.priority,
      priority_label: first_letter_to_upper(announcement.priority.to_string()),
      is_urgent: announcement.priority == Priority::Urgent,
      date: time_utils::timestamp_to_date_string(
        announcement.created_at,
        DateFormat::Long
      ),
      expires_at: announcement.expires_at
        .map(|ts| time_utils::timestamp_to_date_string(ts, DateFormat::Standard)),
      author: announcement.author.into()
    }
  }
}

#[derive(Debug, Serialize)]
pub struct PaginationDto {
  pub page: usize,
  pub last_page: usize,
  pub total: usize,
  pub previous_url: Option<String>,
  pub next_url: Option<String>
}

impl PaginationDto {
  pub fn new<T>(
    page: &Page<T>,
    path: &str,
    filters: &[(&str, &Option<String>)]
  ) -> Self {
    Self {
      page: page.page,
      last_page: page.last_page(),
      total: page.total,
      previous_url: if page.has_previous() {
        Some(helpers::page_url(path, filters, page.page - 1))
      } else { None },
      next_url: if page.has_next() {
        Some(helpers::page_url(path, filters, page.page + 1))
      } else { None }
    }
  }
}

/* --- Page contexts given to handlebars --- */

// Common to every page, used by the header partial.
#[derive(Debug, Serialize)]
pub struct Layout<'a> {
  pub site: &'a SiteInfo,
  pub page_title: String,
  pub flash: Option<&'static str>
}

impl<'a> Layout<'a> {
  pub fn new(site: &'a SiteInfo, page_title: &str, flash: Option<Flash>) -> Self {
    let page_title = if page_title.is_empty() {
      site.title.clone()
    } else {
      format!("{} - {}", page_title, site.title)
    };
    Self {
      site,
      page_title,
      flash: flash.map(|f| f.message())
    }
  }
}

#[derive(Debug, Serialize)]
pub struct HomePage<'a> {
  pub layout: Layout<'a>,
  pub featured_articles: Vec<ArticleDto>,
  pub latest_articles: Vec<ArticleDto>,
  pub urgent_announcements: Vec<AnnouncementDto>,
  pub categories: Vec<CategoryDto>
}

// Filters are echoed back so the form keeps its state.
#[derive(Debug, Serialize)]
pub struct ArticleFiltersDto {
  pub category: Option<String>,
  pub search: Option<String>
}

#[derive(Debug, Serialize)]
pub struct ArticlesIndexPage<'a> {
  pub layout: Layout<'a>,
  pub articles: Vec<ArticleDto>,
  pub pagination: PaginationDto,
  pub categories: Vec<CategoryDto>,
  pub filters: ArticleFiltersDto
}

// What the comment form shows: the values that were sent
// and the errors, both empty on a fresh page.
#[derive(Debug, Default, Serialize)]
pub struct CommentFormState {
  pub content: String,
  pub author_name: String,
  pub author_email: String,
  pub errors: ValidationErrors
}

impl CommentFormState {
  pub fn with_errors(form: &CommentForm, errors: ValidationErrors) -> Self {
    Self {
      content: form.content.clone().unwrap_or_default(),
      author_name: form.author_name.clone().unwrap_or_default(),
      author_email: form.author_email.clone().unwrap_or_default(),
      errors
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ArticleShowPage<'a> {
  pub layout: Layout<'a>,
  pub article: ArticleDto,
  pub comments: Vec<CommentDto>,
  pub related_articles: Vec<ArticleDto>,
  pub comment_form: CommentFormState,
  pub comment_form_url: String,
  // Guests have to give a name and email with their comment:
  pub is_guest: bool
}

#[derive(Debug, Serialize)]
pub struct AnnouncementsIndexPage<'a> {
  pub layout: Layout<'a>,
  pub announcements: Vec<AnnouncementDto>,
  pub pagination: PaginationDto
}

#[derive(Debug, Serialize)]
pub struct AnnouncementShowPage<'a> {
  pub layout: Layout<'a>,
  pub announcement: AnnouncementDto
}

#[derive(Debug, Default, Serialize)]
pub struct ContactFormState {
  pub name: String,
  pub email: String,
  pub subject: String,
  pub message: String,
  pub errors: ValidationErrors
}

impl ContactFormState {
  pub fn with_errors(form: &ContactForm, errors: ValidationErrors) -> Self {
    Self {
      name: form.name.clone().unwrap_or_default(),
      email: form.email.clone().unwrap_or_default(),
      subject: form.subject.clone().unwrap_or_default(),
      message: form.message.clone().unwrap_or_default(),
      errors
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ContactPage<'a> {
  pub layout: Layout<'a>,
  pub form: ContactFormState
}
