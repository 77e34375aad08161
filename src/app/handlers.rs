use actix_web::{
  http::StatusCode,
  web,
  HttpResponse,
  HttpRequest,
  Result
};
use crate::db::entities::*;
use crate::db::{self, articles::ArticleFilters};
use crate::utils::serde_utils::trimmed_or_none;
use serde::Deserialize;
use log::{error, info, warn};
use handlebars::Handlebars;
use super::dtos::*;
use super::error::{Error, map_db_error};
use super::flash::{self, Flash};
use super::validation::{self, CommentForm, ContactForm};
use super::AppState;
use super::helpers;

// Module with all the page handler functions.

// Few constants I don't know where to put. They
// don't really qualify for the config file:
const ARTICLES_PER_PAGE: usize = 12;
const ANNOUNCEMENTS_PER_PAGE: usize = 10;
const HOME_FEATURED_ARTICLES: usize = 3;
const HOME_LATEST_ARTICLES: usize = 6;
const HOME_URGENT_ANNOUNCEMENTS: usize = 3;
const RELATED_ARTICLES: usize = 3;

/* --- Request body or query or form objects --- */
// These have to be public.
#[derive(Deserialize)]
pub struct ArticlesQuery {
  pub category: Option<String>,
  pub search: Option<String>,
  pub page: Option<usize>
}

#[derive(Deserialize)]
pub struct PageQuery {
  pub page: Option<usize>
}
/* --- End request body or query or form objects --- */

// Pages are 1-based, page=0 is just page 1.
fn page_number(page: Option<usize>) -> usize {
  page.filter(|p| *p > 0).unwrap_or(1)
}

// A user id in the trusted header that doesn't exist in
// the database just makes you a guest.
fn current_user(
  app_state: &AppState,
  req: &HttpRequest
) -> Result<Option<User>, Error> {
  match helpers::trusted_user_id(req, &app_state.trusted_user_header) {
    Some(id) => {
      let user = db::users::user_by_id(&app_state.pool, id)
        .map_err(map_db_error)?;
      if user.is_none() {
        warn!("Unknown user id {} in the trusted user header", id);
      }
      Ok(user)
    },
    None => Ok(None)
  }
}

fn published_article(app_state: &AppState, slug: &str) -> Result<Article, Error> {
  db::articles::published_article_by_slug(&app_state.pool, slug, app_state.now())
    .map_err(map_db_error)?
    .ok_or_else(|| Error::NotFound(format!("No published article for slug {}", slug)))
}

// Used by both the article page and the comment form when
// it has errors, which re-displays the whole article.
fn render_article(
  app_state: &AppState,
  hb: &Handlebars<'_>,
  req: &HttpRequest,
  status: StatusCode,
  article: Article,
  comment_form: CommentFormState,
  is_guest: bool
) -> Result<HttpResponse, Error> {
  let now = app_state.now();
  let comments = db::comments::approved_comments_for_article(
    &app_state.pool,
    article.id
  ).map_err(map_db_error)?;
  let related = db::articles::related_articles(
    &app_state.pool,
    &article,
    now,
    RELATED_ARTICLES
  ).map_err(map_db_error)?;

  let data = ArticleShowPage {
    layout: Layout::new(&app_state.site_info, &article.title, flash::pending_flash(req)),
    comment_form_url: format!("/articles/{}/comments", article.slug),
    article: article.into(),
    comments: comments.into_iter().map(Into::into).collect(),
    related_articles: related.into_iter().map(Into::into).collect(),
    comment_form,
    is_guest
  };
  let body = helpers::render(hb, "article_show", &data)?;
  Ok(helpers::html_response(req, status, body))
}

fn render_contact(
  app_state: &AppState,
  hb: &Handlebars<'_>,
  req: &HttpRequest,
  status: StatusCode,
  form: ContactFormState
) -> Result<HttpResponse, Error> {
  let data = ContactPage {
    layout: Layout::new(&app_state.site_info, "Contact", flash::pending_flash(req)),
    form
  };
  let body = helpers::render(hb, "contact", &data)?;
  Ok(helpers::html_response(req, status, body))
}

pub async fn index(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let pool = &app_state.pool;
  let now = app_state.now();
  // Four separate queries, nothing here needs to be
  // consistent with the rest.
  let featured_articles = db::articles::featured_published_articles(
    pool, now, HOME_FEATURED_ARTICLES
  ).map_err(map_db_error)?;
  let latest_articles = db::articles::latest_published_articles(
    pool, now, HOME_LATEST_ARTICLES
  ).map_err(map_db_error)?;
  let urgent_announcements = db::announcements::urgent_announcements(
    pool, now, HOME_URGENT_ANNOUNCEMENTS
  ).map_err(map_db_error)?;
  let categories = db::categories::active_categories_with_counts(pool, now)
    .map_err(map_db_error)?;

  let data = HomePage {
    layout: Layout::new(&app_state.site_info, "", flash::pending_flash(&req)),
    featured_articles: featured_articles.into_iter().map(Into::into).collect(),
    latest_articles: latest_articles.into_iter().map(Into::into).collect(),
    urgent_announcements: urgent_announcements.into_iter().map(Into::into).collect(),
    categories: categories.into_iter().map(Into::into).collect()
  };
  let body = helpers::render(&hb, "home", &data)?;
  Ok(helpers::html_response(&req, StatusCode::OK, body))
}

// Default response when no route matched the request:
pub async fn not_found() -> Result<HttpResponse, Error> {
  Err(Error::NotFound(String::from("Endpoint doesn't exist")))
}

pub async fn articles(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  query: web::Query<ArticlesQuery>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let filters = ArticleFilters {
    category: trimmed_or_none(&query.category),
    search: trimmed_or_none(&query.search)
  };
  let page = db::articles::published_articles_page(
    &app_state.pool,
    &filters,
    app_state.now(),
    page_number(query.page),
    ARTICLES_PER_PAGE
  )
    .map_err(map_db_error)?
    .map(ArticleDto::from);
  let categories = db::categories::active_categories(&app_state.pool)
    .map_err(map_db_error)?;

  let pagination = PaginationDto::new(
    &page,
    "/articles",
    &[("category", &filters.category), ("search", &filters.search)]
  );
  let data = ArticlesIndexPage {
    layout: Layout::new(&app_state.site_info, "Articles", flash::pending_flash(&req)),
    articles: page.items,
    pagination,
    categories: categories.into_iter()
      .map(|c| {
        let mut dto = CategoryDto::from(c);
        dto.selected = filters.category.as_deref() == Some(dto.slug.as_str());
        dto
      })
      .collect(),
    filters: ArticleFiltersDto {
      category: filters.category,
      search: filters.search
    }
  };
  let body = helpers::render(&hb, "articles_index", &data)?;
  Ok(helpers::html_response(&req, StatusCode::OK, body))
}

// Path variables have to be in a tuple.
pub async fn article(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  path: web::Path<(String,)>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let slug = path.into_inner().0;
  let mut article = published_article(&app_state, &slug)?;
  // Every view counts, no deduplication of any kind.
  article.views_count = db::articles::increment_views(&app_state.pool, article.id)
    .map_err(map_db_error)?;
  let is_guest = current_user(&app_state, &req)?.is_none();
  render_article(
    &app_state,
    &hb,
    &req,
    StatusCode::OK,
    article,
    CommentFormState::default(),
    is_guest
  )
}

pub async fn post_comment(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  path: web::Path<(String,)>,
  comment_form: web::Form<CommentForm>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let slug = path.into_inner().0;
  let article = published_article(&app_state, &slug)?;
  let user = current_user(&app_state, &req)?;

  let comment = match validation::validate_comment(&comment_form, user.is_none()) {
    Ok(c) => c,
    Err(errors) => {
      // Show the article again with the messages. That's
      // not a view, the counter stays where it is.
      return render_article(
        &app_state,
        &hb,
        &req,
        StatusCode::UNPROCESSABLE_ENTITY,
        article,
        CommentFormState::with_errors(&comment_form, errors),
        user.is_none()
      );
    }
  };

  // This is where I decide to check with my really basic
  // homemade rate limiter:
  if app_state.check_rate_limit() {
    return Err(Error::TooManyRequests);
  }

  let comment_id = db::comments::insert_comment(
    &app_state.pool,
    &NewComment {
      article_id: article.id,
      user_id: user.map(|u| u.id),
      author_name: comment.author_name,
      author_email: comment.author_email,
      content: comment.content
    },
    app_state.now()
  ).map_err(|e| {
    error!("Could not insert a comment - {:?}", e);
    Error::DatabaseError(format!("Failed to insert comment - {}", e))
  })?;
  info!("Comment {} posted on article {}, waiting for approval", comment_id, article.id);

  Ok(flash::redirect_with_flash(
    &format!("/articles/{}", article.slug),
    Flash::CommentSubmitted
  ))
}

pub async fn announcements(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  query: web::Query<PageQuery>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let page = db::announcements::visible_announcements_page(
    &app_state.pool,
    app_state.now(),
    page_number(query.page),
    ANNOUNCEMENTS_PER_PAGE
  )
    .map_err(map_db_error)?
    .map(AnnouncementDto::from);

  let pagination = PaginationDto::new(&page, "/announcements", &[]);
  let data = AnnouncementsIndexPage {
    layout: Layout::new(&app_state.site_info, "Announcements", flash::pending_flash(&req)),
    announcements: page.items,
    pagination
  };
  let body = helpers::render(&hb, "announcements_index", &data)?;
  Ok(helpers::html_response(&req, StatusCode::OK, body))
}

pub async fn announcement(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  path: web::Path<(String,)>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  // Anything that isn't an id can't be an announcement,
  // that's a 404 and not a bad request.
  let id = path.into_inner().0.parse::<i64>()
    .map_err(|_| Error::NotFound("Announcement id is not a number".to_string()))?;
  let announcement = db::announcements::visible_announcement_by_id(
    &app_state.pool,
    id,
    app_state.now()
  )
    .map_err(map_db_error)?
    .ok_or_else(|| Error::NotFound(format!("No visible announcement with id {}", id)))?;

  let data = AnnouncementShowPage {
    layout: Layout::new(&app_state.site_info, &announcement.title, flash::pending_flash(&req)),
    announcement: announcement.into()
  };
  let body = helpers::render(&hb, "announcement_show", &data)?;
  Ok(helpers::html_response(&req, StatusCode::OK, body))
}

pub async fn contact(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  render_contact(&app_state, &hb, &req, StatusCode::OK, ContactFormState::default())
}

pub async fn post_contact(
  app_state: web::Data<AppState>,
  hb: web::Data<Handlebars<'_>>,
  contact_form: web::Form<ContactForm>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let message = match validation::validate_contact(&contact_form) {
    Ok(m) => m,
    Err(errors) => return render_contact(
      &app_state,
      &hb,
      &req,
      StatusCode::UNPROCESSABLE_ENTITY,
      ContactFormState::with_errors(&contact_form, errors)
    )
  };

  if app_state.check_rate_limit() {
    return Err(Error::TooManyRequests);
  }

  app_state.contact_service
    .deliver(&app_state.pool, &message, app_state.now())
    .map_err(|e| {
      error!("Could not deliver a contact message - {:?}", e);
      Error::InternalServerError(format!("Contact delivery failed - {}", e))
    })?;

  Ok(flash::redirect_with_flash("/contact", Flash::ContactSent))
}
