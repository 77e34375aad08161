use actix_web::{middleware, web, App, HttpServer};
use color_eyre::Result;
use eyre::WrapErr;
use log::{debug, error, info};
use handlebars::Handlebars;
use rate_limiter::BasicRateLimiter;
use contact::{ContactDelivery, ContactService};
use std::sync::{Arc, RwLock};
// I think we have to add crate here because
// of the other crate named "config" that we
// use as a dependency.
use crate::config::{Config, SiteInfo};
use crate::db::{self, Pool};
use crate::utils::clock::{Clock, SystemClock};
mod handlers;
mod dtos;
mod error;
mod helpers;
mod rate_limiter;
mod flash;
mod validation;
mod contact;

// Declare app state struct:
pub struct AppState {
  pub pool: Pool,
  pub clock: Arc<dyn Clock>,
  pub rate_limiter: RwLock<BasicRateLimiter>,
  pub contact_service: ContactService,
  pub site_info: SiteInfo,
  pub trusted_user_header: Option<String>
}

impl AppState {

  pub fn now(&self) -> i64 {
    self.clock.now()
  }

  // Returns true when the current write request has to be
  // refused.
  pub fn check_rate_limit(&self) -> bool {
    let now = self.now();
    let (needs_update, is_locked) = self.rate_limiter_needs_update(now);
    if needs_update {
      // Get a lock on the rate limiter:
      match self.rate_limiter.write() {
        Ok(mut rl) => return rl.update(now),
        Err(e) => {
          error!("Could not get a write handle on the \
          rate limiter, SHOULD NEVER HAPPEN - {}", e);
        }
      }
    }
    is_locked
  }

  // Returns tuple: "needs update" first, then the current
  // is_locked value.
  fn rate_limiter_needs_update(&self, now: i64) -> (bool, bool) {
    match self.rate_limiter.read() {
      Ok(rl) => (
        !rl.is_locked() || rl.is_expired(now),
        rl.is_locked()
      ),
      Err(e) => {
        // I decided to ignore possible weird rate limiter lock
        // errors which should never happen.
        error!("Could not get a read handle on the rate limiter - \
          SHOULD NEVER HAPPEN - {}", e);
        (false, false)
      }
    }
  }

}

pub fn load_templates(template_dir: &str) -> Result<Handlebars<'static>> {
  // Templates are HTML, the default escaping stays on.
  let mut handlebars = Handlebars::new();
  handlebars
    .register_templates_directory(".hbs", template_dir)
    .with_context(|| format!(
      "Loading templates from {} - directory might be missing or not accessible",
      template_dir
    ))?;
  Ok(handlebars)
}

// Function to start the server.
// Has to be async because there should be a .await at the end.
pub async fn run() -> Result<()> {
  let config = Config::from_env()
    .context("Configuration (environment or .env file) is missing")?;
  debug!("Current config: {:?}", config);

  let pool = db::open_pool(&config.db_path)?;
  // Creating the tables is idempotent, might as well do it
  // on every start.
  db::migrate(&pool)?;

  let delivery: ContactDelivery = config.contact_delivery.parse()?;
  info!("Contact form delivery mode: {:?}", delivery);

  // Delcare the template system, currently using
  // handlebars:
  let handlebars_ref = web::Data::new(load_templates(&config.template_dir)?);

  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let bind_address = config.bind_address.clone();

  let app_state = web::Data::new(
    AppState {
      pool,
      rate_limiter: RwLock::new(
        BasicRateLimiter::new(
          config.rl_max_requests,
          config.rl_max_requests_time,
          config.rl_block_duration,
          clock.now()
        )
      ),
      clock,
      contact_service: ContactService::new(delivery),
      site_info: SiteInfo::from(&config),
      trusted_user_header: config.trusted_user_header
    }
  );

  info!("Starting server on {}", bind_address);
  HttpServer::new(move|| {
    App::new()
      .app_data(app_state.clone())
      .app_data(handlebars_ref.clone())
      .app_data(query_config())
      .app_data(form_config())
      .wrap(middleware::Logger::default())
      .configure(base_endpoints_config)
      .default_service(web::route().to(handlers::not_found))
  })
  .bind(bind_address)?
  .run()
  .await
  .context("Start Actix web server")
}

fn query_config() -> web::QueryConfig {
  web::QueryConfig::default().error_handler(|_, _| {
    error::Error::BadRequest("Invalid query string arguments".to_string()).into()
  })
}

fn form_config() -> web::FormConfig {
  web::FormConfig::default().error_handler(|_, _| {
    error::Error::BadRequest("Invalid form body".to_string()).into()
  })
}

// Route configuration:
fn base_endpoints_config(cfg: &mut web::ServiceConfig) {
  cfg.route("/", web::get().to(handlers::index))
    .route("/articles", web::get().to(handlers::articles))
    .route("/articles/{slug}", web::get().to(handlers::article))
    .route("/articles/{slug}/comments", web::post().to(handlers::post_comment))
    .route("/announcements", web::get().to(handlers::announcements))
    .route("/announcements/{id}", web::get().to(handlers::announcement))
    .route("/contact", web::get().to(handlers::contact))
    .route("/contact", web::post().to(handlers::post_contact));
}
