// Adding the context method to errors:
use eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::convert::From;

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  pub bind_address: String,
  pub template_dir: String,
  // Rate limiter settings for the forms:
  pub rl_max_requests: u32,
  pub rl_max_requests_time: u32,
  pub rl_block_duration: u32,
  // "discard" or "store", see app::contact.
  pub contact_delivery: String,
  // Header set by the authentication proxy with the id
  // of the logged in user. Everybody is a guest when absent.
  pub trusted_user_header: Option<String>,
  // Used in page titles and the layout:
  pub site_title: String,
  pub site_description: String,
  pub site_root: String
}

// Having another struct is better than moving all of
// this info around the app_state, the templates get
// a copy of it and shouldn't see anything else from
// the config.
#[derive(Debug, Clone, Serialize)]
pub struct SiteInfo {
  pub title: String,
  pub description: String,
  pub root: String
}

impl From<&Config> for SiteInfo {
  fn from(config: &Config) -> Self {
    Self {
      title: config.site_title.clone(),
      description: config.site_description.clone(),
      root: config.site_root.clone()
    }
  }
}

impl Config {

  pub fn from_env() -> Result<Config> {
    // RUST_LOG is already set in main.rs if it
    // was absent.
    // Default values have to use lowercase when compared
    // to what's in the .env file.
    config::Config::builder()
      .set_default("bind_address", "127.0.0.1:8080")?
      .set_default("template_dir", "./templates")?
      // Settings for the basic rate limiter on the 
      // comment and contact forms:
      .set_default("rl_max_requests", 20)?
      .set_default("rl_max_requests_time", 60)?
      .set_default("rl_block_duration", 60)?
      .set_default("contact_delivery", "discard")?
      .set_default("site_title", "OKUTIMURKAB-CSIRT")?
      .set_default(
        "site_description", 
        "Computer Security Incident Response Team of Kabupaten OKU Timur"
      )?
      // Should never have a trailing slash.
      .set_default("site_root", "http://127.0.0.1:8080")?
      .add_source(config::Environment::default())
      .build()
      .context("Loading configuration from env")?
      // The error has to be given a context for 
      // color_eyre to work here:
      .try_deserialize()
      .context("Deserializing configuration")
  }

}
