mod config;
mod db;
mod utils;
mod app;
use dotenv::dotenv;
use color_eyre::Result;
use std::env;

#[actix_web::main]
async fn main() -> Result<()> {
  // Load the .env file, if any. Real environment
  // variables win over its content.
  dotenv().ok();
  // Logs everything at info level unless told otherwise:
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  env_logger::init();
  color_eyre::install()?;

  app::run().await
}
