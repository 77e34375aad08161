#![allow(dead_code)]
mod config;
mod db;
mod utils;
mod seed;

use std::env;
use color_eyre::Result;
use eyre::{eyre, WrapErr};
use dotenv::dotenv;
use log::info;
use getopts::Options;
use crate::db::Pool;
use crate::config::Config;
use crate::utils::time_utils::current_timestamp;

// Copy pasted this from getopts doc.
fn print_usage(program: &str, opts: Options) {
  let brief = format!("Usage: {} [options]", program);
  print!("{}", opts.usage(&brief));
}

// Approving is the only way a comment ever shows up on
// the website.
fn approve(pool: &Pool, comment_id: i64, now: i64) -> Result<()> {
  if db::comments::approve_comment(pool, comment_id, now)? {
    info!("Comment {} approved", comment_id);
    return Ok(());
  }
  match db::comments::comment_by_id(pool, comment_id)? {
    Some(_) => {
      info!("Comment {} was already approved", comment_id);
      Ok(())
    },
    None => Err(eyre!("No comment with id {}", comment_id))
  }
}

/**
 * Binary meant to perform the administrative tasks the
 * website doesn't do: creating the tables, loading demo
 * data and approving comments.
 */
fn main() -> Result<()> {
  dotenv().ok();
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  env_logger::init();
  color_eyre::install()?;

  let args: Vec<String> = env::args().collect();
  let program = args[0].clone();
  let mut opts = Options::new();
  opts.optflag("m", "migrate", "Create the database tables if they don't exist");
  opts.optflag("s", "seed", "Insert the demo data set");
  opts.optopt("a", "approve", "Approve the comment with that id", "COMMENT_ID");
  opts.optflag("h", "help", "Program usage");
  let opt_matches = opts.parse(&args[1..])?;
  if opt_matches.opt_present("h") {
    print_usage(&program, opts);
    return Ok(());
  }

  let wants_something = opt_matches.opt_present("m")
    || opt_matches.opt_present("s")
    || opt_matches.opt_present("a");
  if !wants_something {
    print_usage(&program, opts);
    return Ok(());
  }

  let config = Config::from_env()
    .context("Configuration (environment or .env file) is missing")?;
  // One connection is all this needs, and seeding relies on it.
  let pool = db::open_single_connection_pool(&config.db_path)?;
  let now = current_timestamp();

  // Seeding needs the tables, so migrate goes first.
  if opt_matches.opt_present("m") || opt_matches.opt_present("s") {
    db::migrate(&pool)?;
    info!("Database schema is up to date");
  }

  if opt_matches.opt_present("s") {
    seed::seed(&pool, now)?;
  }

  if let Some(id) = opt_matches.opt_str("a") {
    let comment_id = id.parse::<i64>()
      .with_context(|| format!("Invalid comment id: {}", id))?;
    approve(&pool, comment_id, now)?;
  }

  Ok(())
}
