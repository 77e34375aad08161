use rusqlite::params;
use color_eyre::Result;
use super::entities::*;
use super::mappers::{map_user, USER_FIELDS};
use super::{insert, select_one, Pool};

// Users belong to the authentication layer, the portal
// only needs them to show who wrote what. Inserting is 
// for the seeder and the tests.

pub fn insert_user(
  pool: &Pool,
  user: &NewUser,
  now: i64
) -> Result<i64> {
  insert(
    pool,
    "INSERT INTO users (name, email, created_at, updated_at) \
    VALUES (?1, ?2, ?3, ?3)",
    params![user.name, user.email, now]
  )
}

pub fn user_by_id(
  pool: &Pool,
  user_id: i64
) -> Result<Option<User>> {
  select_one(
    pool,
    &format!("SELECT {} FROM users WHERE users.id = ?", USER_FIELDS),
    params![user_id],
    map_user
  )
}
