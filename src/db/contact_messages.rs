use rusqlite::params;
use color_eyre::Result;
use super::entities::ContactMessage;
use super::{insert, Pool};

// Only used when the contact delivery mode is "store".
pub fn insert_contact_message(
  pool: &Pool,
  message: &ContactMessage,
  now: i64
) -> Result<i64> {
  insert(
    pool,
    "INSERT INTO contact_messages (name, email, subject, message, created_at, updated_at) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    params![
      message.name,
      message.email,
      message.subject,
      message.message,
      now
    ]
  )
}

#[cfg(test)]
pub fn contact_message_count(pool: &Pool) -> Result<usize> {
  super::count(pool, "SELECT count(*) FROM contact_messages", [])
}
