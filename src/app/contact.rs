use std::str::FromStr;
use color_eyre::Result;
use eyre::eyre;
use log::info;
use crate::db::{self, Pool};
use crate::db::entities::ContactMessage;

// What happens to messages sent through the contact form.
// No emails are sent. Until that's decided, a message is
// either dropped or kept in the database for someone to read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactDelivery {
  Discard,
  Store
}

impl FromStr for ContactDelivery {
  type Err = eyre::Report;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "discard" => Ok(ContactDelivery::Discard),
      "store" => Ok(ContactDelivery::Store),
      other => Err(eyre!(
        "Unknown contact_delivery \"{}\", use \"discard\" or \"store\"", 
        other
      ))
    }
  }
}

pub struct ContactService {
  delivery: ContactDelivery
}

impl ContactService {

  pub fn new(delivery: ContactDelivery) -> Self {
    Self {
      delivery
    }
  }

  pub fn deliver(
    &self,
    pool: &Pool,
    message: &ContactMessage,
    now: i64
  ) -> Result<()> {
    match self.delivery {
      ContactDelivery::Discard => {
        info!(
          "Contact message \"{}\" discarded (contact_delivery is \"discard\")", 
          message.subject
        );
        Ok(())
      },
      ContactDelivery::Store => {
        let id = db::contact_messages::insert_contact_message(pool, message, now)?;
        info!("Contact message stored with id {}", id);
        Ok(())
      }
    }
  }

}
