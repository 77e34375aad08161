use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

// One-shot status messages shown on the page after a redirect.
// The cookie only carries a key, never free text, so nobody
// can make the site display whatever they want.
pub const FLASH_COOKIE: &'static str = "flash";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flash {
  CommentSubmitted,
  ContactSent
}

impl Flash {
  const ALL: [Flash; 2] = [Flash::CommentSubmitted, Flash::ContactSent];

  pub fn key(&self) -> &'static str {
    match self {
      Flash::CommentSubmitted => "comment_submitted",
      Flash::ContactSent => "contact_sent"
    }
  }

  pub fn message(&self) -> &'static str {
    match self {
      Flash::CommentSubmitted => 
        "Comment submitted successfully. It will be reviewed before publication.",
      Flash::ContactSent => 
        "Thank you for your message. We will get back to you soon!"
    }
  }

  pub fn from_key(key: &str) -> Option<Flash> {
    Flash::ALL.iter().find(|f| f.key() == key).copied()
  }
}

pub fn redirect_with_flash(location: &str, flash: Flash) -> HttpResponse {
  HttpResponse::Found()
    .append_header((header::LOCATION, location))
    .cookie(
      Cookie::build(FLASH_COOKIE, flash.key())
        .path("/")
        .http_only(true)
        .finish()
    )
    .finish()
}

// Unknown keys are just ignored.
pub fn pending_flash(req: &HttpRequest) -> Option<Flash> {
  req.cookie(FLASH_COOKIE)
    .and_then(|c| Flash::from_key(c.value()))
}

pub fn has_flash_cookie(req: &HttpRequest) -> bool {
  req.cookie(FLASH_COOKIE).is_some()
}

pub fn removal_cookie() -> Cookie<'static> {
  let mut cookie = Cookie::build(FLASH_COOKIE, "")
    .path("/")
    .finish();
  cookie.make_removal();
  cookie
}
