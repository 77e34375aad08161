use actix_web::{
  http::StatusCode,
  HttpRequest,
  HttpResponse
};
use handlebars::Handlebars;
use log::error;
use serde::Serialize;
use url::form_urlencoded;
use super::error::Error;
use super::flash;

// Extracting Actix header values is kinda convoluted.
// They check for an error in the header value not 
// being convertable to string because of uh... 
// invalid characters or something.
pub fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
  req.headers().get(name)
    .and_then(|h| h.to_str().ok())
    .map(|v| v.trim().to_string())
}

// The auth proxy in front of the portal puts the id of the
// logged in user in a header. We only trust it if the header
// name was configured.
pub fn trusted_user_id(
  req: &HttpRequest, 
  trusted_user_header: &Option<String>
) -> Option<i64> {
  trusted_user_header.as_ref()
    .and_then(|name| header_value(req, name))
    .and_then(|value| value.parse::<i64>().ok())
    .filter(|id| *id > 0)
}

pub fn render<T: Serialize>(
  hb: &Handlebars<'_>,
  template: &str,
  data: &T
) -> Result<String, Error> {
  hb.render(template, data)
    .map_err(|e| {
      error!("A template engine error occured when rendering {}: {}", template, e);
      Error::InternalServerError("Template engine error".to_string())
    })
}

// Every page shows the pending flash message in the layout,
// so every HTML response also gets rid of the flash cookie.
pub fn html_response(
  req: &HttpRequest,
  status: StatusCode,
  body: String
) -> HttpResponse {
  let mut builder = HttpResponse::build(status);
  builder.content_type("text/html; charset=utf-8");
  if flash::has_flash_cookie(req) {
    builder.cookie(flash::removal_cookie());
  }
  builder.body(body)
}

// URL of a listing page, keeping the active filters. Empty
// filters are left out.
pub fn page_url(path: &str, filters: &[(&str, &Option<String>)], page: usize) -> String {
  let mut serializer = form_urlencoded::Serializer::new(String::new());
  for (name, value) in filters {
    if let Some(v) = value {
      serializer.append_pair(name, v);
    }
  }
  if page > 1 {
    serializer.append_pair("page", &page.to_string());
  }
  let query = serializer.finish();
  if query.is_empty() {
    path.to_string()
  } else {
    format!("{}?{}", path, query)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn user_id_only_from_configured_header() {
    let req = TestRequest::default()
      .insert_header(("X-Portal-User", "7"))
      .to_http_request();
    assert_eq!(None, trusted_user_id(&req, &None));
    assert_eq!(Some(7), trusted_user_id(&req, &Some("X-Portal-User".to_string())));
    assert_eq!(None, trusted_user_id(&req, &Some("X-Other".to_string())));
  }

  #[test]
  fn garbage_user_id_is_a_guest() {
    let req = TestRequest::default()
      .insert_header(("X-Portal-User", "admin"))
      .to_http_request();
    assert_eq!(None, trusted_user_id(&req, &Some("X-Portal-User".to_string())));
    let req = TestRequest::default()
      .insert_header(("X-Portal-User", "-3"))
      .to_http_request();
    assert_eq!(None, trusted_user_id(&req, &Some("X-Portal-User".to_string())));
  }

  #[test]
  fn page_urls_keep_filters() {
    let category = Some("keamanan-siber".to_string());
    let search = Some("ransomware & phishing".to_string());
    assert_eq!(
      "/articles?category=keamanan-siber&search=ransomware+%26+phishing&page=2",
      page_url("/articles", &[("category", &category), ("search", &search)], 2)
    );
    assert_eq!(
      "/articles?category=keamanan-siber",
      page_url("/articles", &[("category", &category), ("search", &None)], 1)
    );
    assert_eq!("/announcements?page=3", page_url("/announcements", &[], 3));
    assert_eq!("/announcements", page_url("/announcements", &[], 1));
  }
}
