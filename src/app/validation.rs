use std::collections::BTreeMap;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use crate::db::entities::ContactMessage;
use crate::utils::serde_utils::trimmed_or_none;
use crate::utils::text_utils::char_count;

// Form validation. Each field keeps only its first failing
// rule, that's the message displayed under the input.

const COMMENT_MIN_LENGTH: usize = 10;
const COMMENT_MAX_LENGTH: usize = 1000;
const NAME_MAX_LENGTH: usize = 100;
const EMAIL_MAX_LENGTH: usize = 255;
const SUBJECT_MAX_LENGTH: usize = 255;
const MESSAGE_MIN_LENGTH: usize = 10;
const MESSAGE_MAX_LENGTH: usize = 5000;

#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
  errors: BTreeMap<&'static str, &'static str>
}

impl ValidationErrors {
  pub fn add(&mut self, field: &'static str, message: &'static str) {
    self.errors.entry(field).or_insert(message);
  }

  pub fn get(&self, field: &str) -> Option<&'static str> {
    self.errors.get(field).copied()
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }
}

/* --- Forms as they come in, everything optional --- */

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CommentForm {
  pub content: Option<String>,
  pub author_name: Option<String>,
  pub author_email: Option<String>
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ContactForm {
  pub name: Option<String>,
  pub email: Option<String>,
  pub subject: Option<String>,
  pub message: Option<String>
}

// Author fields are None for logged in users, the user 
// id is stored instead.
#[derive(Debug, PartialEq)]
pub struct ValidComment {
  pub content: String,
  pub author_name: Option<String>,
  pub author_email: Option<String>
}

struct Rules<'a> {
  errors: &'a mut ValidationErrors
}

impl<'a> Rules<'a> {
  fn required(
    &mut self, 
    field: &'static str, 
    value: &Option<String>, 
    message: &'static str
  ) -> Option<String> {
    let value = trimmed_or_none(value);
    if value.is_none() {
      self.errors.add(field, message);
    }
    value
  }

  fn min_chars(&mut self, field: &'static str, value: &str, min: usize, message: &'static str) {
    if char_count(value) < min {
      self.errors.add(field, message);
    }
  }

  fn max_chars(&mut self, field: &'static str, value: &str, max: usize, message: &'static str) {
    if char_count(value) > max {
      self.errors.add(field, message);
    }
  }

  fn email(&mut self, field: &'static str, value: &str, message: &'static str) {
    if !EmailAddress::is_valid(value) {
      self.errors.add(field, message);
    }
  }
}

pub fn validate_comment(
  form: &CommentForm,
  is_guest: bool
) -> Result<ValidComment, ValidationErrors> {
  let mut errors = ValidationErrors::default();
  let mut rules = Rules { errors: &mut errors };

  let content = rules.required("content", &form.content, "Please enter your comment.");
  if let Some(c) = &content {
    rules.min_chars(
      "content", c, COMMENT_MIN_LENGTH, 
      "Comment must be at least 10 characters long."
    );
    rules.max_chars(
      "content", c, COMMENT_MAX_LENGTH, 
      "Comment cannot exceed 1000 characters."
    );
  }

  // Author fields only matter for guests and are dropped
  // otherwise.
  let (author_name, author_email) = if is_guest {
    let name = rules.required("author_name", &form.author_name, "Please enter your name.");
    if let Some(n) = &name {
      rules.max_chars(
        "author_name", n, NAME_MAX_LENGTH, 
        "Name cannot exceed 100 characters."
      );
    }
    let email = rules.required(
      "author_email", &form.author_email, "Please enter your email address."
    );
    if let Some(e) = &email {
      rules.email("author_email", e, "Please enter a valid email address.");
      rules.max_chars(
        "author_email", e, EMAIL_MAX_LENGTH, 
        "Email cannot exceed 255 characters."
      );
    }
    (name, email)
  } else {
    (None, None)
  };

  match (errors.is_empty(), content) {
    (true, Some(content)) => Ok(ValidComment {
      content,
      author_name,
      author_email
    }),
    _ => Err(errors)
  }
}

pub fn validate_contact(form: &ContactForm) -> Result<ContactMessage, ValidationErrors> {
  let mut errors = ValidationErrors::default();
  let mut rules = Rules { errors: &mut errors };

  let name = rules.required("name", &form.name, "Please enter your name.");
  if let Some(n) = &name {
    rules.max_chars("name", n, NAME_MAX_LENGTH, "Name cannot exceed 100 characters.");
  }
  let email = rules.required("email", &form.email, "Please enter your email address.");
  if let Some(e) = &email {
    rules.email("email", e, "Please enter a valid email address.");
    rules.max_chars("email", e, EMAIL_MAX_LENGTH, "Email cannot exceed 255 characters.");
  }
  let subject = rules.required("subject", &form.subject, "Please enter a subject.");
  if let Some(s) = &subject {
    rules.max_chars(
      "subject", s, SUBJECT_MAX_LENGTH, 
      "Subject cannot exceed 255 characters."
    );
  }
  let message = rules.required("message", &form.message, "Please enter your message.");
  if let Some(m) = &message {
    rules.min_chars(
      "message", m, MESSAGE_MIN_LENGTH, 
      "Message must be at least 10 characters long."
    );
    rules.max_chars(
      "message", m, MESSAGE_MAX_LENGTH, 
      "Message cannot exceed 5000 characters."
    );
  }

  match (name, email, subject, message) {
    (Some(name), Some(email), Some(subject), Some(message)) if errors.is_empty() => 
      Ok(ContactMessage { name, email, subject, message }),
    _ => Err(errors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn guest_form(content: &str) -> CommentForm {
    CommentForm {
      content: Some(content.to_string()),
      author_name: Some("Budi".to_string()),
      author_email: Some("budi@example.org".to_string())
    }
  }

  #[test]
  fn valid_guest_comment() {
    let valid = validate_comment(&guest_form("  Very useful article!  "), true).unwrap();
    assert_eq!("Very useful article!", valid.content);
    assert_eq!(Some("Budi".to_string()), valid.author_name);
    assert_eq!(Some("budi@example.org".to_string()), valid.author_email);
  }

  #[test]
  fn guest_without_name_or_email_is_rejected() {
    let form = CommentForm {
      content: Some("Very useful article!".to_string()),
      author_name: None,
      author_email: Some("   ".to_string())
    };
    let errors = validate_comment(&form, true).unwrap_err();
    assert_eq!(Some("Please enter your name."), errors.get("author_name"));
    assert_eq!(Some("Please enter your email address."), errors.get("author_email"));
    assert_eq!(None, errors.get("content"));
  }

  #[test]
  fn comment_length_limits() {
    let errors = validate_comment(&guest_form("Too short"), true).unwrap_err();
    assert_eq!(
      Some("Comment must be at least 10 characters long."), 
      errors.get("content")
    );
    // Exactly 10 and exactly 1000 are fine:
    assert!(validate_comment(&guest_form("0123456789"), true).is_ok());
    assert!(validate_comment(&guest_form(&"a".repeat(1000)), true).is_ok());
    let errors = validate_comment(&guest_form(&"a".repeat(1001)), true).unwrap_err();
    assert_eq!(Some("Comment cannot exceed 1000 characters."), errors.get("content"));
  }

  #[test]
  fn length_counts_characters_not_bytes() {
    // 10 characters but 20 bytes:
    assert!(validate_comment(&guest_form("éééééééééé"), true).is_ok());
    assert!(validate_comment(&guest_form(&"é".repeat(600)), true).is_ok());
  }

  #[test]
  fn missing_content_is_rejected() {
    let mut form = guest_form("");
    form.content = None;
    let errors = validate_comment(&form, true).unwrap_err();
    assert_eq!(Some("Please enter your comment."), errors.get("content"));
  }

  #[test]
  fn invalid_and_long_emails() {
    let mut form = guest_form("Very useful article!");
    form.author_email = Some("not-an-email".to_string());
    let errors = validate_comment(&form, true).unwrap_err();
    assert_eq!(Some("Please enter a valid email address."), errors.get("author_email"));
    form.author_email = Some(format!("{}@example.org", "a".repeat(250)));
    assert!(validate_comment(&form, true).is_err());
  }

  #[test]
  fn long_author_name_is_rejected() {
    let mut form = guest_form("Very useful article!");
    form.author_name = Some("n".repeat(101));
    let errors = validate_comment(&form, true).unwrap_err();
    assert_eq!(Some("Name cannot exceed 100 characters."), errors.get("author_name"));
  }

  #[test]
  fn logged_in_users_need_only_content() {
    let form = CommentForm {
      content: Some("Logged in comment".to_string()),
      author_name: Some("Ignored".to_string()),
      author_email: Some("not even an email".to_string())
    };
    let valid = validate_comment(&form, false).unwrap();
    assert_eq!(None, valid.author_name);
    assert_eq!(None, valid.author_email);
  }

  #[test]
  fn contact_form_rules() {
    let form = ContactForm {
      name: Some("Budi".to_string()),
      email: Some("budi@example.org".to_string()),
      subject: Some("Phishing report".to_string()),
      message: Some("I received a suspicious email this morning.".to_string())
    };
    let message = validate_contact(&form).unwrap();
    assert_eq!("Phishing report", message.subject);

    let errors = validate_contact(&ContactForm::default()).unwrap_err();
    assert_eq!(Some("Please enter your name."), errors.get("name"));
    assert_eq!(Some("Please enter your email address."), errors.get("email"));
    assert_eq!(Some("Please enter a subject."), errors.get("subject"));
    assert_eq!(Some("Please enter your message."), errors.get("message"));

    let mut short = form.clone();
    short.message = Some("Help".to_string());
    let errors = validate_contact(&short).unwrap_err();
    assert_eq!(Some("Message must be at least 10 characters long."), errors.get("message"));
  }

  #[test]
  fn errors_serialize_as_a_map() {
    let mut errors = ValidationErrors::default();
    errors.add("content", "first");
    errors.add("content", "second");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(serde_json::json!({ "content": "first" }), json);
  }
}
