// Form inputs come in as strings that may be empty or just
// whitespace. They're trimmed and empty strings become None
// during the form -> domain conversion.
pub fn empty_string_to_none(value: Option<String>) -> Option<String> {
  match value {
    Some(s) => if s.is_empty() 
      { None } else { Some(s) },
    None => None
  }
}

pub fn trimmed_or_none(value: &Option<String>) -> Option<String> {
  empty_string_to_none(
    value.as_ref().map(|s| s.trim().to_string())
  )
}
