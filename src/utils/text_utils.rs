use regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
  static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
  static ref HEX_COLOR: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

// Stole this from StackOverflow, of course
// https://stackoverflow.com/questions/53570839/quick-function-to-convert-a-strings-first-letter-to-uppercase
pub fn first_letter_to_upper(s1: String) -> String {
  let mut c = s1.chars();
  match c.next() {
    None => String::new(),
    Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
  }
}

// Length in characters and not bytes. All the length rules 
// on the forms are about what the user sees.
pub fn char_count(s: &str) -> usize {
  s.chars().count()
}

// String::truncate can panic when cutting a multibyte char
// in half, so we go through chars instead. Adds "..." when
// something was actually removed.
pub fn truncate_chars(s: &str, max: usize) -> String {
  if char_count(s) <= max {
    return s.to_string();
  }
  let mut truncated: String = s.chars().take(max).collect();
  truncated = truncated.trim_end().to_string();
  truncated.push_str("...");
  truncated
}

// URL-friendly version of a title. Transliterates to ASCII
// first so "Keamanan Siber: Édition" gives "keamanan-siber-edition".
pub fn slugify(value: &str) -> String {
  let ascii = deunicode::deunicode(value).to_lowercase();
  NON_SLUG_CHARS.replace_all(&ascii, "-")
    .trim_matches('-')
    .to_string()
}

pub fn is_hex_color(value: &str) -> bool {
  HEX_COLOR.is_match(value)
}

// Search terms go in a LIKE pattern as a bound parameter. The
// wildcards still have to be escaped or searching for "100%"
// matches pretty much everything. Used with ESCAPE '\'.
pub fn escape_like(term: &str) -> String {
  let mut escaped = String::with_capacity(term.len());
  for c in term.chars() {
    if c == '\\' || c == '%' || c == '_' {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}
