use html2text::from_read_with_decorator;
use html2text::render::text_renderer::TrivialDecorator;
use crate::utils::text_utils::truncate_chars;

// Line width given to html2text. We collapse all the 
// whitespace afterwards anyway, it just has to be large
// enough to not hyphenate anything.
const STRIP_WIDTH: usize = 10000;

pub fn strip_html(html: &str) -> String {
  from_read_with_decorator(html.as_bytes(), STRIP_WIDTH, TrivialDecorator::new())
}

// Article excerpts are optional, the listing shows the
// beginning of the content without markup when missing.
pub fn excerpt_from_content(content: &str, max_chars: usize) -> String {
  let text = strip_html(content)
    .split_whitespace()
    .collect::<Vec<&str>>()
    .join(" ");
  truncate_chars(&text, max_chars)
}

// Pages are 1-based in URLs. None when the offset doesn't
// even fit in a usize, page numbers come straight from the
// query string.
pub fn page_offset(page: usize, per_page: usize) -> Option<usize> {
  page.saturating_sub(1).checked_mul(per_page)
}
