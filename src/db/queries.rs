// The listing pages need WHERE clauses that depend on the
// request (category filter, search...) so I ended up with a
// small builder. It keeps the SQL text and the bound params
// together so they can't get out of order.

use std::fmt;
use rusqlite::types::Value;

pub enum Order {
  Asc,
  Desc
}

pub struct OrderBy {
  pub order: Order,
  pub field: String
}

impl OrderBy {
  pub fn new(order: Order, field: &str) -> Self {
    OrderBy {
      order,
      field: field.to_string()
    }
  }
}

// Decided to use the "builder pattern" they talk about 
// in Rust docs for query building.
// The "q_" in front of field names is just because "where"
// is a reserved keyword in Rust.
// WHERE clauses are always glued with AND, anything needing
// an OR goes in parentheses in a single clause.
pub struct SelectQuery {
  q_fields: Vec<String>,
  q_from: String,
  q_joins: Vec<String>,
  q_where: Vec<String>,
  q_params: Vec<Value>,
  q_order: Vec<OrderBy>,
  limit: Option<usize>,
  offset: Option<usize>
}

impl SelectQuery {

  pub fn new(fields: &[&str], from: &str) -> Self {
    SelectQuery {
      q_fields: fields.iter().map(|f| f.to_string()).collect(),
      q_from: from.to_string(),
      q_joins: Vec::new(),
      q_where: Vec::new(),
      q_params: Vec::new(),
      q_order: Vec::new(),
      limit: None,
      offset: None
    }
  }

  // Full join clause, e.g. "INNER JOIN users ON users.id = articles.user_id".
  // Joins never take parameters.
  pub fn join(mut self, join: &str) -> Self {
    self.q_joins.push(join.to_string());
    self
  }

  // One "?" in the clause per param, in order.
  pub fn where_clause(mut self, clause: &str, params: Vec<Value>) -> Self {
    self.q_where.push(clause.to_string());
    self.q_params.extend(params);
    self
  }

  pub fn order(mut self, order: OrderBy) -> Self {
    self.q_order.push(order);
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn offset(mut self, offset: usize) -> Self {
    self.offset = Some(offset);
    self
  }

  pub fn params(&self) -> &[Value] {
    &self.q_params
  }

  // Same query without fields, order and limit, to count
  // the total amount of rows for pagination. Uses the same
  // params as the query itself.
  pub fn count_query(&self) -> String {
    format!(
      "SELECT count(*) FROM {}{}",
      self.query_from_str(),
      self.query_where_str()
    )
  }

  fn query_from_str(&self) -> String {
    let mut from = self.q_from.clone();
    for join in &self.q_joins {
      from.push(' ');
      from.push_str(join);
    }
    from
  }

  // Get the "WHERE" part of the query
  fn query_where_str(&self) -> String {
    if self.q_where.is_empty() {
      String::new()
    } else {
      format!(" WHERE {}", self.q_where.join(" AND "))
    }
  }

}

// Creating the query string is done by implementing
// the Display trait, which gives us to_string().
impl fmt::Display for SelectQuery {

  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f, 
      "SELECT {} FROM {}{}",
      self.q_fields.join(", "),
      self.query_from_str(),
      self.query_where_str()
    )?;
    if !self.q_order.is_empty() {
      let order: Vec<String> = self.q_order.iter()
        .map(|o| format!(
          "{} {}", 
          o.field, 
          match o.order {
            Order::Asc => "ASC",
            Order::Desc => "DESC"
          }
        ))
        .collect();
      write!(f, " ORDER BY {}", order.join(", "))?;
    }
    // SQLite wants a LIMIT if there's an OFFSET, -1 means
    // no limit.
    match (self.limit, self.offset) {
      (Some(lim), Some(off)) => write!(f, " LIMIT {} OFFSET {}", lim, off),
      (Some(lim), None) => write!(f, " LIMIT {}", lim),
      (None, Some(off)) => write!(f, " LIMIT -1 OFFSET {}", off),
      (None, None) => Ok(())
    }
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn generate_simple_select() {
    let query = SelectQuery::new(
      &["my_table.name", "my_table.value"], 
      "my_table"
    );
    assert_eq!(
      "SELECT my_table.name, my_table.value FROM my_table", 
      query.to_string()
    );
    assert!(query.params().is_empty());
  }

  #[test]
  fn generate_full_select() {
    let query = SelectQuery::new(&["t1.name", "t2.value"], "t1")
      .join("INNER JOIN t2 ON t2.id = t1.t2_id")
      .where_clause("t1.id = ?", vec![Value::from(12i64)])
      .where_clause(
        "(t1.name LIKE ? OR t2.value LIKE ?)", 
        vec![Value::from("%a%".to_string()), Value::from("%a%".to_string())]
      )
      .order(OrderBy::new(Order::Desc, "t1.name"))
      .order(OrderBy::new(Order::Asc, "t1.id"))
      .limit(10)
      .offset(20);
    let expected = "SELECT t1.name, t2.value FROM t1 \
      INNER JOIN t2 ON t2.id = t1.t2_id \
      WHERE t1.id = ? AND (t1.name LIKE ? OR t2.value LIKE ?) \
      ORDER BY t1.name DESC, t1.id ASC LIMIT 10 OFFSET 20";
    assert_eq!(expected, query.to_string());
    assert_eq!(3, query.params().len());
    assert_eq!(Value::Integer(12), query.params()[0]);
  }

  #[test]
  fn count_query_ignores_order_and_limit() {
    let query = SelectQuery::new(&["t1.name"], "t1")
      .join("LEFT JOIN t2 ON t2.id = t1.t2_id")
      .where_clause("t1.active = 1", vec![])
      .order(OrderBy::new(Order::Desc, "t1.name"))
      .limit(10);
    assert_eq!(
      "SELECT count(*) FROM t1 LEFT JOIN t2 ON t2.id = t1.t2_id WHERE t1.active = 1",
      query.count_query()
    );
  }

  #[test]
  fn offset_without_limit() {
    let query = SelectQuery::new(&["id"], "t").offset(5);
    assert_eq!("SELECT id FROM t LIMIT -1 OFFSET 5", query.to_string());
  }
}
