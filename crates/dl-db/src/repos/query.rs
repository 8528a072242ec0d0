//! Ad-hoc SQL console.
//!
//! Read statements run as plain queries. Everything else, including writes
//! with a `RETURNING` clause and multi-statement input, runs in a
//! transaction that commits on success and rolls back on failure, with the
//! driver's error text passed through unchanged.

use tracing::{debug, warn};

use dl_core::responses::QueryOutcome;

use crate::error::DatabaseError;
use crate::helpers::{collect_result_set, json_to_value};
use crate::service::DataLinkService;

/// Leading keywords of statements that produce rows.
const ROW_KEYWORDS: &[&str] = &["SELECT", "WITH", "PRAGMA", "EXPLAIN", "VALUES"];

/// Leading keywords refused when destructive statements are disallowed.
const DESTRUCTIVE_KEYWORDS: &[&str] = &["DROP", "DELETE", "TRUNCATE", "ALTER", "UPDATE", "REPLACE"];

/// Leading keywords of statements that may carry a `RETURNING` clause.
const WRITE_KEYWORDS: &[&str] = &["INSERT", "UPDATE", "DELETE", "REPLACE"];

/// Which statements the console may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPolicy {
    pub allow_destructive: bool,
}

impl ExecutionPolicy {
    /// Anything the engine accepts.
    pub const UNRESTRICTED: Self = Self {
        allow_destructive: true,
    };

    /// Refuse `DROP`, `DELETE`, `TRUNCATE`, `ALTER`, `UPDATE`, and `REPLACE`
    /// (including `INSERT OR REPLACE`).
    pub const NON_DESTRUCTIVE: Self = Self {
        allow_destructive: false,
    };

    /// Check every statement in `sql` against the policy.
    ///
    /// # Errors
    ///
    /// `Refused` naming the first destructive keyword found.
    pub fn check(self, sql: &str) -> Result<(), DatabaseError> {
        if self.allow_destructive {
            return Ok(());
        }
        match destructive_keyword(sql) {
            Some(keyword) => Err(DatabaseError::Refused(format!(
                "{keyword} statements are disabled (admin.allow_destructive_sql = false)"
            ))),
            None => Ok(()),
        }
    }
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self::UNRESTRICTED
    }
}

/// Remove `--` line comments and `/* */` block comments, leaving string
/// literals intact.
fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                out.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Split `sql` into its `;`-separated statements, with comments removed.
/// Semicolons inside quoted text do not split. Blank statements are dropped.
fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in strip_comments(sql).chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if matches!(ch, '\'' | '"' | '`') => quote = Some(ch),
            None if ch == ';' => {
                statements.push(std::mem::take(&mut current));
                continue;
            }
            None => {}
        }
        current.push(ch);
    }
    statements.push(current);
    statements
        .into_iter()
        .map(|statement| statement.trim().to_string())
        .filter(|statement| !statement.is_empty())
        .collect()
}

/// `statement` with the contents of every quoted span removed, so that
/// words inside string literals and quoted identifiers are not read as
/// keywords.
fn strip_literals(statement: &str) -> String {
    let mut out = String::with_capacity(statement.len());
    let mut quote: Option<char> = None;
    for ch in statement.chars() {
        match quote {
            Some(q) if ch == q => {
                quote = None;
                out.push(ch);
            }
            Some(_) => {}
            None => {
                if matches!(ch, '\'' | '"' | '`') {
                    quote = Some(ch);
                }
                out.push(ch);
            }
        }
    }
    out
}

/// Uppercased bare words of `statement` outside quoted text, each paired
/// with whether it is called like a function (`replace(...)`).
fn words(statement: &str) -> Vec<(String, bool)> {
    let bare = strip_literals(statement);
    let mut found = Vec::new();
    let mut rest = bare.as_str();
    while let Some(start) = rest.find(|c: char| c.is_ascii_alphabetic() || c == '_') {
        let tail = &rest[start..];
        let len = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        let is_call = tail[len..].trim_start().starts_with('(');
        found.push((tail[..len].to_ascii_uppercase(), is_call));
        rest = &tail[len..];
    }
    found
}

/// First keyword of a statement, uppercased.
fn first_keyword(statement: &str) -> Option<String> {
    let word: String = statement
        .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    if word.is_empty() {
        None
    } else {
        Some(word.to_ascii_uppercase())
    }
}

/// Leading keyword of `sql` after whitespace and comments.
#[must_use]
pub fn leading_keyword(sql: &str) -> Option<String> {
    first_keyword(&strip_comments(sql))
}

/// Whether `sql` only reads, answering with rows.
fn is_read_query(sql: &str) -> bool {
    leading_keyword(sql).is_some_and(|kw| ROW_KEYWORDS.contains(&kw.as_str()))
}

/// Whether `sql` writes and carries a `RETURNING` clause.
fn has_returning_clause(sql: &str) -> bool {
    let stripped = strip_comments(sql);
    first_keyword(&stripped).is_some_and(|kw| WRITE_KEYWORDS.contains(&kw.as_str()))
        && words(&stripped)
            .iter()
            .any(|(word, is_call)| word == "RETURNING" && !is_call)
}

/// Whether `sql` is answered with rows rather than an affected-row count.
#[must_use]
pub fn returns_rows(sql: &str) -> bool {
    is_read_query(sql) || has_returning_clause(sql)
}

/// First destructive keyword in any `;`-separated statement of `sql`.
///
/// `INSERT OR REPLACE` counts as `REPLACE`. A statement led by `WITH` is
/// scanned for a destructive keyword anywhere outside quoted text, since a
/// CTE can front a `DELETE` or `UPDATE`.
#[must_use]
pub fn destructive_keyword(sql: &str) -> Option<String> {
    for statement in split_statements(sql) {
        let Some(keyword) = first_keyword(&statement) else {
            continue;
        };
        if DESTRUCTIVE_KEYWORDS.contains(&keyword.as_str()) {
            return Some(keyword);
        }
        let tokens = words(&statement);
        let replaces = tokens
            .windows(3)
            .any(|w| w[0].0 == "INSERT" && w[1].0 == "OR" && w[2].0 == "REPLACE");
        if replaces {
            return Some("REPLACE".to_string());
        }
        if keyword == "WITH" {
            let found = tokens
                .into_iter()
                .find(|(word, is_call)| !is_call && DESTRUCTIVE_KEYWORDS.contains(&word.as_str()));
            if let Some((word, _)) = found {
                return Some(word);
            }
        }
    }
    None
}

fn query_failure(error: DatabaseError) -> DatabaseError {
    match error {
        DatabaseError::LibSql(inner) => DatabaseError::Query(inner.to_string()),
        other => other,
    }
}

impl DataLinkService {
    /// Run user-supplied SQL with optional positional parameters.
    ///
    /// Several `;`-separated statements run in order in one transaction and
    /// report their summed affected-row count; parameters and row-returning
    /// statements are only accepted on their own.
    ///
    /// # Errors
    ///
    /// `Validation` for empty input or an unsupported statement mix,
    /// `Refused` when the policy blocks it, `Query` with the driver's message
    /// when execution fails (after rolling back).
    pub async fn execute(
        &self,
        sql: &str,
        params: Option<&[serde_json::Value]>,
        policy: ExecutionPolicy,
    ) -> Result<QueryOutcome, DatabaseError> {
        let statements = split_statements(sql);
        if statements.is_empty() {
            return Err(DatabaseError::Validation("empty SQL statement".into()));
        }
        policy.check(sql)?;

        let params: Vec<libsql::Value> = params
            .unwrap_or_default()
            .iter()
            .map(json_to_value)
            .collect();

        if statements.len() > 1 {
            if !params.is_empty() {
                return Err(DatabaseError::Validation(
                    "parameters can only be bound to a single statement".into(),
                ));
            }
            if let Some(position) = statements.iter().position(|s| returns_rows(s)) {
                return Err(DatabaseError::Validation(format!(
                    "statement {} returns rows; run it on its own",
                    position + 1
                )));
            }
            return self.execute_batch(&statements).await;
        }

        let conn = self.db().conn();
        if is_read_query(sql) {
            debug!(%sql, "running query");
            let rows = conn
                .query(sql, libsql::params_from_iter(params))
                .await
                .map_err(|e| DatabaseError::Query(e.to_string()))?;
            let result = collect_result_set(rows).await.map_err(query_failure)?;
            return Ok(QueryOutcome::Rows(result));
        }

        debug!(%sql, "executing statement in transaction");
        let tx = conn.transaction().await?;
        let outcome = if has_returning_clause(sql) {
            match tx.query(sql, libsql::params_from_iter(params)).await {
                Ok(rows) => collect_result_set(rows)
                    .await
                    .map(QueryOutcome::Rows)
                    .map_err(query_failure),
                Err(e) => Err(DatabaseError::Query(e.to_string())),
            }
        } else {
            tx.execute(sql, libsql::params_from_iter(params))
                .await
                .map(|rows_affected| QueryOutcome::Affected { rows_affected })
                .map_err(|e| DatabaseError::Query(e.to_string()))
        };

        match outcome {
            Ok(outcome) => {
                tx.commit()
                    .await
                    .map_err(|e| DatabaseError::Query(e.to_string()))?;
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn execute_batch(&self, statements: &[String]) -> Result<QueryOutcome, DatabaseError> {
        debug!(statements = statements.len(), "executing batch in transaction");
        let tx = self.db().conn().transaction().await?;
        let mut rows_affected = 0;
        for statement in statements {
            match tx.execute(statement, ()).await {
                Ok(count) => rows_affected += count,
                Err(e) => {
                    if let Err(rollback) = tx.rollback().await {
                        warn!(error = %rollback, "rollback failed");
                    }
                    return Err(DatabaseError::Query(e.to_string()));
                }
            }
        }
        tx.commit()
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;
        Ok(QueryOutcome::Affected { rows_affected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{empty_service, seeded_service};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("SELECT 1", true)]
    #[case("  select * from customers", true)]
    #[case("-- leading comment\nSELECT 1", true)]
    #[case("/* block */ WITH x AS (SELECT 1) SELECT * FROM x", true)]
    #[case("PRAGMA table_info(customers)", true)]
    #[case("EXPLAIN QUERY PLAN SELECT 1", true)]
    #[case("VALUES (1), (2)", true)]
    #[case("(SELECT 1)", true)]
    #[case("INSERT INTO customers (name) VALUES ('x')", false)]
    #[case("UPDATE customers SET name = 'y'", false)]
    #[case("CREATE TABLE t (id INTEGER)", false)]
    #[case("INSERT INTO leads (lead_id, name) VALUES ('L3', 'z') RETURNING id", true)]
    #[case("DELETE FROM leads WHERE id = 1 RETURNING *", true)]
    #[case("INSERT INTO notes (body) VALUES ('returning soon')", false)]
    fn classifies_statements(#[case] sql: &str, #[case] rows: bool) {
        assert_eq!(returns_rows(sql), rows, "{sql}");
    }

    #[rstest]
    #[case("DROP TABLE customers", Some("DROP"))]
    #[case("select 1; delete from customers", Some("DELETE"))]
    #[case("WITH old AS (SELECT id FROM deals) DELETE FROM deals WHERE id IN old", Some("DELETE"))]
    #[case("-- DROP TABLE x\nSELECT 1", None)]
    #[case("SELECT 'DROP TABLE x'", None)]
    #[case("INSERT INTO t VALUES (1)", None)]
    #[case("WITH x AS (SELECT 'update me') SELECT * FROM x", None)]
    #[case("WITH x AS (SELECT replace(name, 'a', 'b') AS n FROM t) SELECT n FROM x", None)]
    #[case("INSERT OR REPLACE INTO t (id) VALUES (1)", Some("REPLACE"))]
    #[case("insert or replace into t (id) values (1)", Some("REPLACE"))]
    #[case("SELECT 'a;DROP TABLE t'", None)]
    fn finds_destructive_keywords(#[case] sql: &str, #[case] expected: Option<&str>) {
        assert_eq!(destructive_keyword(sql).as_deref(), expected);
    }

    #[tokio::test]
    async fn select_returns_rows() {
        let service = seeded_service().await;
        let outcome = service
            .execute(
                "SELECT sku, current_stock FROM inventory WHERE current_stock > ?1 ORDER BY sku",
                Some(&[json!(20)]),
                ExecutionPolicy::default(),
            )
            .await
            .unwrap();

        let QueryOutcome::Rows(result) = outcome else {
            panic!("expected rows");
        };
        assert_eq!(result.columns, vec!["sku", "current_stock"]);
        assert_eq!(result.rows, vec![
            vec![json!("LAP-001"), json!(25)],
            vec![json!("PRT-003"), json!(45)],
        ]);
    }

    #[tokio::test]
    async fn update_commits_and_reports_count() {
        let service = seeded_service().await;
        let outcome = service
            .execute(
                "UPDATE inventory SET current_stock = current_stock + 1",
                None,
                ExecutionPolicy::UNRESTRICTED,
            )
            .await
            .unwrap();
        assert_eq!(outcome, QueryOutcome::Affected { rows_affected: 3 });

        let check = service
            .execute("SELECT current_stock FROM inventory WHERE sku = 'CHR-002'", None, ExecutionPolicy::UNRESTRICTED)
            .await
            .unwrap();
        let QueryOutcome::Rows(result) = check else {
            panic!("expected rows");
        };
        assert_eq!(result.rows[0][0], json!(9));
    }

    #[tokio::test]
    async fn failure_surfaces_driver_message_and_rolls_back() {
        let service = seeded_service().await;
        let err = service
            .execute(
                "INSERT INTO customers (customer_id, name) VALUES ('CUST-0001', 'Dup')",
                None,
                ExecutionPolicy::UNRESTRICTED,
            )
            .await
            .unwrap_err();
        let DatabaseError::Query(message) = err else {
            panic!("expected query error");
        };
        assert!(message.contains("UNIQUE"), "{message}");
        assert_eq!(service.count_rows("customers").await.unwrap(), 3);

        let err = service
            .execute("SELECT * FROM missing_table", None, ExecutionPolicy::UNRESTRICTED)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing_table"));
    }

    #[tokio::test]
    async fn policy_refuses_destructive_statements() {
        let service = seeded_service().await;
        let err = service
            .execute("DELETE FROM customers", None, ExecutionPolicy::NON_DESTRUCTIVE)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Refused(_)));
        assert_eq!(service.count_rows("customers").await.unwrap(), 3);

        let outcome = service
            .execute(
                "INSERT INTO leads (lead_id, name) VALUES ('LEAD-0001', 'Ada')",
                None,
                ExecutionPolicy::NON_DESTRUCTIVE,
            )
            .await
            .unwrap();
        assert_eq!(outcome, QueryOutcome::Affected { rows_affected: 1 });
    }

    #[test]
    fn splits_statements_outside_quotes() {
        assert_eq!(
            split_statements("INSERT INTO t VALUES ('a;b'); -- done;\nSELECT 1;;"),
            vec!["INSERT INTO t VALUES ('a;b')", "SELECT 1"]
        );
    }

    #[tokio::test]
    async fn every_statement_of_a_batch_runs() {
        let service = seeded_service().await;
        let outcome = service
            .execute(
                "INSERT INTO leads (lead_id, name) VALUES ('L1', 'x'); \
                 INSERT INTO leads (lead_id, name) VALUES ('L2', 'y')",
                None,
                ExecutionPolicy::UNRESTRICTED,
            )
            .await
            .unwrap();
        assert_eq!(outcome, QueryOutcome::Affected { rows_affected: 2 });
        assert_eq!(service.count_rows("leads").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn failing_batch_statement_rolls_back_the_rest() {
        let service = seeded_service().await;
        let err = service
            .execute(
                "INSERT INTO leads (lead_id, name) VALUES ('L1', 'x'); \
                 INSERT INTO leads (lead_id, name) VALUES ('L1', 'again')",
                None,
                ExecutionPolicy::UNRESTRICTED,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Query(ref message) if message.contains("UNIQUE")), "{err}");
        assert_eq!(service.count_rows("leads").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn batch_rejects_params_and_row_statements() {
        let service = seeded_service().await;
        let err = service
            .execute("SELECT ?1; SELECT 2", Some(&[json!(1)]), ExecutionPolicy::UNRESTRICTED)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));

        let err = service
            .execute(
                "INSERT INTO leads (lead_id, name) VALUES ('L1', 'x'); SELECT * FROM leads",
                None,
                ExecutionPolicy::UNRESTRICTED,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("statement 2"), "{err}");
        assert_eq!(service.count_rows("leads").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn returning_write_commits_and_yields_rows() {
        let service = seeded_service().await;
        let outcome = service
            .execute(
                "INSERT INTO leads (lead_id, name) VALUES (?1, ?2) RETURNING lead_id, name",
                Some(&[json!("L3"), json!("z")]),
                ExecutionPolicy::UNRESTRICTED,
            )
            .await
            .unwrap();

        let QueryOutcome::Rows(result) = outcome else {
            panic!("expected rows");
        };
        assert_eq!(result.columns, vec!["lead_id", "name"]);
        assert_eq!(result.rows, vec![vec![json!("L3"), json!("z")]]);
        assert_eq!(service.count_rows("leads").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn policy_refuses_insert_or_replace() {
        let service = seeded_service().await;
        let err = service
            .execute(
                "INSERT OR REPLACE INTO leads (lead_id, name) VALUES ('L1', 'x')",
                None,
                ExecutionPolicy::NON_DESTRUCTIVE,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Refused(_)));
    }

    #[tokio::test]
    async fn empty_statement_is_rejected() {
        let service = empty_service().await;
        let err = service
            .execute("  -- nothing here\n", None, ExecutionPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }
}
