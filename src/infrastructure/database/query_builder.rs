//! Named-placeholder SQL rendering
//!
//! Repositories write SQL with `@name` placeholders and collect only the
//! values they actually want to constrain or assign. [`render`] turns that
//! into PostgreSQL positional markers (`$1`, `$2`, ...) plus the matching
//! argument list, so values never end up in the SQL text.

use std::collections::HashMap;

use sea_orm::{DbBackend, Statement, Value};

use crate::domain::{DomainError, DomainResult};

/// Values bound to `@name` placeholders.
#[derive(Debug, Clone, Default)]
pub struct NamedParams {
    values: HashMap<&'static str, Value>,
}

impl NamedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &'static str, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name, value.into());
        self
    }

    pub fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace every `@name` in `template` with the next positional marker.
///
/// Each occurrence gets its own index, so a name used twice yields two
/// arguments. A name missing from `params` is a caller bug and is reported
/// as [`DomainError::Internal`].
pub fn render(template: &str, params: &NamedParams) -> DomainResult<(String, Vec<Value>)> {
    let mut sql = String::with_capacity(template.len());
    let mut args = Vec::new();
    let mut rest = template;

    while let Some(at) = rest.find('@') {
        sql.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let name_len = after
            .char_indices()
            .find(|&(_, c)| !is_name_char(c))
            .map_or(after.len(), |(i, _)| i);

        if name_len == 0 {
            sql.push('@');
            rest = after;
            continue;
        }

        let name = &after[..name_len];
        let value = params.get(name).ok_or_else(|| {
            DomainError::Internal(format!("query placeholder @{name} has no bound value"))
        })?;
        args.push(value.clone());
        sql.push('$');
        sql.push_str(&args.len().to_string());
        rest = &after[name_len..];
    }
    sql.push_str(rest);

    Ok((sql, args))
}

/// [`render`] and wrap the result in a PostgreSQL [`Statement`].
pub fn statement(template: &str, params: &NamedParams) -> DomainResult<Statement> {
    let (sql, args) = render(template, params)?;
    Ok(Statement::from_sql_and_values(DbBackend::Postgres, sql, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_follow_left_to_right_order() {
        let params = NamedParams::new()
            .with("email", "a@x.com")
            .with("full_name", "A");

        let (sql, args) = render(" full_name = @full_name and email = @email", &params).unwrap();

        assert_eq!(sql, " full_name = $1 and email = $2");
        assert_eq!(
            args,
            vec![Value::from("A"), Value::from("a@x.com")]
        );
    }

    #[test]
    fn repeated_placeholder_is_not_deduplicated() {
        let params = NamedParams::new().with("id", 7_i64);

        let (sql, args) = render("@id, @id, @id", &params).unwrap();

        assert_eq!(sql, "$1, $2, $3");
        assert_eq!(args.len(), 3);
        assert!(args.iter().all(|v| *v == Value::from(7_i64)));
    }

    #[test]
    fn unreferenced_params_are_ignored() {
        let params = NamedParams::new().with("email", "a@x.com").with("unused", 1_i32);

        let (sql, args) = render("email = @email", &params).unwrap();

        assert_eq!(sql, "email = $1");
        assert_eq!(args, vec![Value::from("a@x.com")]);
    }

    #[test]
    fn missing_value_is_a_contract_violation() {
        let err = render("email = @email", &NamedParams::new()).unwrap_err();
        assert!(matches!(err, DomainError::Internal(msg) if msg.contains("@email")));
    }

    #[test]
    fn bare_at_sign_is_kept_verbatim() {
        let params = NamedParams::new().with("a", 1_i32);

        let (sql, args) = render("x @ y = @a", &params).unwrap();

        assert_eq!(sql, "x @ y = $1");
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn placeholder_ends_at_first_non_identifier_char() {
        let params = NamedParams::new().with("user_role", "admin");

        let (sql, _) = render("(user_role = @user_role)", &params).unwrap();

        assert_eq!(sql, "(user_role = $1)");
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let (sql, args) = render("select 1", &NamedParams::new()).unwrap();
        assert_eq!(sql, "select 1");
        assert!(args.is_empty());
    }

    #[test]
    fn statement_targets_postgres() {
        let stmt = statement("id = @id", &NamedParams::new().with("id", 1_i32)).unwrap();
        assert_eq!(stmt.db_backend, DbBackend::Postgres);
        assert_eq!(stmt.sql, "id = $1");
        assert_eq!(stmt.values.map(|v| v.0.len()), Some(1));
    }
}
