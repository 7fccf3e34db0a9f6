//! SQL generation from column maps.
//!
//! Every builder returns a [`sqlx::QueryBuilder`] holding the SQL text with
//! `?` placeholders and the bound values, ready for `.build()`.
//!
//! A [`Where`] key is either a bare column (`c_userid`, equality) or a column
//! followed by an operator (`c_state >=`, `c_name like`, `id in`,
//! `c_time between`). Three directive keys are recognized alongside the
//! columns:
//!
//! - `_orderby`: `where.insert("_orderby", "c_id desc")`
//! - `_groupby`: `where.insert("_groupby", "c_userid")`
//! - `_having`: either clause text, `where.insert("_having", "count(*) > 1")`,
//!   or a JSON object of conditions in the key syntax above,
//!   `where.insert("_having", json!({"c_state >": 0}))`
//!
//! Directive text is spliced into the statement unbound. It is checked
//! against a small character set, but that check cannot stop a subquery:
//! never build directives from user input.

use std::collections::BTreeMap;

use sqlx::{MySql, QueryBuilder};

use crate::value::{Value, Values};
use crate::{MysqlError, Result};

pub const ORDER_BY_KEY: &str = "_orderby";
pub const GROUP_BY_KEY: &str = "_groupby";
pub const HAVING_KEY: &str = "_having";

/// Predicate map for `WHERE` / `HAVING`, plus the ordering and grouping
/// directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    conditions: BTreeMap<String, Value>,
    having: BTreeMap<String, Value>,
    having_clause: Option<Value>,
    order_by: Option<Value>,
    group_by: Option<Value>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, or set a directive when `key` is `_orderby`,
    /// `_groupby` or `_having`. A repeated key replaces the earlier value.
    ///
    /// A `_having` JSON object is unpacked into having-conditions; any other
    /// `_having` value is kept as clause text.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            ORDER_BY_KEY => self.order_by = Some(value),
            GROUP_BY_KEY => self.group_by = Some(value),
            HAVING_KEY => match value {
                Value::Json(serde_json::Value::Object(entries)) => {
                    for (key, value) in entries {
                        self.having.insert(key, Value::from_json(value));
                    }
                }
                clause => self.having_clause = Some(clause),
            },
            _ => {
                self.conditions.insert(key, value);
            }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// `ORDER BY` text, e.g. `c_id desc`. Spliced in unbound: never pass
    /// user input here.
    pub fn order_by(self, clause: impl Into<String>) -> Self {
        self.with(ORDER_BY_KEY, clause.into())
    }

    /// `GROUP BY` text. Spliced in unbound, like [`Where::order_by`].
    pub fn group_by(self, clause: impl Into<String>) -> Self {
        self.with(GROUP_BY_KEY, clause.into())
    }

    pub fn having(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.having.insert(key.into(), value.into());
        self
    }

    /// True when there are no column conditions. Directives alone don't
    /// narrow a write, so they don't count.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Where {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Where::new();
        filter.extend(iter);
        filter
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Where {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// `LIMIT offset, limit` window for a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    /// A zero `limit` is read as one row, never as an empty page.
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.max(1),
        }
    }
}

/// Statement verb for [`build_insert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertMode {
    #[default]
    Insert,
    /// `INSERT IGNORE`: rows that hit a unique key are skipped.
    Ignore,
    /// `REPLACE`: rows that hit a unique key replace the existing row.
    Replace,
}

impl InsertMode {
    fn verb(self) -> &'static str {
        match self {
            InsertMode::Insert => "INSERT INTO",
            InsertMode::Ignore => "INSERT IGNORE INTO",
            InsertMode::Replace => "REPLACE INTO",
        }
    }
}

// ---------------------------------------------------------------------------
// Statement builders
// ---------------------------------------------------------------------------

/// `INSERT INTO t (a, b) VALUES (?, ?), (?, ?)`.
///
/// Every row must carry exactly the columns of the first one.
pub fn build_insert(
    table: &str,
    rows: &[Values],
    mode: InsertMode,
) -> Result<QueryBuilder<'static, MySql>> {
    let first = rows
        .first()
        .filter(|row| !row.is_empty())
        .ok_or(MysqlError::EmptyValues)?;
    let columns: Vec<&String> = first.keys().collect();
    let quoted = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Result<Vec<_>>>()?;

    let mut qb = QueryBuilder::new(format!(
        "{} {} ({}) VALUES ",
        mode.verb(),
        quote_ident(table)?,
        quoted.join(", ")
    ));

    for (index, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(MysqlError::MismatchedColumns { row: index });
        }
        if index > 0 {
            qb.push(", ");
        }
        qb.push("(");
        for (position, column) in columns.iter().enumerate() {
            let value = row
                .get(*column)
                .ok_or(MysqlError::MismatchedColumns { row: index })?;
            if position > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, column, value.clone())?;
        }
        qb.push(")");
    }

    Ok(qb)
}

/// `SELECT fields FROM t WHERE .. GROUP BY .. HAVING .. ORDER BY .. LIMIT ..`.
///
/// An empty `fields` selects `*`; without a `page` no `LIMIT` is emitted.
pub fn build_select(
    table: &str,
    filter: &Where,
    fields: &[&str],
    page: Option<Page>,
) -> Result<QueryBuilder<'static, MySql>> {
    let columns = if fields.is_empty() {
        "*".to_string()
    } else {
        fields
            .iter()
            .map(|field| quote_field(field))
            .collect::<Result<Vec<_>>>()?
            .join(", ")
    };

    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", columns, quote_ident(table)?));

    if !filter.conditions.is_empty() {
        qb.push(" WHERE ");
        push_conditions(&mut qb, &filter.conditions)?;
    }
    if let Some(group_by) = &filter.group_by {
        qb.push(" GROUP BY ");
        qb.push(directive(GROUP_BY_KEY, group_by)?);
    }
    if !filter.having.is_empty() || filter.having_clause.is_some() {
        qb.push(" HAVING ");
        push_conditions(&mut qb, &filter.having)?;
        if let Some(clause) = &filter.having_clause {
            if !filter.having.is_empty() {
                qb.push(" AND ");
            }
            qb.push(having_clause(clause)?);
        }
    }
    if let Some(order_by) = &filter.order_by {
        qb.push(" ORDER BY ");
        qb.push(directive(ORDER_BY_KEY, order_by)?);
    }
    if let Some(page) = page {
        qb.push(format_args!(" LIMIT {}, {}", page.offset, page.limit));
    }

    Ok(qb)
}

/// `SELECT count(*) FROM t WHERE ..`.
pub fn build_count(table: &str, filter: &Where) -> Result<QueryBuilder<'static, MySql>> {
    build_select(table, filter, &["count(*)"], None)
}

/// `UPDATE t SET a = ?, b = ? WHERE ..`. Refuses an empty where.
pub fn build_update(
    table: &str,
    filter: &Where,
    values: &Values,
) -> Result<QueryBuilder<'static, MySql>> {
    if filter.is_empty() {
        return Err(MysqlError::EmptyWhere);
    }
    if values.is_empty() {
        return Err(MysqlError::EmptyValues);
    }

    let mut qb = QueryBuilder::new(format!("UPDATE {} SET ", quote_ident(table)?));
    for (position, (column, value)) in values.iter().enumerate() {
        if position > 0 {
            qb.push(", ");
        }
        qb.push(quote_ident(column)?);
        qb.push(" = ");
        push_value(&mut qb, column, value.clone())?;
    }
    qb.push(" WHERE ");
    push_conditions(&mut qb, &filter.conditions)?;

    Ok(qb)
}

/// `DELETE FROM t WHERE ..`. Refuses an empty where.
pub fn build_delete(table: &str, filter: &Where) -> Result<QueryBuilder<'static, MySql>> {
    if filter.is_empty() {
        return Err(MysqlError::EmptyWhere);
    }

    let mut qb = QueryBuilder::new(format!("DELETE FROM {} WHERE ", quote_ident(table)?));
    push_conditions(&mut qb, &filter.conditions)?;

    Ok(qb)
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    In,
    NotIn,
    Is,
    IsNot,
    Between,
    NotBetween,
}

impl Op {
    fn sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Is => "IS",
            Op::IsNot => "IS NOT",
            Op::Between => "BETWEEN",
            Op::NotBetween => "NOT BETWEEN",
        }
    }
}

// Longer suffixes first so `>=` is not read as `=`.
const OPERATORS: &[(&str, Op)] = &[
    (" not between", Op::NotBetween),
    (" between", Op::Between),
    (" not like", Op::NotLike),
    (" not in", Op::NotIn),
    (" is not", Op::IsNot),
    (" like", Op::Like),
    (" in", Op::In),
    (" is", Op::Is),
    (">=", Op::Ge),
    ("<=", Op::Le),
    ("!=", Op::Ne),
    ("<>", Op::Ne),
    (">", Op::Gt),
    ("<", Op::Lt),
    ("=", Op::Eq),
];

fn split_key(key: &str) -> (&str, Op) {
    let key = key.trim();
    let lower = key.to_ascii_lowercase();
    for (suffix, op) in OPERATORS {
        if lower.ends_with(suffix) {
            return (key[..key.len() - suffix.len()].trim_end(), *op);
        }
    }
    (key, Op::Eq)
}

fn push_conditions(
    qb: &mut QueryBuilder<'static, MySql>,
    conditions: &BTreeMap<String, Value>,
) -> Result<()> {
    for (position, (key, value)) in conditions.iter().enumerate() {
        if position > 0 {
            qb.push(" AND ");
        }
        push_condition(qb, key, value)?;
    }
    Ok(())
}

fn push_condition(qb: &mut QueryBuilder<'static, MySql>, key: &str, value: &Value) -> Result<()> {
    let (column, op) = split_key(key);
    let column = quote_ident(column)?;
    let invalid = |reason| MysqlError::InvalidCondition {
        key: key.to_string(),
        reason,
    };

    match (op, value) {
        (Op::Eq | Op::Is, Value::Null) => {
            qb.push(format_args!("{column} IS NULL"));
        }
        (Op::Ne | Op::IsNot, Value::Null) => {
            qb.push(format_args!("{column} IS NOT NULL"));
        }
        (Op::Is | Op::IsNot, _) => return Err(invalid("is / is not only compare with null")),
        (Op::In | Op::NotIn, Value::List(items)) => {
            if items.is_empty() {
                return Err(invalid("empty list"));
            }
            qb.push(format_args!("{column} {} (", op.sql()));
            for (position, item) in items.iter().enumerate() {
                if position > 0 {
                    qb.push(", ");
                }
                push_value(qb, key, item.clone())?;
            }
            qb.push(")");
        }
        (Op::In | Op::NotIn, _) => return Err(invalid("in / not in need a list")),
        (Op::Between | Op::NotBetween, Value::List(bounds)) if bounds.len() == 2 => {
            qb.push(format_args!("{column} {} ", op.sql()));
            push_value(qb, key, bounds[0].clone())?;
            qb.push(" AND ");
            push_value(qb, key, bounds[1].clone())?;
        }
        (Op::Between | Op::NotBetween, _) => {
            return Err(invalid("between / not between need a two-element list"))
        }
        (_, value) => {
            qb.push(format_args!("{column} {} ", op.sql()));
            push_value(qb, key, value.clone())?;
        }
    }
    Ok(())
}

fn push_value(qb: &mut QueryBuilder<'static, MySql>, key: &str, value: Value) -> Result<()> {
    match value {
        Value::Null => qb.push_bind(None::<String>),
        Value::Bool(v) => qb.push_bind(v),
        Value::Int(v) => qb.push_bind(v),
        Value::UInt(v) => qb.push_bind(v),
        Value::Float(v) => qb.push_bind(v),
        Value::Text(v) => qb.push_bind(v),
        Value::Bytes(v) => qb.push_bind(v),
        Value::DateTime(v) => qb.push_bind(v),
        Value::Json(v) => qb.push_bind(sqlx::types::Json(v)),
        Value::List(_) => {
            return Err(MysqlError::InvalidCondition {
                key: key.to_string(),
                reason: "list values are only valid with in / not in / between",
            })
        }
    };
    Ok(())
}

// ---------------------------------------------------------------------------
// Identifiers and clauses
// ---------------------------------------------------------------------------

/// Backtick-quote `name`, or each part of `db.name`.
fn quote_ident(name: &str) -> Result<String> {
    let parts = name
        .trim()
        .split('.')
        .map(|part| {
            let part = part.trim_matches('`');
            let valid = !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
            if valid {
                Ok(format!("`{part}`"))
            } else {
                Err(MysqlError::InvalidIdentifier(name.to_string()))
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("."))
}

/// Plain column names are quoted; expressions such as `count(*)` or
/// `c_id as id` are passed through when they look harmless.
fn quote_field(field: &str) -> Result<String> {
    quote_ident(field).or_else(|_| check_clause(field).map(str::to_string))
}

fn directive(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::Text(clause) => check_clause(clause).map(str::to_string),
        _ => Err(MysqlError::InvalidCondition {
            key: key.to_string(),
            reason: "directive value must be text",
        }),
    }
}

/// `_having` text additionally needs comparison operators.
fn having_clause(value: &Value) -> Result<&str> {
    match value {
        Value::Text(clause) => {
            check_chars(clause, |c| clause_char(c) || matches!(c, '<' | '>' | '=' | '!'))
        }
        _ => Err(MysqlError::InvalidCondition {
            key: HAVING_KEY.to_string(),
            reason: "directive value must be text or a json object",
        }),
    }
}

fn check_clause(clause: &str) -> Result<&str> {
    check_chars(clause, clause_char)
}

fn clause_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | ' ' | ',' | '.' | '*' | '(' | ')' | '`')
}

fn check_chars(clause: &str, allowed: impl Fn(char) -> bool) -> Result<&str> {
    let clause = clause.trim();
    let valid = !clause.is_empty() && clause.chars().all(allowed);
    if valid {
        Ok(clause)
    } else {
        Err(MysqlError::InvalidClause(clause.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, Value)]) -> Values {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn insert_lists_columns_in_key_order() {
        let row = values(&[
            ("c_userid", "123456".into()),
            ("c_state", 1.into()),
            ("c_user_name", "test1".into()),
        ]);
        let qb = build_insert("t_user", &[row], InsertMode::Insert).unwrap();
        assert_eq!(
            qb.sql(),
            "INSERT INTO `t_user` (`c_state`, `c_user_name`, `c_userid`) VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn batch_insert_and_modes() {
        let a = values(&[("c_userid", "1".into()), ("c_state", 1.into())]);
        let b = values(&[("c_userid", "2".into()), ("c_state", 0.into())]);

        let qb = build_insert("air_test.t_user", &[a.clone(), b], InsertMode::Ignore).unwrap();
        assert_eq!(
            qb.sql(),
            "INSERT IGNORE INTO `air_test`.`t_user` (`c_state`, `c_userid`) VALUES (?, ?), (?, ?)"
        );

        let qb = build_insert("t_user", &[a], InsertMode::Replace).unwrap();
        assert!(qb.sql().starts_with("REPLACE INTO `t_user`"));
    }

    #[test]
    fn insert_rejects_empty_and_mismatched_rows() {
        assert!(matches!(
            build_insert("t_user", &[], InsertMode::Insert),
            Err(MysqlError::EmptyValues)
        ));
        assert!(matches!(
            build_insert("t_user", &[Values::new()], InsertMode::Insert),
            Err(MysqlError::EmptyValues)
        ));

        let a = values(&[("c_userid", "1".into()), ("c_state", 1.into())]);
        let b = values(&[("c_userid", "2".into()), ("c_user_tel", "137".into())]);
        assert!(matches!(
            build_insert("t_user", &[a, b], InsertMode::Insert),
            Err(MysqlError::MismatchedColumns { row: 1 })
        ));
    }

    #[test]
    fn select_with_every_clause() {
        let filter = Where::new()
            .with("c_state", 1)
            .with("id >=", 10)
            .group_by("c_userid")
            .having("c_state >", 0)
            .order_by("c_id desc");
        let qb = build_select(
            "t_user",
            &filter,
            &["id", "c_userid", "count(*)"],
            Some(Page::new(20, 10)),
        )
        .unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT `id`, `c_userid`, count(*) FROM `t_user` \
             WHERE `c_state` = ? AND `id` >= ? \
             GROUP BY c_userid HAVING `c_state` > ? ORDER BY c_id desc LIMIT 20, 10"
        );
    }

    #[test]
    fn select_without_filter_or_fields() {
        let qb = build_select("t_user", &Where::new(), &[], None).unwrap();
        assert_eq!(qb.sql(), "SELECT * FROM `t_user`");
    }

    #[test]
    fn zero_limit_selects_one_row() {
        assert_eq!(Page::new(0, 0), Page::new(0, 1));
        let qb = build_select("t_user", &Where::new(), &[], Some(Page::new(5, 0))).unwrap();
        assert_eq!(qb.sql(), "SELECT * FROM `t_user` LIMIT 5, 1");
    }

    #[test]
    fn count_over_predicate() {
        let filter: Where = [("c_state", 0)].into_iter().collect();
        let qb = build_count("t_user", &filter).unwrap();
        assert_eq!(qb.sql(), "SELECT count(*) FROM `t_user` WHERE `c_state` = ?");
    }

    #[test]
    fn operators_and_null_handling() {
        let filter = Where::new()
            .with("a in", vec![1, 2, 3])
            .with("b not in", vec!["x"])
            .with("c like", "ab%")
            .with("d", Value::Null)
            .with("e !=", Value::Null)
            .with("f <>", 4)
            .with("g is not", Value::Null)
            .with("h NOT LIKE", "%z");
        let qb = build_select("t", &filter, &[], None).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT * FROM `t` WHERE `a` IN (?, ?, ?) AND `b` NOT IN (?) \
             AND `c` LIKE ? AND `d` IS NULL AND `e` IS NOT NULL AND `f` != ? \
             AND `g` IS NOT NULL AND `h` NOT LIKE ?"
        );
    }

    #[test]
    fn bad_conditions_are_rejected() {
        let empty_in = Where::new().with("a in", Vec::<i64>::new());
        assert!(matches!(
            build_select("t", &empty_in, &[], None),
            Err(MysqlError::InvalidCondition { reason: "empty list", .. })
        ));

        let scalar_in = Where::new().with("a in", 1);
        assert!(build_select("t", &scalar_in, &[], None).is_err());

        let list_eq = Where::new().with("a", vec![1]);
        assert!(build_select("t", &list_eq, &[], None).is_err());

        let is_value = Where::new().with("a is", 1);
        assert!(build_select("t", &is_value, &[], None).is_err());
    }

    #[test]
    fn identifiers_and_clauses_are_checked() {
        let injected = Where::new().with("a`; drop table t_user; --", 1);
        assert!(matches!(
            build_select("t_user", &injected, &[], None),
            Err(MysqlError::InvalidIdentifier(_))
        ));

        assert!(matches!(
            build_select("t user", &Where::new(), &[], None),
            Err(MysqlError::InvalidIdentifier(_))
        ));

        let order = Where::new().order_by("id; delete from t_user");
        assert!(matches!(
            build_select("t_user", &order, &[], None),
            Err(MysqlError::InvalidClause(_))
        ));

        let order = Where::new().with(ORDER_BY_KEY, 3);
        assert!(build_select("t_user", &order, &[], None).is_err());

        assert!(build_select("t_user", &Where::new(), &["name'"], None).is_err());
    }

    #[test]
    fn update_and_delete() {
        let filter = Where::new().with("c_userid", "12345678");
        let set = values(&[("c_state", 0.into()), ("c_user_tel", "137".into())]);

        let qb = build_update("t_user", &filter, &set).unwrap();
        assert_eq!(
            qb.sql(),
            "UPDATE `t_user` SET `c_state` = ?, `c_user_tel` = ? WHERE `c_userid` = ?"
        );

        let qb = build_delete("t_user", &filter).unwrap();
        assert_eq!(qb.sql(), "DELETE FROM `t_user` WHERE `c_userid` = ?");
    }

    #[test]
    fn writes_refuse_directive_only_predicates() {
        let only_order = Where::new().order_by("id");
        assert!(only_order.is_empty());
        assert!(matches!(
            build_delete("t_user", &only_order),
            Err(MysqlError::EmptyWhere)
        ));
        let set = values(&[("c_state", 0.into())]);
        assert!(matches!(
            build_update("t_user", &only_order, &set),
            Err(MysqlError::EmptyWhere)
        ));
        let filter = Where::new().with("id", 1);
        assert!(matches!(
            build_update("t_user", &filter, &Values::new()),
            Err(MysqlError::EmptyValues)
        ));
    }

    #[test]
    fn directive_keys_route_out_of_conditions() {
        let mut filter = Where::new();
        filter.insert("_orderby", "c_id asc");
        filter.insert("_groupby", "c_userid");
        filter.insert("_having", "count(*) > 1");
        filter.insert("c_state", 1);
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn having_text_is_emitted_after_group_by() {
        let mut filter = Where::new();
        filter.insert("_groupby", "c_userid");
        filter.insert("_having", "count(*) > 1");
        filter.insert("c_state", 1);
        let qb = build_select("t_user", &filter, &["c_userid"], None).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT `c_userid` FROM `t_user` WHERE `c_state` = ? \
             GROUP BY c_userid HAVING count(*) > 1"
        );
        assert!(!qb.sql().contains("`_having`"));
    }

    #[test]
    fn having_object_becomes_conditions() {
        let mut filter = Where::new().group_by("c_userid");
        filter.insert(
            "_having",
            serde_json::json!({ "c_state >": 0, "c_userid in": ["1", "2"] }),
        );
        assert!(filter.is_empty());

        let qb = build_select("t_user", &filter, &["c_userid"], None).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT `c_userid` FROM `t_user` GROUP BY c_userid \
             HAVING `c_state` > ? AND `c_userid` IN (?, ?)"
        );
    }

    #[test]
    fn having_text_joins_having_conditions() {
        let filter = Where::new()
            .group_by("c_userid")
            .having("c_state >", 0)
            .with("_having", "count(*) >= 2");
        let qb = build_select("t_user", &filter, &[], None).unwrap();
        assert!(qb
            .sql()
            .ends_with("GROUP BY c_userid HAVING `c_state` > ? AND count(*) >= 2"));
    }

    #[test]
    fn bad_having_is_rejected() {
        let text = Where::new().with("_having", "count(*) > 1; drop table t_user");
        assert!(matches!(
            build_select("t_user", &text, &[], None),
            Err(MysqlError::InvalidClause(_))
        ));

        let number = Where::new().with("_having", 3);
        assert!(matches!(
            build_select("t_user", &number, &[], None),
            Err(MysqlError::InvalidCondition { .. })
        ));
    }

    #[test]
    fn between_takes_two_bounds() {
        let filter = Where::new()
            .with("c_state between", vec![1, 3])
            .with("id not between", vec![10, 20]);
        let qb = build_select("t_user", &filter, &[], None).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT * FROM `t_user` WHERE `c_state` BETWEEN ? AND ? AND `id` NOT BETWEEN ? AND ?"
        );

        let one_bound = Where::new().with("c_state between", vec![1]);
        assert!(matches!(
            build_select("t_user", &one_bound, &[], None),
            Err(MysqlError::InvalidCondition { .. })
        ));
        let scalar = Where::new().with("c_state between", 1);
        assert!(build_select("t_user", &scalar, &[], None).is_err());
    }
}
