use lazyseq::Direction;
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;

use super::{SortKey, lookup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// `field OP value`, e.g. `age>=30` or `address.city=Berlin`.
///
/// The right-hand side is read as JSON when it parses (`30`, `true`, `null`,
/// `"30"`) and as a bare string otherwise. A record without the field only
/// satisfies `!=`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub value: SortKey,
}

impl Condition {
    pub fn matches(&self, record: &Value) -> bool {
        let key = SortKey::of(lookup(record, &self.field));
        if key.is_missing() {
            return self.op == CompareOp::Ne;
        }
        self.op.holds(key.cmp(&self.value))
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let at = expr
            .find(['=', '!', '<', '>'])
            .ok_or_else(|| format!("expected FIELD<op>VALUE with one of = != < <= > >=, got `{expr}`"))?;
        let (field, rest) = expr.split_at(at);
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("missing field name in `{expr}`"));
        }
        let (op, raw) = match rest.as_bytes() {
            [b'!', b'=', ..] => (CompareOp::Ne, &rest[2..]),
            [b'<', b'=', ..] => (CompareOp::Le, &rest[2..]),
            [b'>', b'=', ..] => (CompareOp::Ge, &rest[2..]),
            [b'=', ..] => (CompareOp::Eq, &rest[1..]),
            [b'<', ..] => (CompareOp::Lt, &rest[1..]),
            [b'>', ..] => (CompareOp::Gt, &rest[1..]),
            _ => return Err(format!("unknown operator in `{expr}`")),
        };
        let raw = raw.trim();
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        Ok(Condition { field: field.to_owned(), op, value: SortKey::of(Some(&value)) })
    }
}

/// `FIELD` or `FIELD:asc` / `FIELD:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: Direction,
}

impl SortSpec {
    pub fn key_selector(&self) -> impl Fn(&Value) -> SortKey + 'static {
        let field = self.field.clone();
        move |record: &Value| SortKey::of(lookup(record, &field))
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match spec.rsplit_once(':') {
            Some((field, "desc")) => (field, Direction::Descending),
            Some((field, "asc")) => (field, Direction::Ascending),
            Some((_, other)) => return Err(format!("unknown sort direction `{other}`, expected asc or desc")),
            None => (spec, Direction::Ascending),
        };
        if field.trim().is_empty() {
            return Err(format!("missing field name in `{spec}`"));
        }
        Ok(SortSpec { field: field.trim().to_owned(), direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("age>=30", "age", CompareOp::Ge)]
    #[case("age<=30", "age", CompareOp::Le)]
    #[case("name!=bob", "name", CompareOp::Ne)]
    #[case("name=bob", "name", CompareOp::Eq)]
    #[case(" age < 3", "age", CompareOp::Lt)]
    #[case("a.b>1", "a.b", CompareOp::Gt)]
    fn parses_operators(#[case] expr: &str, #[case] field: &str, #[case] op: CompareOp) {
        let condition: Condition = expr.parse().expect("condition");
        assert_eq!(condition.field, field);
        assert_eq!(condition.op, op);
    }

    #[rstest]
    #[case("age")]
    #[case(">=3")]
    #[case("age!3")]
    fn rejects_malformed(#[case] expr: &str) {
        assert!(expr.parse::<Condition>().is_err());
    }

    #[rstest]
    fn value_after_first_operator_is_taken_verbatim() {
        let condition: Condition = "age=>3".parse().expect("condition");
        assert_eq!(condition.op, CompareOp::Eq);
        assert_eq!(condition.value, SortKey::Text(">3".into()));
    }

    #[rstest]
    #[case("age>=30", json!({"age": 30}), true)]
    #[case("age>30", json!({"age": 30}), false)]
    #[case("name=ann", json!({"name": "ann"}), true)]
    #[case("name=\"30\"", json!({"name": 30}), false)]
    #[case("active=true", json!({"active": true}), true)]
    #[case("age<100", json!({"name": "ann"}), false)]
    #[case("age!=100", json!({"name": "ann"}), true)]
    fn matches_records(#[case] expr: &str, #[case] record: Value, #[case] expected: bool) {
        let condition: Condition = expr.parse().expect("condition");
        assert_eq!(condition.matches(&record), expected);
    }

    #[rstest]
    #[case("name", "name", Direction::Ascending)]
    #[case("name:desc", "name", Direction::Descending)]
    #[case("a.b:asc", "a.b", Direction::Ascending)]
    fn parses_sort_specs(#[case] spec: &str, #[case] field: &str, #[case] direction: Direction) {
        let parsed: SortSpec = spec.parse().expect("sort spec");
        assert_eq!(parsed, SortSpec { field: field.into(), direction });
    }

    #[rstest]
    fn sort_spec_rejects_unknown_direction() {
        assert!("name:up".parse::<SortSpec>().is_err());
    }
}
