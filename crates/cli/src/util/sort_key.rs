use serde_json::Value;
use std::cmp::Ordering;

/// Totally ordered view of a JSON field value.
///
/// Kinds order as missing < null < bool < number < string. Arrays and
/// objects compare by their compact JSON text, after strings.
#[derive(Debug, Clone)]
pub enum SortKey {
    Missing,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Composite(String),
}

impl SortKey {
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => SortKey::Missing,
            Some(Value::Null) => SortKey::Null,
            Some(Value::Bool(b)) => SortKey::Bool(*b),
            Some(Value::Number(n)) => n.as_f64().map_or_else(|| SortKey::Text(n.to_string()), SortKey::Number),
            Some(Value::String(s)) => SortKey::Text(s.clone()),
            Some(other) => SortKey::Composite(other.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SortKey::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Null => 1,
            SortKey::Bool(_) => 2,
            SortKey::Number(_) => 3,
            SortKey::Text(_) => 4,
            SortKey::Composite(_) => 5,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) | (SortKey::Composite(a), SortKey::Composite(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn kinds_are_ranked() {
        let keys = [
            SortKey::of(None),
            SortKey::of(Some(&json!(null))),
            SortKey::of(Some(&json!(true))),
            SortKey::of(Some(&json!(-1))),
            SortKey::of(Some(&json!("a"))),
            SortKey::of(Some(&json!({"x": 1}))),
        ];
        for pair in keys.windows(2) {
            assert_eq!(pair[0].cmp(&pair[1]), Ordering::Less, "{:?} < {:?}", pair[0], pair[1]);
        }
    }

    #[rstest]
    #[case(json!(2), json!(10), Ordering::Less)]
    #[case(json!(2.5), json!(2), Ordering::Greater)]
    #[case(json!(1), json!(1.0), Ordering::Equal)]
    #[case(json!("b"), json!("ab"), Ordering::Greater)]
    #[case(json!(false), json!(true), Ordering::Less)]
    fn same_kind_compares_by_value(#[case] a: Value, #[case] b: Value, #[case] expected: Ordering) {
        assert_eq!(SortKey::of(Some(&a)).cmp(&SortKey::of(Some(&b))), expected);
    }
}
