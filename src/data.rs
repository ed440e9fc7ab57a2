use std::{cmp::Ordering, fmt};

use serde::Serialize;

/// A typed cell of the canonical table.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Number(f) => format_number(*f),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Text(_) => None,
            Value::Integer(i) => Some(*i as f64),
            Value::Number(f) => Some(*f),
        }
    }

    /// Total order across variants: numbers compare numerically and sort
    /// before text.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Text(_), _) => Ordering::Greater,
            (_, Value::Text(_)) => Ordering::Less,
            (left, right) => {
                let l = left.as_f64().unwrap_or_default();
                let r = right.as_f64().unwrap_or_default();
                l.total_cmp(&r)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Orders present values with [`Value::total_cmp`]; absent values always
/// land after present ones, whichever direction is requested.
pub fn compare_optional(left: Option<&Value>, right: Option<&Value>, ascending: bool) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) if ascending => l.total_cmp(r),
        (Some(l), Some(r)) => r.total_cmp(l),
    }
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_drops_trailing_zero_fraction() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(53.78), "53.78");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn numbers_sort_before_text() {
        let number = Value::Number(10.0);
        let text = Value::Text("10".to_string());
        assert_eq!(number.total_cmp(&text), Ordering::Less);
        assert_eq!(
            Value::Integer(3).total_cmp(&Value::Number(2.5)),
            Ordering::Greater
        );
    }

    #[test]
    fn absent_values_sort_last_in_both_directions() {
        let present = Value::Text("AUS".to_string());
        assert_eq!(
            compare_optional(None, Some(&present), true),
            Ordering::Greater
        );
        assert_eq!(
            compare_optional(None, Some(&present), false),
            Ordering::Greater
        );
    }
}
