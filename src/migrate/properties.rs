use crate::target::{JSON_SYNTAX, LITERAL_SYNTAX, TargetProperty};
use serde_json::{Map, Value};

/// Legacy state key that maps onto the `Value` property.
pub const VALUE_EXPRESSION_KEY: &str = "valueExpression";
pub const VALUE_PROPERTY: &str = "Value";
pub const BRANCHES_PROPERTY: &str = "Branches";
/// Expression key used for plain scalar state entries.
pub const SCALAR_SYNTAX: &str = "value";

/// Converts an activity's legacy state blob into target properties, one per
/// state entry, in state order.
///
/// Never fails: shapes that match no known convention still produce a
/// best-effort property.
pub fn extract_properties(state: &Map<String, Value>) -> Vec<TargetProperty> {
    state
        .iter()
        .map(|(key, value)| extract_property(key, value))
        .collect()
}

fn extract_property(key: &str, value: &Value) -> TargetProperty {
    if key == VALUE_EXPRESSION_KEY {
        let (syntax, expression) = typed_expression(value);
        return TargetProperty::single(VALUE_PROPERTY, syntax, expression);
    }

    let name = title_case(key);
    let is_branches = name == BRANCHES_PROPERTY;

    let mut property = if has_nested_fields(value) {
        let (syntax, expression) = typed_expression(value);
        TargetProperty::single(name, syntax, expression)
    } else if is_branches {
        TargetProperty::single(name, LITERAL_SYNTAX, render(value))
    } else {
        TargetProperty::single(name, SCALAR_SYNTAX, render(value))
    };

    // Branches are raw serialized structures, the target also reads them as JSON.
    if is_branches {
        if let Some(literal) = property.expression(LITERAL_SYNTAX).map(str::to_string) {
            property.expressions.insert(JSON_SYNTAX.to_string(), literal);
        }
    }

    property
}

/// Splits a `{ "syntax": .., "expression": .. }` sub-document into its parts.
/// A missing syntax means `Literal`; a missing expression means the whole
/// value rendered as text.
fn typed_expression(value: &Value) -> (String, String) {
    let syntax = value
        .get("syntax")
        .filter(|syntax| !syntax.is_null())
        .map(render)
        .unwrap_or_else(|| LITERAL_SYNTAX.to_string());
    let expression = match value.get("expression") {
        Some(expression) => render(expression),
        None => render(value),
    };
    (syntax, expression)
}

fn has_nested_fields(value: &Value) -> bool {
    match value {
        Value::Object(obj) => !obj.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// Text form of a state value: strings verbatim, `null` as empty text and
/// everything else as compact JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Upper-cases the first letter of every word, leaving the rest untouched.
/// ASCII only, so the result never depends on the host locale.
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for ch in key.chars() {
        if is_word_separator(ch) {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            at_word_start = false;
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn is_word_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '-' | '_' | '.')
}
