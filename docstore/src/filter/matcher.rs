use crate::collection::Document;
use crate::common::{Value, FIELD_SEPARATOR, OPERATOR_PREFIX, OP_EQ, OP_EXISTS, OP_IN, OP_NE};
use crate::errors::{DocStoreError, DocStoreResult, ErrorKind};

/// Evaluates a filter against a document.
///
/// The collection narrows candidates with an index and then asks the matcher
/// for the final verdict on every candidate, so a matcher must agree with
/// plain equality on the constraints reported by [equality_constraints].
pub trait FilterMatcher: Send + Sync {
    fn matches(&self, document: &Document, filter: &Document) -> DocStoreResult<bool>;
}

/// Default matcher for mapping-shaped filters.
///
/// * `{ name: "Bob" }` holds when the value at `name` equals `"Bob"`, or when
///   `name` is an array containing `"Bob"`.
/// * `{ arr: { val: 5 } }` descends into the path `arr.val`; arrays met on the
///   way match if any element matches.
/// * `{ age: { $ne: 3 } }` applies operators: `$eq`, `$ne`, `$in`, `$exists`.
/// * `{ name: null }` holds when `name` is missing or null.
///
/// Every top level entry must hold. An empty filter matches everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct EqualityMatcher;

impl FilterMatcher for EqualityMatcher {
    fn matches(&self, document: &Document, filter: &Document) -> DocStoreResult<bool> {
        for (key, constraint) in filter.iter() {
            if key.starts_with(OPERATOR_PREFIX) {
                return Err(unsupported_operator(&key));
            }
            if !matches_path(document, &key, &constraint)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn matches_path(document: &Document, path: &str, constraint: &Value) -> DocStoreResult<bool> {
    match constraint {
        Value::Document(nested) => {
            if is_operator_document(nested)? {
                let candidates = candidates(document, path)?;
                for (operator, operand) in nested.iter() {
                    if !apply_operator(&operator, &operand, &candidates)? {
                        return Ok(false);
                    }
                }
                return Ok(true);
            }

            for (key, value) in nested.iter() {
                let child = format!("{}{}{}", path, FIELD_SEPARATOR, key);
                if !matches_path(document, &child, &value)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        value => Ok(equals_any(&candidates(document, path)?, value)),
    }
}

fn apply_operator(operator: &str, operand: &Value, candidates: &[Value]) -> DocStoreResult<bool> {
    match operator {
        OP_EQ => Ok(equals_any(candidates, operand)),
        OP_NE => Ok(!equals_any(candidates, operand)),
        OP_IN => match operand {
            Value::Array(options) => Ok(options.iter().any(|option| equals_any(candidates, option))),
            other => {
                log::error!("$in expects an array operand, found {}", other);
                Err(DocStoreError::new(
                    &format!("$in expects an array operand, found {}", other),
                    ErrorKind::FilterError,
                ))
            }
        },
        OP_EXISTS => {
            let expected = operand.as_bool().unwrap_or(!operand.is_null());
            Ok(candidates.iter().any(|c| !c.is_null()) == expected)
        }
        other => Err(unsupported_operator(other)),
    }
}

fn equals_any(candidates: &[Value], expected: &Value) -> bool {
    if expected.is_null() {
        return candidates.is_empty() || candidates.iter().any(Value::is_null);
    }
    candidates.iter().any(|candidate| candidate == expected)
}

fn is_operator_document(document: &Document) -> DocStoreResult<bool> {
    let operators = document.iter().filter(|(k, _)| k.starts_with(OPERATOR_PREFIX)).count();
    if operators == 0 {
        Ok(false)
    } else if operators == document.size() {
        Ok(true)
    } else {
        log::error!("Filter mixes operators and fields: {}", document);
        Err(DocStoreError::new(
            &format!("Filter mixes operators and fields: {}", document),
            ErrorKind::FilterError,
        ))
    }
}

fn unsupported_operator(operator: &str) -> DocStoreError {
    log::error!("Unsupported filter operator {}", operator);
    DocStoreError::new(
        &format!("Unsupported filter operator {}", operator),
        ErrorKind::FilterError,
    )
}

/// Every value reachable at `path`: arrays fan out at each segment, and an
/// array at the end of the path contributes itself as well as its elements.
fn candidates(document: &Document, path: &str) -> DocStoreResult<Vec<Value>> {
    let segments: Vec<&str> = path.split(FIELD_SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        log::error!("Invalid filter path '{}'", path);
        return Err(DocStoreError::new(
            &format!("Invalid filter path '{}'", path),
            ErrorKind::FilterError,
        ));
    }

    let mut out = Vec::new();
    if let Some(value) = document.field(segments[0]) {
        collect(value, &segments[1..], &mut out);
    }
    Ok(out)
}

fn collect(value: &Value, segments: &[&str], out: &mut Vec<Value>) {
    match (value, segments.split_first()) {
        (Value::Array(items), None) => {
            out.push(value.clone());
            out.extend(items.iter().cloned());
        }
        (value, None) => out.push(value.clone()),
        (Value::Document(doc), Some((segment, rest))) => {
            if let Some(next) = doc.field(segment) {
                collect(next, rest, out);
            }
        }
        (Value::Array(items), Some((segment, rest))) => match segment.parse::<usize>() {
            Ok(position) => {
                if let Some(item) = items.get(position) {
                    collect(item, rest, out);
                }
            }
            Err(_) => {
                for item in items {
                    collect(item, segments, out);
                }
            }
        },
        _ => {}
    }
}

/// Flattens `filter` into `(path, value)` equality constraints.
///
/// Plain values and `$eq` operands count; other operators do not.
pub fn equality_constraints(filter: &Document) -> Vec<(String, Value)> {
    let mut constraints = Vec::new();
    flatten_constraints(filter, "", &mut constraints);
    constraints
}

fn flatten_constraints(filter: &Document, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in filter.iter() {
        if key.starts_with(OPERATOR_PREFIX) {
            continue;
        }

        let path = if prefix.is_empty() {
            key
        } else {
            format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
        };

        match value {
            Value::Document(nested) => match is_operator_document(&nested) {
                Ok(true) => {
                    if let Some((_, operand)) = nested.iter().find(|(op, _)| op == OP_EQ) {
                        out.push((path, operand));
                    }
                }
                Ok(false) => flatten_constraints(&nested, &path, out),
                Err(_) => {}
            },
            value => out.push((path, value)),
        }
    }
}
