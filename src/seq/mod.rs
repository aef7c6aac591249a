//! Sequence operations
//!
//! Ordered-collection helpers with JavaScript contracts. A sequence argument
//! is an array, or a string treated as a sequence of one-character strings.
//! Anything else (null, undefined, scalars) degrades to an empty sequence for
//! the pure operations; the mutating operations (`pull` family, `remove`,
//! `reverse`) require an array and return
//! [`Error::ImmutableInput`](crate::Error::ImmutableInput) otherwise.
//!
//! Equality inside the search-style operations (`difference`, `index_of`,
//! `intersection`, `pull`, `sorted_index_of`) is SameValueZero: `NaN` is
//! findable, but two structurally-equal objects are distinct. Use
//! [`difference_with`] with [`Value::deep_equals`] when structural comparison
//! is wanted.

use crate::error::{Error, Result};
use crate::value::Value;
use std::cmp::Ordering;
use std::rc::Rc;

/// Elements of a sequence: arrays yield their items, strings their
/// characters, everything else is empty.
pub(crate) fn elements(seq: &Value) -> Vec<Value> {
    match seq {
        Value::Array(items) => items.borrow().clone(),
        Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
        _ => Vec::new(),
    }
}

fn require_array<'a>(
    seq: &'a Value,
    operation: &str,
) -> Result<&'a Rc<std::cell::RefCell<Vec<Value>>>> {
    seq.as_array()
        .ok_or_else(|| Error::immutable_input(operation, seq.type_name()))
}

/// Resolve a [start, end) range against a length, with negative indices
/// counted from the end. An inverted range collapses to empty.
fn clamp_range(start: i64, end: i64, len: usize) -> (usize, usize) {
    let len = len as i64;
    let resolve = |idx: i64| -> usize {
        if idx < 0 {
            (len + idx).max(0) as usize
        } else {
            idx.min(len) as usize
        }
    };
    let (start, end) = (resolve(start), resolve(end));
    if start >= end {
        (0, 0)
    } else {
        (start, end)
    }
}

/// A predicate over elements. The variants make the lodash callable
/// shorthands explicit: a bare value is never silently treated as equality.
pub enum Predicate {
    /// Arbitrary boolean function of the element
    Func(Box<dyn Fn(&Value) -> bool>),
    /// Structural equality against a fixed value (the `matches` shorthand)
    Matches(Value),
    /// Truthiness of a named property on each element (the pluck shorthand)
    Property(String),
}

impl Predicate {
    /// Predicate from a function
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Predicate::Func(Box::new(f))
    }

    /// Predicate matching elements deep-equal to `value`
    pub fn matches(value: impl Into<Value>) -> Self {
        Predicate::Matches(value.into())
    }

    /// Predicate testing truthiness of `name` on each element
    pub fn property(name: impl Into<String>) -> Self {
        Predicate::Property(name.into())
    }

    /// Apply the predicate to one element
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::Func(f) => f(value),
            Predicate::Matches(expected) => value.deep_equals(expected),
            Predicate::Property(name) => value.get(name).to_boolean(),
        }
    }
}

/// An element mapping. Like [`Predicate`], the property shorthand is an
/// explicit variant rather than an overloaded argument.
pub enum Iteratee {
    /// The element itself
    Identity,
    /// Arbitrary mapping function
    Func(Box<dyn Fn(&Value) -> Value>),
    /// A named property of each element
    Property(String),
}

impl Iteratee {
    /// Iteratee from a function
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        Iteratee::Func(Box::new(f))
    }

    /// Iteratee reading property `name` of each element
    pub fn property(name: impl Into<String>) -> Self {
        Iteratee::Property(name.into())
    }

    /// Apply the iteratee to one element
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            Iteratee::Identity => value.clone(),
            Iteratee::Func(f) => f(value),
            Iteratee::Property(name) => value.get(name),
        }
    }
}

/// Array of integers from `start` up to (not including) `end`
pub fn range(start: i64, end: i64) -> Value {
    Value::array((start..end).map(Value::from).collect())
}

/// Element count of a sequence; objects count their keys
pub fn size(value: &Value) -> usize {
    match value {
        Value::Object(properties) => properties.borrow().len(),
        other => other.length().unwrap_or(0),
    }
}

/// New sequence with all falsy values removed, order preserved
pub fn compact(seq: &Value) -> Value {
    Value::array(elements(seq).into_iter().filter(|v| v.to_boolean()).collect())
}

/// Elements for which the predicate holds
pub fn filter(seq: &Value, predicate: &Predicate) -> Value {
    Value::array(
        elements(seq)
            .into_iter()
            .filter(|v| predicate.test(v))
            .collect(),
    )
}

/// Element-wise mapping
pub fn map(seq: &Value, iteratee: &Iteratee) -> Value {
    Value::array(elements(seq).iter().map(|v| iteratee.apply(v)).collect())
}

/// New sequence of `seq`'s elements followed by each argument: arrays are
/// spread one level, scalars appended as single elements. An array of arrays
/// therefore contributes its inner arrays as single nested elements.
pub fn concat(seq: &Value, args: &[Value]) -> Value {
    let mut out = elements(seq);
    for arg in args {
        match arg {
            Value::Array(items) => out.extend(items.borrow().iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    Value::array(out)
}

/// Union of the elements of every array-typed argument. Non-array arguments
/// are ignored, as documented for the difference family.
fn union_elements(others: &[Value]) -> Vec<Value> {
    let mut out = Vec::new();
    for other in others {
        if let Value::Array(items) = other {
            out.extend(items.borrow().iter().cloned());
        }
    }
    out
}

/// Elements of `seq` not SameValueZero-present in the union of the
/// array-typed `others`
pub fn difference(seq: &Value, others: &[Value]) -> Value {
    let excluded = union_elements(others);
    Value::array(
        elements(seq)
            .into_iter()
            .filter(|v| !excluded.iter().any(|e| v.same_value_zero(e)))
            .collect(),
    )
}

/// Like [`difference`], but equality compares `iteratee(a)` vs `iteratee(b)`
pub fn difference_by(seq: &Value, others: &[Value], iteratee: &Iteratee) -> Value {
    let excluded: Vec<Value> = union_elements(others)
        .iter()
        .map(|v| iteratee.apply(v))
        .collect();
    Value::array(
        elements(seq)
            .into_iter()
            .filter(|v| {
                let key = iteratee.apply(v);
                !excluded.iter().any(|e| key.same_value_zero(e))
            })
            .collect(),
    )
}

/// Like [`difference`], but equality is decided by a binary comparator
pub fn difference_with<F>(seq: &Value, others: &[Value], comparator: F) -> Value
where
    F: Fn(&Value, &Value) -> bool,
{
    let excluded = union_elements(others);
    Value::array(
        elements(seq)
            .into_iter()
            .filter(|v| !excluded.iter().any(|e| comparator(v, e)))
            .collect(),
    )
}

/// Slice with the first `n` elements removed: a clone when `n <= 0`, empty
/// when `n >= len`
pub fn drop(seq: &Value, n: i64) -> Value {
    let n = n.max(0) as usize;
    Value::array(elements(seq).into_iter().skip(n).collect())
}

/// Mirror of [`drop`] from the end
pub fn drop_right(seq: &Value, n: i64) -> Value {
    let items = elements(seq);
    let keep = items.len().saturating_sub(n.max(0) as usize);
    Value::array(items.into_iter().take(keep).collect())
}

/// Drops the maximal prefix for which the predicate holds
pub fn drop_while(seq: &Value, predicate: &Predicate) -> Value {
    let items = elements(seq);
    let start = items
        .iter()
        .position(|v| !predicate.test(v))
        .unwrap_or(items.len());
    Value::array(items[start..].to_vec())
}

/// Drops the maximal suffix for which the predicate holds
pub fn drop_right_while(seq: &Value, predicate: &Predicate) -> Value {
    let items = elements(seq);
    let end = items
        .iter()
        .rposition(|v| !predicate.test(v))
        .map(|i| i + 1)
        .unwrap_or(0);
    Value::array(items[..end].to_vec())
}

/// Overwrite indices [start, end) in place with `value`. No-op when
/// `start >= end`, and on strings and other non-arrays (they are immutable
/// and fill is documented to leave them untouched rather than fail).
pub fn fill(seq: &Value, value: &Value, start: Option<i64>, end: Option<i64>) {
    let Some(items) = seq.as_array() else {
        return;
    };
    let mut items = items.borrow_mut();
    let len = items.len();
    let (start, end) = clamp_range(start.unwrap_or(0), end.unwrap_or(len as i64), len);
    for slot in &mut items[start..end] {
        *slot = value.clone();
    }
}

/// First index where the predicate holds, or -1
pub fn find_index(seq: &Value, predicate: &Predicate) -> i64 {
    elements(seq)
        .iter()
        .position(|v| predicate.test(v))
        .map(|i| i as i64)
        .unwrap_or(-1)
}

/// Flatten one nesting level
pub fn flatten(seq: &Value) -> Value {
    let mut out = Vec::new();
    for item in elements(seq) {
        match &item {
            Value::Array(inner) => out.extend(inner.borrow().iter().cloned()),
            _ => out.push(item),
        }
    }
    Value::array(out)
}

/// Flatten all nesting levels
pub fn flatten_deep(seq: &Value) -> Value {
    fn walk(items: &[Value], out: &mut Vec<Value>) {
        for item in items {
            match item {
                Value::Array(inner) => walk(&inner.borrow(), out),
                other => out.push(other.clone()),
            }
        }
    }
    let mut out = Vec::new();
    walk(&elements(seq), &mut out);
    Value::array(out)
}

/// Map each element through the iteratee, then flatten one level
pub fn flat_map(seq: &Value, iteratee: &Iteratee) -> Value {
    flatten(&map(seq, iteratee))
}

/// First element, or Undefined. Strings yield their first character.
pub fn head(seq: &Value) -> Value {
    nth(seq, 0)
}

/// Last element, or Undefined
pub fn last(seq: &Value) -> Value {
    nth(seq, -1)
}

/// Element at index `n` (negative counts from the end), or Undefined
pub fn nth(seq: &Value, n: i64) -> Value {
    let items = elements(seq);
    let idx = if n < 0 { n + items.len() as i64 } else { n };
    if idx < 0 || idx >= items.len() as i64 {
        Value::Undefined
    } else {
        items[idx as usize].clone()
    }
}

/// All elements but the last; empty for empty or non-sequence input
pub fn initial(seq: &Value) -> Value {
    drop_right(seq, 1)
}

/// All elements but the first; empty for empty or non-sequence input
pub fn tail(seq: &Value) -> Value {
    drop(seq, 1)
}

/// First index >= `from_index` whose element is SameValueZero-equal to
/// `value`, or -1. A negative `from_index` counts from the end.
pub fn index_of(seq: &Value, value: &Value, from_index: i64) -> i64 {
    let items = elements(seq);
    let len = items.len() as i64;
    let start = if from_index < 0 {
        (len + from_index).max(0)
    } else {
        from_index.min(len)
    } as usize;
    items
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, v)| v.same_value_zero(value))
        .map(|(i, _)| i as i64)
        .unwrap_or(-1)
}

/// Unique values present in `seq` and in every array-typed argument, in
/// `seq`'s order. Defined over arrays only.
pub fn intersection(seq: &Value, others: &[Value]) -> Value {
    let Some(items) = seq.as_array() else {
        return Value::array(Vec::new());
    };
    let other_lists: Vec<Vec<Value>> = others
        .iter()
        .filter_map(|o| o.as_array().map(|items| items.borrow().clone()))
        .collect();
    let mut out: Vec<Value> = Vec::new();
    for v in items.borrow().iter() {
        if out.iter().any(|seen| seen.same_value_zero(v)) {
            continue;
        }
        if other_lists
            .iter()
            .all(|list| list.iter().any(|e| e.same_value_zero(v)))
        {
            out.push(v.clone());
        }
    }
    Value::array(out)
}

/// Elements stringified and joined with `separator`. Nullish elements
/// contribute empty strings, as `Array.prototype.join` does.
pub fn join(seq: &Value, separator: &str) -> String {
    elements(seq)
        .iter()
        .map(|v| {
            if v.is_nullish() {
                String::new()
            } else {
                v.to_display_string()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Remove all SameValueZero occurrences of the given values in place.
/// Returns the sequence handle; fails on read-only sequences.
pub fn pull(seq: &Value, values: &[Value]) -> Result<Value> {
    let items = require_array(seq, "pull")?;
    items
        .borrow_mut()
        .retain(|v| !values.iter().any(|x| v.same_value_zero(x)));
    Ok(seq.clone())
}

/// [`pull`] with the values given as a single array
pub fn pull_all(seq: &Value, values: &Value) -> Result<Value> {
    let items = require_array(seq, "pullAll")?;
    let excluded = elements(values);
    items
        .borrow_mut()
        .retain(|v| !excluded.iter().any(|x| v.same_value_zero(x)));
    Ok(seq.clone())
}

/// Remove elements at the given indices in place, returning the removed
/// elements in index-argument order. Array-typed index arguments are
/// flattened. Out-of-range indices contribute Undefined and remove nothing.
pub fn pull_at(seq: &Value, indexes: &[Value]) -> Result<Value> {
    let items = require_array(seq, "pullAt")?;
    let mut wanted: Vec<i64> = Vec::new();
    for idx in indexes {
        match idx {
            Value::Array(inner) => wanted.extend(inner.borrow().iter().map(|v| v.to_number() as i64)),
            other => wanted.push(other.to_number() as i64),
        }
    }

    let mut items = items.borrow_mut();
    let removed: Vec<Value> = wanted
        .iter()
        .map(|&i| {
            if i >= 0 && (i as usize) < items.len() {
                items[i as usize].clone()
            } else {
                Value::Undefined
            }
        })
        .collect();

    // delete from the highest position down so earlier removals don't shift
    // the positions still to be removed
    let mut positions: Vec<usize> = wanted
        .iter()
        .filter(|&&i| i >= 0 && (i as usize) < items.len())
        .map(|&i| i as usize)
        .collect();
    positions.sort_unstable();
    positions.dedup();
    for &pos in positions.iter().rev() {
        items.remove(pos);
    }

    Ok(Value::array(removed))
}

/// Remove elements for which the predicate holds, in place, returning the
/// removed elements
pub fn remove(seq: &Value, predicate: &Predicate) -> Result<Value> {
    let items = require_array(seq, "remove")?;
    let mut items = items.borrow_mut();
    let (removed, kept): (Vec<Value>, Vec<Value>) =
        items.drain(..).partition(|v| predicate.test(v));
    *items = kept;
    Ok(Value::array(removed))
}

/// Reverse in place and return the sequence handle; fails on read-only
/// sequences. See [`to_reversed`] for the pure variant.
pub fn reverse(seq: &Value) -> Result<Value> {
    let items = require_array(seq, "reverse")?;
    items.borrow_mut().reverse();
    Ok(seq.clone())
}

/// Pure counterpart of [`reverse`]: a new reversed sequence, input untouched
pub fn to_reversed(seq: &Value) -> Value {
    let mut items = elements(seq);
    items.reverse();
    Value::array(items)
}

/// Shallow copy of the sub-range [start, end); negative indices count from
/// the end
pub fn slice(seq: &Value, start: i64, end: Option<i64>) -> Value {
    let items = elements(seq);
    let (start, end) = clamp_range(start, end.unwrap_or(items.len() as i64), items.len());
    Value::array(items[start..end].to_vec())
}

/// Ordering used by the sorted-array searches: numbers (and anything
/// number-coercible) numerically, strings lexicographically.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a
            .to_number()
            .partial_cmp(&b.to_number())
            .unwrap_or(Ordering::Equal),
    }
}

/// Lowest index at which `value` could be inserted into the sorted sequence
/// while keeping it sorted. Binary search; meaningless on unsorted input.
pub fn sorted_index(seq: &Value, value: &Value) -> usize {
    let items = elements(seq);
    let (mut lo, mut hi) = (0usize, items.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if compare_values(&items[mid], value) == Ordering::Less {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Binary-search index of the first occurrence of `value` in the sorted
/// sequence, or -1
pub fn sorted_index_of(seq: &Value, value: &Value) -> i64 {
    let items = elements(seq);
    let idx = sorted_index(seq, value);
    if idx < items.len() && items[idx].same_value_zero(value) {
        idx as i64
    } else {
        -1
    }
}
