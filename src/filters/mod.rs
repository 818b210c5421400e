//! The filter registry: name → filter function, merging user-supplied
//! filters with a fixed built-in library (spec §4.2, §9).

mod number;
mod sequence;
mod string;

use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// The result of invoking a filter: either the transformed value, or an
/// error message describing why the filter could not process its input
/// (surfaced to the caller as `Error::Filter`, per spec §7).
pub type FilterResult = std::result::Result<Value, String>;

/// A filter function: `(input, args) -> Value`, per spec §4.2/§6.
pub type FilterFn = Arc<dyn Fn(&Value, &[Value]) -> FilterResult + Send + Sync>;

/// The built-in filter table, initialized once at first use and read-only
/// thereafter (spec §5: "the filter registry is effectively read-only
/// during evaluation").
static BUILTINS: Lazy<HashMap<String, FilterFn>> = Lazy::new(|| {
    let mut map = HashMap::new();
    string::register(&mut map);
    sequence::register(&mut map);
    number::register(&mut map);
    map
});

/// Resolves `name` against `custom` first, then the built-in table (spec
/// §3.3, §4.4: "the filter registry resolves a name by checking
/// `custom_filters` first, then built-ins").
pub fn resolve(name: &str, custom: &HashMap<String, FilterFn>) -> Option<FilterFn> {
    custom.get(name).cloned().or_else(|| BUILTINS.get(name).cloned())
}

fn wrong_type(filter: &str, expected: &str) -> String {
    format!("{filter} expects a {expected} input")
}
