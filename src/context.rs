//! The context value threaded through build pipelines.
//!
//! A context is an open, string-keyed mapping. The global phase accumulates
//! site-wide data into one; every page pipeline owns its own copy seeded
//! from front matter, so concurrent page renders never observe each other.

use serde_json::Value;

/// String-keyed mapping of accumulated pipeline data.
pub type Context = serde_json::Map<String, Value>;

/// Merge `other` into `ctx`, keeping `ctx`'s value wherever a key already
/// exists. Used to layer global data under page-specific data.
pub fn merge_missing(ctx: &mut Context, other: &Context) {
    for (key, value) in other {
        if !ctx.contains_key(key) {
            ctx.insert(key.clone(), value.clone());
        }
    }
}

/// Fetch a string value by key.
pub fn get_str<'a>(ctx: &'a Context, key: &str) -> Option<&'a str> {
    ctx.get(key).and_then(Value::as_str)
}
