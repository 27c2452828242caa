pub mod custom;
pub mod embedded;
pub mod resolve;

pub use custom::{CoercerRegistry, CustomCoercer};
pub use embedded::coerce_embedded;
pub use resolve::resolve_field_value;

/// A field value after coercion. `None` means "omit from the result record",
/// which is distinct from `Some(Value::Null)` — an explicit empty value.
pub type Coerced = Option<serde_json::Value>;
