pub mod coerce;
pub mod error;
pub mod marker;
pub mod notation;
pub mod record;
pub mod run;
pub mod schema;

pub use coerce::{coerce_embedded, resolve_field_value, Coerced, CoercerRegistry, CustomCoercer};
pub use error::{CodedError, CoercionError, ErrorInfo};
pub use marker::{extract_custom_params_blob, CUSTOM_PARAMS_TAG};
pub use notation::extract_field_type_notation;
pub use record::build_parameter_record;
pub use run::{
    LogicArgs, NodeLogic, NodeRunner, ResultProjector, RunOutcome, RunRequest, VariableStore,
};
pub use schema::{parse_schema, FieldSchema, FieldType, Schema};
