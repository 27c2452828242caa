use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::coerce::CoercerRegistry;
use crate::error::ErrorInfo;
use crate::marker::extract_custom_params_blob;
use crate::record::build_parameter_record;
use crate::schema::{parse_schema, Schema};

/// Write-only handle onto the host's variable store.
#[async_trait]
pub trait VariableStore: Send + Sync {
    async fn set_variable(&self, name: &str, value: Value) -> Result<()>;
}

/// Query-expression evaluator applied to the logic result when the node
/// configures a result selector. The crate ships no query language of its
/// own; the host plugs one in at runner construction.
pub trait ResultProjector: Send + Sync {
    fn search(&self, value: &Value, expression: &str) -> Result<Value>;
}

/// The node's raw invocation record: source code plus the loosely typed
/// field values the schema refers to, and the run-control entries
/// (`resultVariable`, `resultSelector`, `errorVariable`,
/// `shouldHandleError`).
#[derive(Clone, Debug)]
pub struct RunRequest {
    data: Map<String, Value>,
}

impl RunRequest {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(anyhow!("run request must be an object, got {other}")),
        }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn code(&self) -> Option<&str> {
        self.data.get("code").and_then(Value::as_str)
    }

    pub fn result_variable(&self) -> Option<&str> {
        self.variable_target("resultVariable")
    }

    pub fn error_variable(&self) -> Option<&str> {
        self.variable_target("errorVariable")
    }

    pub fn result_selector(&self) -> Option<&str> {
        let raw = self.data.get("resultSelector")?.as_str()?;
        if raw.trim().is_empty() || raw == "null" {
            return None;
        }
        Some(raw)
    }

    /// Swallow-mode requires the exact boolean `true`; any other value keeps
    /// failures propagating to the caller.
    pub fn should_handle_error(&self) -> bool {
        self.data.get("shouldHandleError") == Some(&Value::Bool(true))
    }

    // UI forms persist unset variable names as "", "null", or padded text
    fn variable_target(&self, key: &str) -> Option<&str> {
        let trimmed = self.data.get(key)?.as_str()?.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return None;
        }
        Some(trimmed)
    }
}

/// What the user logic receives alongside the original request.
#[derive(Clone, Debug)]
pub struct LogicArgs {
    pub params: Value,
    pub schema: Option<Schema>,
}

#[async_trait]
pub trait NodeLogic: Send + Sync {
    async fn call(&self, request: &RunRequest, args: LogicArgs) -> Result<Value>;
}

#[async_trait]
impl<F> NodeLogic for F
where
    F: Fn(&RunRequest, LogicArgs) -> Result<Value> + Send + Sync,
{
    async fn call(&self, request: &RunRequest, args: LogicArgs) -> Result<Value> {
        (self)(request, args)
    }
}

#[derive(Debug, Serialize)]
pub struct RunOutcome {
    pub result: Value,
    pub error: Option<ErrorInfo>,
}

/// Sequences one node invocation: schema extraction, parameter coercion,
/// user-logic invocation, result projection, and result/error capture into
/// the variable store.
///
/// Coercion failures propagate out of [`NodeRunner::run`] unconditionally —
/// they occur before the logic is invoked and are never swallowed. Failures
/// raised by the logic, the projection, or the result write are snapshotted
/// into [`ErrorInfo`]; with `shouldHandleError == true` the invocation then
/// resolves to `{result: null, error: snapshot}` instead of failing.
pub struct NodeRunner<L> {
    logic: L,
    coercers: CoercerRegistry,
    projector: Option<Box<dyn ResultProjector>>,
}

impl<L: NodeLogic> NodeRunner<L> {
    pub fn new(logic: L) -> Self {
        Self {
            logic,
            coercers: CoercerRegistry::builtin(),
            projector: None,
        }
    }

    /// Merges caller-supplied custom coercers over the built-in set; caller
    /// entries win on name collision.
    pub fn with_coercers(mut self, overrides: CoercerRegistry) -> Self {
        self.coercers.merge(overrides);
        self
    }

    pub fn with_projector<P>(mut self, projector: P) -> Self
    where
        P: ResultProjector + 'static,
    {
        self.projector = Some(Box::new(projector));
        self
    }

    pub async fn run(&self, request: &RunRequest, store: &dyn VariableStore) -> Result<RunOutcome> {
        let schema = match request.code().and_then(extract_custom_params_blob) {
            Some(blob) => Some(parse_schema(blob)?),
            None => None,
        };

        let params = match &schema {
            Some(schema) => {
                debug!(fields = schema.len(), "building parameter record");
                Value::Object(build_parameter_record(request.data(), schema, &self.coercers)?)
            }
            None => Value::Object(Map::new()),
        };

        let args = LogicArgs { params, schema };
        match self.invoke(request, args, store).await {
            Ok(result) => Ok(RunOutcome {
                result,
                error: None,
            }),
            Err(err) => {
                let snapshot = ErrorInfo::from_error(&err);
                if let Some(name) = request.error_variable() {
                    warn!(variable = name, "storing node failure snapshot");
                    store
                        .set_variable(name, serde_json::to_value(&snapshot)?)
                        .await?;
                }
                if request.should_handle_error() {
                    Ok(RunOutcome {
                        result: Value::Null,
                        error: Some(snapshot),
                    })
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn invoke(
        &self,
        request: &RunRequest,
        args: LogicArgs,
        store: &dyn VariableStore,
    ) -> Result<Value> {
        let mut result = self.logic.call(request, args).await?;

        if let Some(selector) = request.result_selector() {
            let projector = self.projector.as_ref().ok_or_else(|| {
                anyhow!("result selector \"{selector}\" is set but no projector is configured")
            })?;
            result = projector.search(&result, selector)?;
        }

        if let Some(name) = request.result_variable() {
            store.set_variable(name, result.clone()).await?;
        }

        Ok(result)
    }
}
