use std::marker::PhantomData;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::constraint;
use crate::{BrainError, ResponseFormat, Value};

/// Name under which the output schema is declared to the provider.
pub const RESPONSE_SCHEMA_NAME: &str = "response";

/// The output shape a caller requires from the model.
///
/// `declaration` tells the provider what to produce; `validate` checks what
/// came back. A contract either yields a fully validated value or an error.
pub trait OutputContract: Send + Sync {
    type Output: Send;

    fn declaration(&self) -> Result<ResponseFormat, BrainError>;

    fn validate(&self, value: Value) -> Result<Self::Output, String>;
}

/// Contract derived from a Rust type.
///
/// `schemars` supplies the schema. A reply must deserialize into `T` and also
/// satisfy every keyword of that schema, so range, length and pattern
/// attributes on `T`'s fields are enforced as declared.
pub struct JsonSchemaContract<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSchemaContract<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonSchemaContract<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonSchemaContract<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: JsonSchema> JsonSchemaContract<T> {
    fn schema() -> Result<Value, serde_json::Error> {
        serde_json::to_value(schemars::schema_for!(T))
    }
}

impl<T> OutputContract for JsonSchemaContract<T>
where
    T: JsonSchema + DeserializeOwned + Send,
{
    type Output = T;

    fn declaration(&self) -> Result<ResponseFormat, BrainError> {
        let schema = Self::schema().map_err(|err| {
            BrainError::InvalidConfig(format!("unserializable output schema: {err}"))
        })?;
        Ok(ResponseFormat::strict_json_schema(RESPONSE_SCHEMA_NAME, schema))
    }

    fn validate(&self, value: Value) -> Result<T, String> {
        let output = T::deserialize(&value).map_err(|err| err.to_string())?;
        let schema = Self::schema().map_err(|err| format!("unserializable output schema: {err}"))?;
        constraint::check(&schema, &value)?;
        Ok(output)
    }
}

/// Parses raw provider text and runs it through `contract`.
///
/// Text that is not JSON fails with [`BrainError::ResponseParse`]; JSON that
/// breaks the contract fails with [`BrainError::SchemaValidation`]. Both carry
/// the raw text.
pub fn parse_response<C>(contract: &C, raw: &str) -> Result<C::Output, BrainError>
where
    C: OutputContract + ?Sized,
{
    let value: Value = serde_json::from_str(raw).map_err(|err| BrainError::ResponseParse {
        output: raw.to_string(),
        reason: err.to_string(),
    })?;

    contract
        .validate(value)
        .map_err(|violation| BrainError::SchemaValidation {
            output: raw.to_string(),
            violation,
        })
}
