//! Structured-output invocation and accounting for hosted chat models.
//!
//! One call to [`ask`] composes the conversation, sends it through a
//! [`ChatTransport`], validates the reply against an [`OutputContract`],
//! prices it, and returns the [`Episode`] to continue from next time.

mod atom;
mod brief;
mod cash;
mod constraint;
mod contract;
mod episode;
mod error;
mod invoke;
mod llm;
mod message;
mod metrics;
pub mod prelude;
mod spec;

pub use atom::{ask, AskInput, BrainAtom, BrainOutput, On, TransportFactory};
pub use brief::{cast_briefs_to_prompt, Brief};
pub use cash::Cash;
pub use contract::{parse_response, JsonSchemaContract, OutputContract, RESPONSE_SCHEMA_NAME};
pub use episode::{continue_chain, Continuables, ContinuationInput, Episode, Exchange, Series};
pub use error::{BrainError, ProviderError};
pub use invoke::{invoke_provider, ProviderReply};
pub use llm::{
    ChatRequest, ChatResponse, ChatTransport, JsonSchemaFormat, Message, ResponseFormat, Role,
    Usage,
};
pub use message::compose_messages;
pub use metrics::{calc_cash, calc_metrics, CacheCounts, Cost, Counts, Metrics, MetricsInput, Size};
pub use spec::{
    BrainSpec, CacheRates, CashRates, CashUnit, CostSpec, Domain, GainSpec, Grades, ModelDescriptor,
    PricingTable, Skills, TimeSpec,
};

pub type Value = serde_json::Value;
