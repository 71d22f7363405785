// Prelude module for brainatom-core
//
// Import commonly used types with: `use brainatom_core::prelude::*;`

pub use crate::{
    // Invocation
    AskInput,
    BrainAtom,
    BrainOutput,
    On,
    // Errors
    BrainError,
    ProviderError,
    // Continuation
    Brief,
    Episode,
    Exchange,
    Series,
    // Output contracts
    JsonSchemaContract,
    OutputContract,
    // Accounting
    Cash,
    Metrics,
    ModelDescriptor,
    PricingTable,
    // Transport
    ChatRequest,
    ChatResponse,
    ChatTransport,
    Usage,
};
