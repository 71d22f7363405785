// OpenAI-compatible client (always available)
pub mod openai_compatible;

// Provider-specific clients and catalogs (feature-gated)
pub mod providers;

pub use brainatom_core::{ChatRequest, ChatResponse, ChatTransport, Message, Role, Usage};

// Re-export generic client
pub use openai_compatible::{
    ChatCompletionRequest, ChatCompletionResponse, OpenAiCompatibleBuilder, OpenAiCompatibleClient,
};

// Re-export provider clients
#[cfg(feature = "together")]
pub use providers::together::{
    find_brain_atom, gen_brain_atom, get_brain_atoms, TogetherCatalog, TogetherClient,
    TogetherSlug, TOGETHER_API_KEY_ENV, TOGETHER_BASE_URL,
};
