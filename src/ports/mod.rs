//! Ports - async trait boundaries to every external collaborator.
//!
//! Adapters implement these; the dispatcher consumes them. Nothing in
//! this module performs I/O itself.

mod integration_store;
mod interaction_store;
mod model_provider;
mod property_reader;
mod translation_provider;
mod user_reader;

pub use integration_store::IntegrationStore;
pub use interaction_store::InteractionStore;
pub use model_provider::{
    ChatMessage, CompletionRequest, CompletionResponse, ContentPart, MessageContent, MessageRole,
    ModelError, ModelProvider,
};
pub use property_reader::PropertyReader;
pub use translation_provider::{Translation, TranslationError, TranslationProvider};
pub use user_reader::UserReader;
