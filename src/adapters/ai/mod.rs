//! Model provider adapters.

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockModelProvider, MockModelResponse};
pub use openai_provider::{OpenAiProvider, OpenAiProviderConfig};
