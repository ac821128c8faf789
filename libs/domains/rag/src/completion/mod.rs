mod openai;
mod provider;

pub use openai::OpenAICompletionProvider;
pub use provider::{CompletionProvider, CompletionStream};

#[cfg(test)]
pub use provider::MockCompletionProvider;
