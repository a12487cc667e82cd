pub mod corpus;
pub mod handlers;
pub mod ollama;
pub mod parse;
pub mod stream;
pub mod system;

pub use corpus::CorpusStore;
pub use handlers::{router, AppState};
pub use ollama::OllamaClient;
pub use parse::{lookup, FortuneRecord};
pub use system::FortuneSystem;
