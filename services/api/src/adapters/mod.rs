pub mod chart;
pub mod db;
pub mod ollama_llm;
pub mod openai_llm;

pub use chart::PngChartRenderer;
pub use db::DbAdapter;
pub use ollama_llm::OllamaChatAdapter;
pub use openai_llm::OpenAiChatAdapter;
