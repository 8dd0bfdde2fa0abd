pub mod openai;
pub mod prompt;

pub use openai::OpenAiService;
pub use prompt::PromptTemplate;
