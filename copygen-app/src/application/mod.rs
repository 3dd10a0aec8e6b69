mod generate_copy;
pub mod post_process;
mod prompt;

pub use generate_copy::{GenerateCopy, LlmBackend, NEWS_UNAVAILABLE, NO_NEWS, NO_SHEET_DATA};
pub use prompt::{build_copy_prompt, PromptContext};
