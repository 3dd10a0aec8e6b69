pub mod export;
pub mod fallback;
pub mod gemini;
pub mod news;
pub mod openrouter;
pub mod security;
pub mod sheet;
