mod copy_plan;
mod copy_request;
mod copy_row;
mod news_item;
mod text_limits;

pub use copy_plan::CopyPlan;
pub use copy_request::CopyRequest;
pub use copy_row::{CopyRow, COPY_COLUMNS};
pub use news_item::NewsItem;
pub use text_limits::{TextLimits, DEFAULT_BODY_MAX_CHARS, DEFAULT_TITLE_MAX_CHARS};
