mod news_search;

pub use news_search::{render_news, NewsSearch, NewsSource};
