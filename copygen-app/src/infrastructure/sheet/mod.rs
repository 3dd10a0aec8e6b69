mod sheet_fetcher;

pub use sheet_fetcher::{render_markdown, SheetFetcher};
