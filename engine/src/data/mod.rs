pub mod csv_parser;
pub mod market_data;
pub mod series_buffer;

pub use market_data::{CsvMarketData, MarketDataSource, MarketDataStore};
pub use series_buffer::{DuplicatePolicy, SeriesBuffer};
