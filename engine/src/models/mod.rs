// Engine-side data models. Value objects shared with a presentation layer live in `shared::models`.
pub mod series;

pub use series::{IndicatorKind, Row, Series};
