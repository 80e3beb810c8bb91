pub mod batch;
pub mod encoder;
pub mod etl;
pub mod normalize;
pub mod pipeline;
pub mod resolver;

pub use crate::domain::model::{BatchOutput, ListingEvent, NormalizedProduct, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Publisher, Storage};
pub use crate::utils::error::Result;
