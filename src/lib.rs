pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{HttpPublisher, LocalStorage};
pub use core::batch::parse_batch;
pub use core::encoder::{encode, encode_now};
pub use core::etl::{EtlEngine, EtlReport};
pub use core::pipeline::CatalogPipeline;
pub use core::resolver::resolve;
pub use domain::model::{ListingEvent, NormalizedProduct, Platform};
pub use utils::error::{EtlError, ParseError, Result};
