// Domain layer: product/event models and ports (interfaces).

pub mod model;
pub mod ports;
