// Domain layer: section model and the ports the navigator depends on.

pub mod model;
pub mod ports;
