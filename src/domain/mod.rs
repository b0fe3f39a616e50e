// Domain layer: event models, run outcomes and the ports the batch talks through.

pub mod model;
pub mod ports;
