// Domain layer: records, criteria and the ports the loaders and front ends plug into.

pub mod model;
pub mod ports;
