// Domain layer: measurement/species types and the ports the core talks to.

pub mod model;
pub mod ports;
