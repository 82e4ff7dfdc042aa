// Domain layer: bill models, the allocation services and the ports the boundary layer implements.

pub mod model;
pub mod ports;

pub mod services;
