// Domain layer: the reservation aggregate, its events and the ports it talks through.

pub mod events;
pub mod model;
pub mod ports;
