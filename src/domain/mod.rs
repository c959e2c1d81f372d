// Domain layer: ledger model and the port used to load it.

pub mod model;
pub mod ports;
