// Domain layer: form/preference models and the ports the survey engine talks through.

pub mod model;
pub mod ports;
