// Domain layer: models, the template document and ports. No AWS types here.

pub mod model;
pub mod ports;
pub mod template;
