mod feature;
mod framework;
mod roadmap;

pub use feature::*;
pub use framework::*;
pub use roadmap::*;
