mod logging;
mod value;

pub use logging::*;
pub use value::*;
