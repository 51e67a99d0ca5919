pub mod status;
pub mod transcript;

pub use status::*;
pub use transcript::*;
