mod combinators;
mod driver;
pub mod error;
mod primitives;
mod result;
mod state;
mod trampoline;

pub use combinators::*;
pub use driver::*;
pub use error::{ErrorSite, Expectations, ParseError};
pub use primitives::*;
pub use result::*;
pub use state::*;
pub use trampoline::*;
