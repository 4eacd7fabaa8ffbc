//! Session state machine and its Python handle

mod handle;
mod state;
mod summary;


pub use handle::*;
pub use state::*;
pub use summary::*;
