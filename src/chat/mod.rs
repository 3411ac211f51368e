pub mod history;
pub mod session;
pub mod template;

pub use session::{DEFAULT_SESSION, SessionStore};
