pub mod backend;
pub mod process;
pub mod session;

pub use backend::Backend;
pub use session::PlayerSession;
