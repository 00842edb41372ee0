pub mod record;
pub mod user;
pub mod window;

pub use record::*;
pub use user::*;
pub use window::*;
