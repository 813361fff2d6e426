pub mod user;
pub mod course;
pub mod enrollment;
pub mod payment;
pub mod session;

pub use user::*;
pub use course::*;
pub use enrollment::*;
pub use payment::*;
pub use session::*;
