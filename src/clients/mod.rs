#[macro_use]
mod macros;
mod course_client;
mod payment_client;

pub use course_client::CourseClient;
pub use payment_client::PaymentClient;
