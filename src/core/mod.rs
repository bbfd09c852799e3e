pub mod scheduler;
pub mod services;
pub mod time;

pub use scheduler::RetryHandle;
pub use time::{Clock, FixedClock, SystemClock};
