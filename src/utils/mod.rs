pub mod delay;
pub mod http;
pub mod progress;
