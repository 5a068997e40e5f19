pub mod cycle;
pub mod health;

pub use cycle::run_cycle;
pub use health::{health_check, home, readiness_check};
