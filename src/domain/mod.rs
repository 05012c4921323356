pub mod money;
pub mod payment;
pub mod ports;
pub mod routine;
pub mod schedule;
