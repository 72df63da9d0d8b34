pub mod constraint;
pub mod schedule;
pub mod task;
