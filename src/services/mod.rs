pub mod constraint_checker;
pub mod overlap_index;
pub mod schedule_review;
pub mod schedule_utils;
pub mod slot_scorer;
pub mod solver;
pub mod task_order;
pub mod time_slots;
