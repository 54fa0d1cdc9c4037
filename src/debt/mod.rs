pub mod classify;
pub mod duplication;
pub mod estimate;
pub mod plan;
