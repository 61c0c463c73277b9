#[path = "planner/scheduling.rs"]
mod scheduling;
#[path = "planner/travel.rs"]
mod travel;
#[path = "planner/tree.rs"]
mod tree;
