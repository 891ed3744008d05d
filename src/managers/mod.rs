// Bookmark manager state managers
// Managers own mutable view state and the timers tied to it.

pub mod deadline;
pub mod view_controller;
