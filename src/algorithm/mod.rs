pub mod camera_path;
pub mod damping;
pub mod free_look;
pub mod loop_blend;
pub mod loop_reset;
pub mod scroll_tracker;
pub mod snap;
