// Job listings pipeline.
// normalize (once per fetch) → filter → sort → slice, then the per-user
// applied/saved overlay at render time. `board` drives it against the API.

pub mod board;
pub mod controller;
pub mod display;
pub mod filters;
pub mod normalizer;
pub mod overlay;
pub mod paginate;
pub mod sort;

pub use board::{JobBoard, SeekerList};
pub use filters::{FilterDefaults, FilterUpdate};
pub use paginate::DisplayMode;
