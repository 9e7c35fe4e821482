pub mod fps;

pub use fps::{FpsCounter, FpsSample, TITLE_REFRESH_INTERVAL};
