pub mod audio;
pub mod burst;
pub mod caption;
pub mod leap;
pub mod surface;
pub mod text;
