pub mod geometry;
pub mod sequence;
