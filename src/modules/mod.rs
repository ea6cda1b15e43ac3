pub mod media;
pub mod reel;
