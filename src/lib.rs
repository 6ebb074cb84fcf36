pub mod climate;
pub mod compose;
pub mod normalizer;
pub mod scrub;
