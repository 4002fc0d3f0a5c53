pub mod cv;
pub mod letter;
pub mod normalize;
