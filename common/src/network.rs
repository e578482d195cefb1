pub mod credential;
pub mod interface;
pub mod range;
