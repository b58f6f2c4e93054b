pub mod error;
pub mod image;
pub mod invoker;
pub mod normalize;
pub mod report;
