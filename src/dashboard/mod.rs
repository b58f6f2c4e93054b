pub mod aggregate;
pub mod filter;
pub mod session;
pub mod view;
