pub mod parse;
pub mod session;
