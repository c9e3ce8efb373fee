pub mod mixer;
pub mod sink;
