pub mod output;
pub mod sink;
pub mod tcp;
