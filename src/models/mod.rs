pub mod enhancement;
pub mod job;
