pub mod invoke;
pub mod package;
pub mod train;
