pub mod process;

pub use process::{GameHost, SystemGameHost};
