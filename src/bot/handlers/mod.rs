mod command_public;
mod utils;

pub use command_public::*;
