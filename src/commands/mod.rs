mod handlers;
mod parser;

pub use handlers::execute;
pub use parser::{Command, parse_command};
