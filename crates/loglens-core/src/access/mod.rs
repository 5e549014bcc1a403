mod parser;
mod reader;

pub use parser::{Sample, parse_line};
pub use reader::{LogLines, LogReader};
