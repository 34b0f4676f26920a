pub mod amount;
pub mod dates;
pub mod keywords;
pub mod text;

pub use amount::{format_amount, parse_amount};
pub use text::clean_text;
