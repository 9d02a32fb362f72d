//! XML text helpers shared by the WordprocessingML reader and writer.

mod escape;

pub use escape::{escape_attr, escape_text, predefined_entity};
