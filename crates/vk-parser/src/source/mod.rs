pub mod outcome;
pub mod quality;
pub mod source_list;

pub use outcome::Outcome;
pub use quality::Quality;
pub use source_list::SourceList;
