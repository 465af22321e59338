//! Classification of commit histories: severity of changes and report sections

pub mod change_mapping;
pub mod sections;

pub use change_mapping::{ChangeMapping, DEFAULT_TYPE};
pub use sections::{Section, SectionEntries, Sections, Summary};
