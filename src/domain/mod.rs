//! Domain logic - version algebra and commit history values, independent of git

pub mod build;
pub mod commit;
pub mod identifier;
pub mod prerelease;
pub mod strategy;
pub mod tag;
pub mod version;

pub use build::{Build, BuildIdentifier};
pub use commit::GitCommit;
pub use identifier::{AlphaNumericIdentifier, DigitIdentifier, NumericIdentifier};
pub use prerelease::{PreReleaseIdentifier, PreReleaseIndicator};
pub use strategy::{deduct, CombinedStrategy, CounterStrategy, StaticStrategy, Strategy};
pub use tag::{extract_version, TagName, VersionFilter, VersionTag};
pub use version::{ChangeType, PreRelease, Release, Version, VersionCore};
