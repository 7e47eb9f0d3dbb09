pub mod catalog;
pub mod constraint;
pub mod coordinate;
pub mod dependency;
pub mod pom;
pub mod revision;
pub mod version;

pub use catalog::Catalog;
pub use constraint::{ConstraintError, VersionConstraint};
pub use coordinate::{Coordinate, CoordinateError, Ga, Gav};
pub use dependency::{Dependency, DescriptorError, Exclusion, Scope};
pub use pom::Pom;
pub use revision::Revision;
pub use version::Version;
