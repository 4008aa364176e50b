pub mod core;
pub mod metadata;
pub mod properties;
pub mod type_map;

pub use self::core::{DocumentOverrides, Migrator, transform_document};
pub use metadata::backfill_metadata;
pub use properties::{extract_properties, title_case};
pub use type_map::TypeMap;
