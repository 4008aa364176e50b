pub mod batch;
pub mod config;
pub mod error;
pub mod legacy;
pub mod migrate;
pub mod target;
pub mod values;

pub use error::{CodecError, ConfigurationError, DecodeError, EncodeError, TransformError};
pub use legacy::loader::decode_legacy_document;
pub use migrate::transform_document;
pub use target::writer::{decode_target_document, encode_target_document};
