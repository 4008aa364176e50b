use crate::error::{CodecError, ConfigurationError};
use crate::values::builtin::{self, DefaultCodec};
use crate::values::{ValueCodec, ValueKind, VariableValue};
use serde_json::Value;
use tracing::debug;

/// Collects codecs before the registry is frozen.
///
/// Registration is additive: there is no way to remove a codec once added.
#[derive(Debug, Default)]
pub struct CodecRegistryBuilder {
    codecs: Vec<Box<dyn ValueCodec>>,
}

impl CodecRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, codec: Box<dyn ValueCodec>) -> &mut Self {
        debug!(codec = codec.name(), priority = codec.priority(), "Registering value codec");
        self.codecs.push(codec);
        self
    }

    /// Registers a codec produced by `factory`. A factory failure is a
    /// configuration error and must abort startup.
    pub fn register_with<F>(&mut self, name: &str, factory: F) -> Result<&mut Self, ConfigurationError>
    where
        F: FnOnce() -> Result<Box<dyn ValueCodec>, String>,
    {
        let codec = factory().map_err(|reason| ConfigurationError::CodecConstruction {
            name: name.to_string(),
            reason,
        })?;
        Ok(self.register(codec))
    }

    /// Registers one of the built-in codecs by its configuration name.
    pub fn register_named(&mut self, name: &str) -> Result<&mut Self, ConfigurationError> {
        let codec = builtin::codec_by_name(name)?;
        Ok(self.register(codec))
    }

    pub fn build(self) -> CodecRegistry {
        let mut codecs = self.codecs;
        // Stable sort keeps registration order between equal priorities.
        codecs.sort_by(|a, b| b.priority().cmp(&a.priority()));
        CodecRegistry {
            codecs,
            fallback: DefaultCodec,
        }
    }
}

/// Immutable, priority-ordered set of value codecs.
///
/// Built once at startup and shared read-only (wrap it in an `Arc` to hand it
/// to several tasks).
#[derive(Debug)]
pub struct CodecRegistry {
    codecs: Vec<Box<dyn ValueCodec>>,
    fallback: DefaultCodec,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        CodecRegistryBuilder::new().build()
    }
}

impl CodecRegistry {
    pub fn builder() -> CodecRegistryBuilder {
        CodecRegistryBuilder::new()
    }

    /// Registry with every built-in codec.
    pub fn standard() -> Self {
        let mut builder = CodecRegistryBuilder::new();
        builder
            .register(Box::new(builtin::TypedCodec))
            .register(Box::new(builtin::DurationCodec));
        builder.build()
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigurationError> {
        let mut builder = CodecRegistryBuilder::new();
        for name in names {
            builder.register_named(name.as_ref())?;
        }
        Ok(builder.build())
    }

    pub fn select_encoder(&self, value: &VariableValue, kind: ValueKind) -> &dyn ValueCodec {
        match self.codecs.iter().find(|codec| codec.can_encode(value, kind)) {
            Some(codec) => codec.as_ref(),
            None => &self.fallback,
        }
    }

    pub fn select_decoder(&self, token: &Value, kind: ValueKind) -> &dyn ValueCodec {
        match self.codecs.iter().find(|codec| codec.can_decode(token, kind)) {
            Some(codec) => codec.as_ref(),
            None => &self.fallback,
        }
    }

    pub fn encode(&self, value: &VariableValue) -> Result<Value, CodecError> {
        let kind = value.kind();
        self.select_encoder(value, kind).encode(value, kind)
    }

    pub fn decode(&self, token: &Value, kind: ValueKind) -> Result<VariableValue, CodecError> {
        self.select_decoder(token, kind).decode(token, kind)
    }

    /// Names of the registered codecs in selection order, without the fallback.
    pub fn names(&self) -> Vec<&str> {
        self.codecs.iter().map(|codec| codec.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
