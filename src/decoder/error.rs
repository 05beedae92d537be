//! Decoder-specific error types

/// Result type for chainstate record decoding
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Per-record decode failures
///
/// Every variant except [`DecodeError::MissingObfuscationKey`] is local to the
/// record being decoded: the session logs it, counts it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A varint's continuation chain ran past the end of the input
    #[error("Truncated varint starting at offset {offset}")]
    TruncatedVarint { offset: usize },

    /// A varint whose magnitude does not fit in 64 bits
    #[error("Varint exceeds 64 bits")]
    VarintOverflow,

    /// Key shorter than tag + 32-byte txid
    #[error("Truncated key: {len} bytes, need at least 33")]
    TruncatedKey { len: usize },

    /// Value shorter than a fixed-size field requires
    #[error("Truncated value: {field} needs {needed} bytes, {available} available")]
    TruncatedValue {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// Value decoding requested without an obfuscation key
    #[error("Obfuscation key missing or empty")]
    MissingObfuscationKey,

    /// Script too short for the positional tests its discriminant implies
    #[error("Unsupported script shape: discriminant {discriminant} with {len} script bytes")]
    UnsupportedScriptShape { discriminant: u64, len: usize },

    /// Decompressed amount does not fit in 64 bits
    #[error("Compressed amount {0} decompresses beyond 64 bits")]
    AmountOverflow(u64),
}

impl DecodeError {
    /// Whether this error invalidates every subsequent record of the session
    pub fn is_fatal(&self) -> bool {
        matches!(self, DecodeError::MissingObfuscationKey)
    }
}
