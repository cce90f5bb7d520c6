use crate::layout::LayoutError;

/// Errors returned while parsing a delta-packed page.
///
/// Page bytes are untrusted input, so every structural problem maps to a
/// variant here with enough context to point at the offending field.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of page while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("varint too long while reading {context}")]
    VarintTooLong { context: &'static str },

    #[error("invalid page layout: {0}")]
    InvalidLayout(#[from] LayoutError),

    #[error("bit width {width} for mini-block {mini_block} exceeds 32")]
    BitWidthTooLarge { mini_block: usize, width: u8 },
}
