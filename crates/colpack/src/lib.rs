//! Delta binary packed integer pages.
//!
//! Encodes sequences of `i32` values into a compact self-describing payload:
//! values become deltas against their predecessor, deltas are buffered into
//! fixed-size blocks, and each block stores its minimum delta (zig-zag varint)
//! followed by per-mini-block bit widths and the min-subtracted deltas packed
//! at those widths, LSB-first.
//!
//! Page grammar, all integers LEB128 varints:
//!
//! ```text
//! page              := block_size mini_block_count total_value_count first_value block*
//! block             := min_delta bit_width{mini_block_count} packed_mini_block*
//! packed_mini_block := groups of 8 fixed-width values, one byte per width bit
//! ```
//!
//! [`DeltaPageEncoder`] produces pages, [`DeltaPageDecoder`] reads them back,
//! and [`BlockLayout`] fixes the block geometry both sides share.

#![forbid(unsafe_code)]

mod bitpack;
mod decoder;
mod encoder;
mod error;
mod layout;
mod varint;

pub use crate::decoder::{DecodedPage, DeltaPageDecoder};
pub use crate::encoder::DeltaPageEncoder;
pub use crate::error::DecodeError;
pub use crate::layout::{BlockLayout, LayoutError};
