use crate::error::DecodeError;
use crate::varint;

/// Block geometry for a delta-packed page, fixed at construction.
///
/// A block holds `block_size` deltas and is split into `mini_block_count`
/// mini-blocks that are bit-packed independently. The constructor enforces
/// the constraints the wire format relies on:
///
/// - `block_size` is a positive multiple of 128,
/// - `mini_block_count` evenly divides `block_size`,
/// - the resulting mini-block size is a multiple of 8 (packing works on
///   groups of 8 values).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    block_size: usize,
    mini_block_count: usize,
    mini_block_size: usize,
}

/// Rejected [`BlockLayout`] parameters.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("block size {block_size} is not a positive multiple of 128")]
    BlockSizeNotMultipleOf128 { block_size: usize },

    #[error("block size {block_size} does not fit in 32 bits")]
    BlockSizeTooLarge { block_size: usize },

    #[error("mini-block count {mini_block_count} does not evenly divide block size {block_size}")]
    MiniBlockCountNotDivisor {
        block_size: usize,
        mini_block_count: usize,
    },

    #[error(
        "mini-block size {mini_block_size} ({block_size} values / {mini_block_count} mini-blocks) is not a multiple of 8"
    )]
    MiniBlockSizeNotMultipleOf8 {
        block_size: usize,
        mini_block_count: usize,
        mini_block_size: usize,
    },
}

impl BlockLayout {
    pub fn new(block_size: usize, mini_block_count: usize) -> Result<Self, LayoutError> {
        if block_size == 0 || block_size % 128 != 0 {
            return Err(LayoutError::BlockSizeNotMultipleOf128 { block_size });
        }
        if u32::try_from(block_size).is_err() {
            return Err(LayoutError::BlockSizeTooLarge { block_size });
        }
        if mini_block_count == 0 || block_size % mini_block_count != 0 {
            return Err(LayoutError::MiniBlockCountNotDivisor {
                block_size,
                mini_block_count,
            });
        }
        let mini_block_size = block_size / mini_block_count;
        if mini_block_size % 8 != 0 {
            return Err(LayoutError::MiniBlockSizeNotMultipleOf8 {
                block_size,
                mini_block_count,
                mini_block_size,
            });
        }
        Ok(Self {
            block_size,
            mini_block_count,
            mini_block_size,
        })
    }

    /// Deltas per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Independently packed mini-blocks per block.
    pub fn mini_block_count(&self) -> usize {
        self.mini_block_count
    }

    /// Deltas per mini-block (`block_size / mini_block_count`).
    pub fn mini_block_size(&self) -> usize {
        self.mini_block_size
    }

    /// Append the two leading page-header varints (block size, mini-block
    /// count).
    pub fn write_to(&self, out: &mut Vec<u8>) {
        varint::write_u32(out, self.block_size as u32);
        varint::write_u32(out, self.mini_block_count as u32);
    }

    /// Parse the two leading page-header varints and re-validate them,
    /// returning the layout and the number of bytes consumed.
    pub fn read_from(input: &[u8]) -> Result<(Self, usize), DecodeError> {
        let (block_size, consumed) = varint::read_u32(input, "page header block size")?;
        let (mini_block_count, n) =
            varint::read_u32(&input[consumed..], "page header mini-block count")?;
        let layout = Self::new(block_size as usize, mini_block_count as usize)?;
        Ok((layout, consumed + n))
    }
}

impl Default for BlockLayout {
    /// 128 deltas per block in 4 mini-blocks of 32.
    fn default() -> Self {
        Self {
            block_size: 128,
            mini_block_count: 4,
            mini_block_size: 32,
        }
    }
}
