use crate::bitpack;
use crate::layout::BlockLayout;
use crate::varint;

/// Streaming encoder for delta binary packed integer pages.
///
/// Values are reduced to deltas against their predecessor and buffered until a
/// full block is available. Flushing a block subtracts the block's minimum
/// delta from every entry (making them non-negative), then bit-packs each
/// mini-block at the narrowest width that fits its values. The page header
/// (block geometry, value count, first value) is prepended by [`finish`].
///
/// All buffers are allocated once and reused; [`reset`] clears the encoder for
/// the next page without freeing anything.
///
/// [`finish`]: DeltaPageEncoder::finish
/// [`reset`]: DeltaPageEncoder::reset
#[derive(Debug)]
pub struct DeltaPageEncoder {
    layout: BlockLayout,
    total_values: u64,
    first_value: i32,
    previous_value: i32,
    /// Delta buffer for the current block; always `block_size` long. The first
    /// `pending_count` entries are live, the rest holds leftovers from earlier
    /// flushes that the packer masks away.
    pending: Vec<i32>,
    pending_count: usize,
    /// Minimum delta in `pending`; `None` exactly when `pending_count == 0`.
    min_delta: Option<i32>,
    /// Per-mini-block bit widths of the block being flushed.
    widths: Vec<u8>,
    /// Encoded bytes of every block flushed so far.
    blocks: Vec<u8>,
    /// The finalized page; filled by the first `finish`.
    page: Vec<u8>,
    finished: bool,
}

impl DeltaPageEncoder {
    pub fn new(layout: BlockLayout) -> Self {
        Self::with_output_capacity(layout, 0)
    }

    /// Like [`DeltaPageEncoder::new`], but pre-sizes the encoded-block buffer
    /// for callers that know roughly how large their pages get.
    pub fn with_output_capacity(layout: BlockLayout, output_capacity: usize) -> Self {
        Self {
            layout,
            total_values: 0,
            first_value: 0,
            previous_value: 0,
            pending: vec![0; layout.block_size()],
            pending_count: 0,
            min_delta: None,
            widths: vec![0; layout.mini_block_count()],
            blocks: Vec::with_capacity(output_capacity),
            page: Vec::new(),
            finished: false,
        }
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Values accepted since construction or the last [`DeltaPageEncoder::reset`].
    pub fn total_values(&self) -> u64 {
        self.total_values
    }

    /// Append one value to the page.
    ///
    /// The first value is only recorded for the header; every later value
    /// buffers its delta (wrapping two's-complement subtraction) and flushes a
    /// block once `block_size` deltas are pending. Must not be called after
    /// [`DeltaPageEncoder::finish`] until the encoder is reset.
    pub fn write(&mut self, value: i32) {
        debug_assert!(!self.finished, "write after finish without reset");
        self.total_values += 1;
        if self.total_values == 1 {
            self.first_value = value;
            self.previous_value = value;
            return;
        }

        let delta = value.wrapping_sub(self.previous_value);
        self.previous_value = value;

        self.pending[self.pending_count] = delta;
        self.pending_count += 1;
        self.min_delta = Some(self.min_delta.map(|m| m.min(delta)).unwrap_or(delta));

        if self.pending_count == self.layout.block_size() {
            self.flush_block();
        }
    }

    /// Encode the pending deltas as one block and append it to `blocks`.
    ///
    /// Layout per block: zig-zag varint minimum delta, one width byte per
    /// mini-block (zero for mini-blocks past the data), then the touched
    /// mini-blocks bit-packed in groups of 8. The trailing mini-block packs
    /// whatever the buffer holds past `pending_count`; those slots are
    /// don't-care bytes the decoder never materializes.
    fn flush_block(&mut self) {
        let Some(min_delta) = self.min_delta.take() else {
            return;
        };
        let n = self.pending_count;
        self.pending_count = 0;

        for delta in &mut self.pending[..n] {
            *delta = delta.wrapping_sub(min_delta);
        }

        varint::write_zigzag_i32(&mut self.blocks, min_delta);

        let mini = self.layout.mini_block_size();
        let touched = (n + mini - 1) / mini;

        for m in 0..self.layout.mini_block_count() {
            self.widths[m] = if m < touched {
                let start = m * mini;
                let end = (start + mini).min(n);
                let mut mask = 0u32;
                for &delta in &self.pending[start..end] {
                    mask |= delta as u32;
                }
                bitpack::required_bits(mask) as u8
            } else {
                0
            };
        }
        self.blocks.extend_from_slice(&self.widths);

        for m in 0..touched {
            let width = self.widths[m] as usize;
            let mini_start = m * mini;
            let mut group = [0u32; 8];
            for group_start in (mini_start..mini_start + mini).step_by(8) {
                for (slot, &delta) in group
                    .iter_mut()
                    .zip(&self.pending[group_start..group_start + 8])
                {
                    *slot = delta as u32;
                }
                bitpack::pack8(&group, width, &mut self.blocks);
            }
        }
    }

    /// Finalize the page and return its encoded bytes.
    ///
    /// The first call flushes any partial block and assembles the header;
    /// later calls return the same payload unchanged.
    pub fn finish(&mut self) -> &[u8] {
        if !self.finished {
            self.flush_block();

            self.layout.write_to(&mut self.page);
            varint::write_u64(&mut self.page, self.total_values);
            // The raw bit pattern as an unsigned varint; at most 5 bytes for
            // any i32, negative first values included.
            varint::write_u32(&mut self.page, self.first_value as u32);
            self.page.append(&mut self.blocks);
            self.finished = true;

            log::debug!(
                "finalized delta page: {} values in {} bytes",
                self.total_values,
                self.page.len()
            );
        }
        &self.page
    }

    /// Bytes of encoded output buffered so far: flushed blocks while the page
    /// is open, the whole payload once finished.
    pub fn buffered_size(&self) -> usize {
        self.blocks.len() + self.page.len()
    }

    /// Total capacity of the owned buffers.
    pub fn allocated_size(&self) -> usize {
        self.pending.capacity() * std::mem::size_of::<i32>()
            + self.widths.capacity()
            + self.blocks.capacity()
            + self.page.capacity()
    }

    /// Clear all page state while keeping every allocation.
    ///
    /// The delta buffer is zeroed so a reset encoder emits byte-identical
    /// pages to a freshly constructed one; leftovers from the previous page
    /// would otherwise leak into the next page's don't-care bytes.
    pub fn reset(&mut self) {
        self.total_values = 0;
        self.first_value = 0;
        self.previous_value = 0;
        self.pending.fill(0);
        self.pending_count = 0;
        self.min_delta = None;
        self.blocks.clear();
        self.page.clear();
        self.finished = false;
    }
}
