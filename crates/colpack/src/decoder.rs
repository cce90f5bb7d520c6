use crate::bitpack;
use crate::error::DecodeError;
use crate::layout::BlockLayout;
use crate::varint;

/// A fully decoded page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedPage {
    pub values: Vec<i32>,
    /// How many input bytes the page occupied. The page format carries its
    /// own length implicitly, so embedding readers use this to find whatever
    /// follows the page.
    pub bytes_consumed: usize,
}

/// Reader for pages produced by [`DeltaPageEncoder`].
///
/// Construction parses and validates the page header; [`decode_all`]
/// materializes the values. Input bytes are untrusted: all structural
/// problems surface as [`DecodeError`], never panics.
///
/// [`DeltaPageEncoder`]: crate::DeltaPageEncoder
/// [`decode_all`]: DeltaPageDecoder::decode_all
#[derive(Debug)]
pub struct DeltaPageDecoder<'a> {
    input: &'a [u8],
    pos: usize,
    layout: BlockLayout,
    total_values: u64,
    first_value: i32,
}

impl<'a> DeltaPageDecoder<'a> {
    /// Parse the page header at the front of `input`.
    pub fn new(input: &'a [u8]) -> Result<Self, DecodeError> {
        let (layout, mut pos) = BlockLayout::read_from(input)?;
        let (total_values, n) = varint::read_u64(&input[pos..], "page header value count")?;
        pos += n;
        let (first_raw, n) = varint::read_u32(&input[pos..], "page header first value")?;
        pos += n;

        Ok(Self {
            input,
            pos,
            layout,
            total_values,
            first_value: first_raw as i32,
        })
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Logical values in the page, per the header.
    pub fn total_values(&self) -> u64 {
        self.total_values
    }

    /// First value of the page. Meaningless when the page is empty.
    pub fn first_value(&self) -> i32 {
        self.first_value
    }

    /// Decode every value in the page.
    ///
    /// Each block contributes up to `block_size` values; only the
    /// mini-blocks holding live values are present in the input, and packed
    /// slots past the logical count are consumed but discarded. Width bytes
    /// for mini-blocks past the data are skipped without validation.
    pub fn decode_all(mut self) -> Result<DecodedPage, DecodeError> {
        let mut values: Vec<i32> = Vec::new();
        if self.total_values == 0 {
            return Ok(DecodedPage {
                values,
                bytes_consumed: self.pos,
            });
        }

        values.push(self.first_value);
        let mut previous = self.first_value;
        let mut remaining = self.total_values - 1;

        let mini = self.layout.mini_block_size();
        let groups_per_mini = mini / 8;
        let mini_block_count = self.layout.mini_block_count();

        while remaining > 0 {
            let (min_delta, n) =
                varint::read_zigzag_i32(&self.input[self.pos..], "block minimum delta")?;
            self.pos += n;

            if self.input.len() - self.pos < mini_block_count {
                return Err(DecodeError::UnexpectedEof {
                    context: "mini-block bit widths",
                });
            }
            let widths_start = self.pos;
            self.pos += mini_block_count;

            let block_values = remaining.min(self.layout.block_size() as u64);
            let touched = ((block_values + mini as u64 - 1) / mini as u64) as usize;

            for m in 0..touched {
                let width = self.input[widths_start + m];
                if width as usize > bitpack::MAX_WIDTH {
                    return Err(DecodeError::BitWidthTooLarge {
                        mini_block: m,
                        width,
                    });
                }
                let width = width as usize;

                for _ in 0..groups_per_mini {
                    if self.input.len() - self.pos < width {
                        return Err(DecodeError::UnexpectedEof {
                            context: "packed mini-block group",
                        });
                    }
                    let group = bitpack::unpack8(&self.input[self.pos..self.pos + width], width);
                    self.pos += width;

                    for &packed in group.iter() {
                        if remaining == 0 {
                            break;
                        }
                        previous = previous
                            .wrapping_add(min_delta)
                            .wrapping_add(packed as i32);
                        values.push(previous);
                        remaining -= 1;
                    }
                }
            }
        }

        Ok(DecodedPage {
            values,
            bytes_consumed: self.pos,
        })
    }
}
