use colpack::{BlockLayout, DecodedPage, DeltaPageDecoder, DeltaPageEncoder};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Geometries exercised across the suite: single mini-block, default, wide
/// blocks, and a non-power-of-two mini-block count.
const LAYOUTS: &[(usize, usize)] = &[(128, 1), (128, 2), (128, 4), (256, 8), (384, 3), (512, 4)];

fn layout(block_size: usize, mini_block_count: usize) -> BlockLayout {
    BlockLayout::new(block_size, mini_block_count).expect("valid test layout")
}

fn encode_with(layout: BlockLayout, values: &[i32]) -> Vec<u8> {
    let mut encoder = DeltaPageEncoder::new(layout);
    for &v in values {
        encoder.write(v);
    }
    encoder.finish().to_vec()
}

fn decode(page: &[u8]) -> DecodedPage {
    DeltaPageDecoder::new(page)
        .expect("parse page header")
        .decode_all()
        .expect("decode page")
}

fn assert_roundtrip(layout: BlockLayout, values: &[i32]) {
    let page = encode_with(layout, values);
    let decoded = decode(&page);
    assert_eq!(decoded.values, values, "round-trip with layout {layout:?}");
    assert_eq!(decoded.bytes_consumed, page.len());
}

/// Deterministic xorshift32 stream; full-range values of both signs.
fn sample_values(len: usize) -> Vec<i32> {
    let mut state = 0x9E37_79B9u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as i32
        })
        .collect()
}

#[test]
fn empty_page_roundtrips() {
    let page = encode_with(BlockLayout::default(), &[]);
    let decoder = DeltaPageDecoder::new(&page).expect("parse");
    assert_eq!(decoder.total_values(), 0);

    let decoded = decoder.decode_all().expect("decode");
    assert!(decoded.values.is_empty());
    assert_eq!(decoded.bytes_consumed, page.len());
}

#[test]
fn block_boundary_lengths_roundtrip() {
    // Straddle every interesting boundary of the default 128-delta block:
    // empty, single, partial, one short of full, exactly full, just past
    // full, and several blocks.
    for len in [0, 1, 2, 127, 128, 129, 255, 256, 257, 500] {
        assert_roundtrip(BlockLayout::default(), &sample_values(len));
    }
}

#[test]
fn every_layout_roundtrips() {
    let values = sample_values(700);
    for &(block_size, mini_block_count) in LAYOUTS {
        assert_roundtrip(layout(block_size, mini_block_count), &values);
    }
}

#[test]
fn first_value_is_stored_verbatim() {
    for first in [0, 1, -1, 42, i32::MIN, i32::MAX] {
        let values = [first, 5, -5, 0];
        let page = encode_with(BlockLayout::default(), &values);

        let decoder = DeltaPageDecoder::new(&page).expect("parse");
        assert_eq!(decoder.first_value(), first);
        assert_eq!(decoder.total_values(), 4);
        assert_eq!(decoder.decode_all().expect("decode").values, values);
    }
}

#[test]
fn extreme_swings_roundtrip() {
    // Deltas between alternating extremes wrap through the full i32 range.
    let mut values = Vec::new();
    for _ in 0..100 {
        values.push(i32::MIN);
        values.push(i32::MAX);
    }
    assert_roundtrip(BlockLayout::default(), &values);
}

#[test]
fn descending_sequences_roundtrip() {
    // All-negative deltas: the minimum rebases them to zero.
    let values: Vec<i32> = (0..300).map(|i| 1000 - 3 * i).collect();
    assert_roundtrip(BlockLayout::default(), &values);
}

#[test]
fn large_multi_block_pages_roundtrip() {
    assert_roundtrip(BlockLayout::default(), &sample_values(5000));
    assert_roundtrip(layout(512, 8), &sample_values(5000));
}

#[test]
fn finish_is_idempotent() {
    let values = sample_values(130);
    let mut encoder = DeltaPageEncoder::new(BlockLayout::default());
    for &v in &values {
        encoder.write(v);
    }

    let first = encoder.finish().to_vec();
    let second = encoder.finish().to_vec();
    assert_eq!(first, second);
    assert_eq!(encoder.total_values(), 130);
    assert_eq!(decode(&first).values, values);
}

#[test]
fn reset_encodes_byte_identical_to_fresh() {
    // The first page leaves non-zero rebased deltas in the block buffer; a
    // reset must not let them bleed into the next page's padding bytes.
    let mut reused = DeltaPageEncoder::new(BlockLayout::default());
    for v in [1, 2, 3, 4, 5, 1] {
        reused.write(v);
    }
    let _ = reused.finish();
    reused.reset();
    assert_eq!(reused.total_values(), 0);

    let second_page = [10, 12, 11];
    for v in second_page {
        reused.write(v);
    }
    let from_reused = reused.finish().to_vec();
    let from_fresh = encode_with(BlockLayout::default(), &second_page);
    assert_eq!(from_reused, from_fresh);
}

#[test]
fn reset_after_multi_block_page_encodes_byte_identical() {
    let mut reused = DeltaPageEncoder::new(BlockLayout::default());
    for v in sample_values(400) {
        reused.write(v);
    }
    let _ = reused.finish();
    reused.reset();

    let second_page: Vec<i32> = (0..40).map(|i| i * i).collect();
    for &v in &second_page {
        reused.write(v);
    }
    assert_eq!(
        reused.finish(),
        encode_with(BlockLayout::default(), &second_page)
    );
}

#[test]
fn size_accessors_track_the_buffers() {
    let mut encoder = DeltaPageEncoder::new(BlockLayout::default());
    assert_eq!(encoder.buffered_size(), 0);

    for &v in &sample_values(129) {
        encoder.write(v);
    }
    // One block has been flushed, so output bytes exist before finish.
    let buffered_open = encoder.buffered_size();
    assert!(buffered_open > 0);

    let page_len = encoder.finish().len();
    assert_eq!(encoder.buffered_size(), page_len);
    assert!(buffered_open < page_len);

    // The delta buffer alone accounts for block_size i32 slots.
    assert!(encoder.allocated_size() >= page_len + 128 * std::mem::size_of::<i32>());
}

#[test]
fn output_capacity_is_preallocated() {
    let encoder = DeltaPageEncoder::with_output_capacity(BlockLayout::default(), 64 * 1024);
    assert_eq!(encoder.buffered_size(), 0);
    assert!(encoder.allocated_size() >= 64 * 1024);

    // Pre-sizing changes allocation, never bytes.
    let mut sized = DeltaPageEncoder::with_output_capacity(BlockLayout::default(), 64 * 1024);
    for &v in &sample_values(300) {
        sized.write(v);
    }
    assert_eq!(
        sized.finish(),
        encode_with(BlockLayout::default(), &sample_values(300))
    );
}

proptest! {
    #![proptest_config(ProptestConfig {
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn arbitrary_values_roundtrip(values in prop::collection::vec(any::<i32>(), 0..700)) {
        let page = encode_with(BlockLayout::default(), &values);
        let decoded = decode(&page);
        prop_assert_eq!(decoded.values, values);
        prop_assert_eq!(decoded.bytes_consumed, page.len());
    }

    #[test]
    fn arbitrary_layouts_roundtrip(
        layout_index in 0..LAYOUTS.len(),
        values in prop::collection::vec(any::<i32>(), 0..700),
    ) {
        let (block_size, mini_block_count) = LAYOUTS[layout_index];
        let page = encode_with(layout(block_size, mini_block_count), &values);
        let decoded = decode(&page);
        prop_assert_eq!(decoded.values, values);
        prop_assert_eq!(decoded.bytes_consumed, page.len());
    }

    #[test]
    fn small_deltas_pack_small(values in prop::collection::vec(-100i32..100, 1..120)) {
        // Values in [-100, 100) keep every rebased delta under 2^9, so each
        // touched mini-block packs at most 4 groups of 9 bytes. Headers fit
        // in 16 bytes for these lengths. An encoder that ignored the OR-mask
        // widths would blow well past this bound.
        let page = encode_with(BlockLayout::default(), &values);
        let touched = (values.len() - 1 + 31) / 32;
        let worst_case = 16 + touched * 4 * 9;
        prop_assert!(page.len() <= worst_case, "page {} > bound {}", page.len(), worst_case);
        prop_assert_eq!(decode(&page).values, values);
    }

    #[test]
    fn decoding_any_strict_prefix_fails(
        values in prop::collection::vec(any::<i32>(), 1..300),
        cut_seed in any::<prop::sample::Index>(),
    ) {
        let page = encode_with(BlockLayout::default(), &values);
        let cut = cut_seed.index(page.len());
        // Every byte of a page is structurally required, so a strict prefix
        // must fail to parse or to decode; it must never panic.
        if let Ok(decoder) = DeltaPageDecoder::new(&page[..cut]) {
            prop_assert!(decoder.decode_all().is_err());
        }
    }

    #[test]
    fn corrupt_bytes_never_panic(
        values in prop::collection::vec(any::<i32>(), 0..200),
        flip_seed in any::<prop::sample::Index>(),
        xor in 1u8..,
    ) {
        let mut page = encode_with(BlockLayout::default(), &values);
        let flip = flip_seed.index(page.len());
        page[flip] ^= xor;
        if let Ok(decoder) = DeltaPageDecoder::new(&page) {
            let _ = decoder.decode_all();
        }
    }
}
