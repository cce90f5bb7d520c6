#![no_main]

use libfuzzer_sys::fuzz_target;

/// Valid geometries to rotate through; the first input byte selects one.
const LAYOUTS: &[(usize, usize)] = &[(128, 4), (128, 1), (256, 8), (384, 3)];

const MAX_FUZZ_VALUES: usize = 4096;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let (block_size, mini_block_count) = LAYOUTS[selector as usize % LAYOUTS.len()];
    let Ok(layout) = colpack::BlockLayout::new(block_size, mini_block_count) else {
        return;
    };

    let mut encoder = colpack::DeltaPageEncoder::new(layout);
    let mut values = Vec::new();
    for chunk in rest.chunks_exact(4).take(MAX_FUZZ_VALUES) {
        let v = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        values.push(v);
        encoder.write(v);
    }
    let page = encoder.finish();

    let decoder = colpack::DeltaPageDecoder::new(page).expect("own pages parse");
    assert_eq!(decoder.total_values(), values.len() as u64);

    let decoded = decoder.decode_all().expect("own pages decode");
    assert_eq!(decoded.values, values);
    assert_eq!(decoded.bytes_consumed, page.len());
});
