use polarbin::{
    BinaryGridDecoder, DecodeParameters, DecodedGrid, GridGeometryTable, Hemisphere, Resolution,
};
use std::time::Instant;

#[test]
fn test_finest_grid_decode_throughput() {
    // 6.25 km North grid, the largest shape the geometry table produces
    let shape = GridGeometryTable::nsidc_polar_stereo().unwrap().shape_for(Hemisphere::North, Resolution::Km6_25);
    let buffer: Vec<u8> = (0..shape.len())
        .flat_map(|i| ((i % 4000) as u16).to_le_bytes())
        .collect();

    let decoder = BinaryGridDecoder::new(DecodeParameters::default());
    let start = Instant::now();
    let grid = decoder.decode(&buffer, shape, "perf.bin").expect("decode failed");
    let elapsed = start.elapsed();

    let mb_size = buffer.len() as f64 / (1024.0 * 1024.0);
    println!("Decoded {} ({:.1} MB) in {:?}", shape, mb_size, elapsed);
    println!("Throughput: {:.1} MB/s", mb_size / elapsed.as_secs_f64().max(1e-9));

    match grid {
        DecodedGrid::F64(arr) => {
            assert_eq!(arr.dim(), (1792, 1216));
            // Last sample, row-major
            let last = shape.len() - 1;
            let expected = (last % 4000) as f64 * 0.1;
            assert!((arr[[1791, 1215]] - expected).abs() < 1e-9);
        }
        other => panic!("expected float64 grid, got {}", other.element_type_name()),
    }
}
