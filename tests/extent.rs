//! Integration coverage for the extent model (C2).

use sparse_stream::{Extent, ExtentKind};

#[test]
fn contiguous_extents_cover_the_full_range_with_no_gaps() {
    let extents = [
        Extent::new(0, 100, ExtentKind::Data, false),
        Extent::new(100, 50, ExtentKind::Zero, false),
        Extent::new(150, 200, ExtentKind::Data, false),
    ];

    let mut expected_start = 0u64;
    for extent in &extents {
        assert_eq!(extent.start, expected_start);
        expected_start = extent.end();
    }
    assert_eq!(expected_start, 350);
}

#[test]
fn dirty_flag_is_independent_of_kind() {
    let data = Extent::new(0, 10, ExtentKind::Data, true);
    let zero = Extent::new(10, 10, ExtentKind::Zero, true);
    assert!(data.is_dirty() && zero.is_dirty());
    assert!(data.is_data() && zero.is_zero());
}
