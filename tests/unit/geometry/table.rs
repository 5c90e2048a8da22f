use super::*;

#[test]
fn builtin_covers_every_enum_variant() {
    let t = GeometryTable::builtin();
    for &c in CodingType::ALL {
        assert!(t.coding_rule(c).is_ok(), "{c}");
    }
    for &f in PixelFormat::ALL {
        assert!(t.format_rule(f).is_ok(), "{f}");
    }
    t.validate().unwrap();
}

#[test]
fn packed_yuv_has_no_fbc_layout() {
    let t = GeometryTable::builtin();
    assert!(matches!(
        t.fbc_format_rule(PixelFormat::Yuyv),
        Err(VencError::UnsupportedFormat(_))
    ));
    assert_eq!(t.fbc_format_rule(PixelFormat::Yuv420sp).unwrap().bits_per_pixel, 12);
}

#[test]
fn json_round_trip_preserves_table() {
    let t = GeometryTable::builtin();
    let json = t.to_json_string().unwrap();
    assert!(json.contains("\"avc\""));
    assert!(json.contains("\"yuv420sp10bit\""));
    assert_eq!(GeometryTable::from_json_str(&json).unwrap(), t);
}

#[test]
fn partial_table_limits_support() {
    let json = r#"{
        "coding": { "avc": { "v_align": 16 } },
        "formats": {
            "yuv420sp": { "luma_bits": 8, "byte_align": 16, "plane_num": 3, "plane_den": 2 }
        },
        "fbc": {
            "block_width": 16, "block_height": 16, "hdr_bytes_per_block": 16,
            "h_align": 64, "v_align": 16, "hdr_align": 4096, "bdy_align": 4096
        }
    }"#;
    let t = GeometryTable::from_json_str(json).unwrap();
    assert!(t.coding_rule(CodingType::Avc).is_ok());
    assert!(matches!(
        t.coding_rule(CodingType::Hevc),
        Err(VencError::UnsupportedFormat(_))
    ));
    assert!(t.format_rule(PixelFormat::Yuv420sp).unwrap().fbc.is_none());
}

#[test]
fn zero_alignment_is_rejected() {
    let mut t = GeometryTable::builtin();
    t.fbc.hdr_align = 0;
    assert!(matches!(t.validate(), Err(VencError::InvalidArgument(_))));

    let mut t = GeometryTable::builtin();
    t.coding.insert(CodingType::Avc, CodingRule { v_align: 0 });
    let err = t.validate().unwrap_err();
    assert!(err.to_string().contains("avc.v_align"));
}
