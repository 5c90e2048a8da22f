use super::*;

#[test]
fn raw_ids_round_trip() {
    for &c in CodingType::ALL {
        assert_eq!(CodingType::from_raw(c.raw()).unwrap(), c);
    }
    for &f in PixelFormat::ALL {
        assert_eq!(PixelFormat::from_raw(f.raw()).unwrap(), f);
    }
    assert_eq!(CodingType::Avc.raw(), 7);
    assert_eq!(CodingType::Hevc.raw(), 0x0100_0004);
    assert_eq!(PixelFormat::Yuv420sp.raw(), 0);
    assert_eq!(PixelFormat::Argb8888.raw(), 0x0001_000a);
}

#[test]
fn unknown_raw_ids_are_unsupported() {
    assert!(matches!(
        CodingType::from_raw(0xffff),
        Err(VencError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        CodingType::try_from(0),
        Err(VencError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        PixelFormat::from_raw(17),
        Err(VencError::UnsupportedFormat(_))
    ));
}

#[test]
fn names_parse_back() {
    for &c in CodingType::ALL {
        assert_eq!(c.as_str().parse::<CodingType>().unwrap(), c);
    }
    for &f in PixelFormat::ALL {
        assert_eq!(f.to_string().parse::<PixelFormat>().unwrap(), f);
    }
    assert!("h266".parse::<CodingType>().is_err());
}

#[test]
fn serde_uses_table_names() {
    assert_eq!(
        serde_json::to_string(&PixelFormat::Yuv420sp10bit).unwrap(),
        r#""yuv420sp10bit""#
    );
    let c: CodingType = serde_json::from_str(r#""hevc""#).unwrap();
    assert_eq!(c, CodingType::Hevc);
}

#[test]
fn rgb_formats_are_flagged() {
    assert!(PixelFormat::Rgb888.is_rgb());
    assert!(!PixelFormat::Yuv444p.is_rgb());
}
