use super::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QpRange {
    min: u8,
    max: u8,
    init: i16,
}

impl StructBlob for QpRange {
    const SIZE: usize = 4;

    fn write_bytes(&self, out: &mut [u8]) {
        out[0] = self.min;
        out[1] = self.max;
        out[2..4].copy_from_slice(&self.init.to_le_bytes());
    }

    fn read_bytes(bytes: &[u8]) -> Self {
        Self {
            min: bytes[0],
            max: bytes[1],
            init: i16::from_le_bytes([bytes[2], bytes[3]]),
        }
    }
}

#[test]
fn every_kind_round_trips() {
    let mut s = AttrStore::init().unwrap();
    s.set_s32("a.s32", i32::MIN).unwrap();
    s.set_u32("a.u32", u32::MAX).unwrap();
    s.set_s64("a.s64", -1).unwrap();
    s.set_u64("a.u64", u64::MAX).unwrap();
    s.set_ptr("a.ptr", OpaquePtr::from_addr(0xdead_beef)).unwrap();
    s.set_st("a.st", &[9, 8, 7]).unwrap();

    assert_eq!(s.get_s32("a.s32").unwrap(), i32::MIN);
    assert_eq!(s.get_u32("a.u32").unwrap(), u32::MAX);
    assert_eq!(s.get_s64("a.s64").unwrap(), -1);
    assert_eq!(s.get_u64("a.u64").unwrap(), u64::MAX);
    assert_eq!(s.get_ptr("a.ptr").unwrap().addr(), 0xdead_beef);
    assert_eq!(s.get_st("a.st").unwrap(), &[9, 8, 7]);
    assert_eq!(s.len(), 6);
}

#[test]
fn wrong_kind_is_type_mismatch_not_reinterpretation() {
    let mut s = AttrStore::init().unwrap();
    s.set_s32("rc.mode", -1).unwrap();
    let err = s.get_u32("rc.mode").unwrap_err();
    match err {
        VencError::TypeMismatch {
            name,
            stored,
            requested,
        } => {
            assert_eq!(name, "rc.mode");
            assert_eq!(stored, ValueKind::S32);
            assert_eq!(requested, ValueKind::U32);
        }
        other => panic!("expected type mismatch, got {other:?}"),
    }
    assert!(matches!(s.get_st("rc.mode"), Err(VencError::TypeMismatch { .. })));
}

#[test]
fn missing_key_is_not_found() {
    let s = AttrStore::init().unwrap();
    assert!(matches!(s.get_u32("base.width"), Err(VencError::NotFound(_))));
}

#[test]
fn empty_name_is_invalid_argument() {
    let mut s = AttrStore::init().unwrap();
    assert!(matches!(s.set_u32("", 1), Err(VencError::InvalidArgument(_))));
    assert!(matches!(s.get_u32(""), Err(VencError::InvalidArgument(_))));
    assert!(matches!(s.stage_get(""), Err(VencError::InvalidArgument(_))));
    assert!(s.is_empty());
}

#[test]
fn keys_are_case_sensitive() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("base.Width", 1).unwrap();
    s.set_u32("base.width", 2).unwrap();
    assert_eq!(s.get_u32("base.Width").unwrap(), 1);
    assert_eq!(s.get_u32("base.width").unwrap(), 2);
}

#[test]
fn set_overwrites_including_kind() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("k", 1).unwrap();
    s.set_s64("k", -5).unwrap();
    assert_eq!(s.kind_of("k"), Some(ValueKind::S64));
    assert_eq!(s.get_s64("k").unwrap(), -5);
    assert_eq!(s.len(), 1);
}

#[test]
fn get_st_into_leaves_buffer_untouched_on_size_mismatch() {
    let mut s = AttrStore::init().unwrap();
    s.set_st("roi", &[1, 2, 3, 4]).unwrap();

    let mut short = [0xaau8; 3];
    assert!(matches!(
        s.get_st_into("roi", &mut short),
        Err(VencError::InvalidArgument(_))
    ));
    assert_eq!(short, [0xaa; 3]);

    let mut exact = [0u8; 4];
    s.get_st_into("roi", &mut exact).unwrap();
    assert_eq!(exact, [1, 2, 3, 4]);
}

#[test]
fn staged_edit_matches_direct_set() {
    let initial = QpRange {
        min: 10,
        max: 51,
        init: -1,
    };
    let edited = QpRange {
        min: 20,
        max: 40,
        init: 30,
    };

    let mut staged = AttrStore::init().unwrap();
    staged.set_struct("rc.qp", &initial).unwrap();
    {
        let mut slot = staged.stage_get("rc.qp").unwrap();
        let bytes = slot.bytes_mut().unwrap();
        bytes[0] = 20;
        bytes[1] = 40;
        bytes[2..4].copy_from_slice(&30i16.to_le_bytes());
    }
    assert_eq!(staged.stage_put().unwrap(), 1);

    let mut direct = AttrStore::init().unwrap();
    direct.set_struct("rc.qp", &edited).unwrap();

    assert_eq!(staged.get_st("rc.qp").unwrap(), direct.get_st("rc.qp").unwrap());
    assert_eq!(staged.get_struct::<QpRange>("rc.qp").unwrap(), edited);
}

#[test]
fn staged_edits_are_invisible_until_put() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("rc.bps_target", 1_000_000).unwrap();
    s.set_u32("rc.bps_max", 1_500_000).unwrap();

    *s.stage_get("rc.bps_target").unwrap().u32_mut().unwrap() = 2_000_000;
    *s.stage_get("rc.bps_max").unwrap().u32_mut().unwrap() = 3_000_000;
    assert!(s.has_pending());
    assert_eq!(s.get_u32("rc.bps_target").unwrap(), 1_000_000);
    assert_eq!(s.get_u32("rc.bps_max").unwrap(), 1_500_000);

    assert_eq!(s.stage_put().unwrap(), 2);
    assert!(!s.has_pending());
    assert_eq!(s.get_u32("rc.bps_target").unwrap(), 2_000_000);
    assert_eq!(s.get_u32("rc.bps_max").unwrap(), 3_000_000);
}

#[test]
fn repeated_stage_get_returns_the_same_pending_slot() {
    let mut s = AttrStore::init().unwrap();
    s.set_s32("rc.qp_init", 26).unwrap();
    *s.stage_get("rc.qp_init").unwrap().s32_mut().unwrap() += 1;
    *s.stage_get("rc.qp_init").unwrap().s32_mut().unwrap() += 1;
    s.stage_put().unwrap();
    assert_eq!(s.get_s32("rc.qp_init").unwrap(), 28);
}

#[test]
fn stage_put_without_pending_is_noop() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("k", 7).unwrap();
    assert_eq!(s.stage_put().unwrap(), 0);
    assert_eq!(s.get_u32("k").unwrap(), 7);
}

#[test]
fn stage_get_of_missing_key_is_not_found() {
    let mut s = AttrStore::init().unwrap();
    assert!(matches!(s.stage_get("nope"), Err(VencError::NotFound(_))));
    assert!(!s.has_pending());
}

#[test]
fn staged_slot_checks_kind() {
    let mut s = AttrStore::init().unwrap();
    s.set_u64("k", 1).unwrap();
    let mut slot = s.stage_get("k").unwrap();
    assert_eq!(slot.kind(), ValueKind::U64);
    assert!(matches!(slot.u32_mut(), Err(VencError::TypeMismatch { .. })));
    assert!(matches!(slot.bytes_mut(), Err(VencError::TypeMismatch { .. })));
    *slot.u64_mut().unwrap() = 9;
    s.stage_put().unwrap();
    assert_eq!(s.get_u64("k").unwrap(), 9);
}

#[test]
fn staged_struct_helpers_keep_blob_length() {
    let mut s = AttrStore::init().unwrap();
    s.set_struct(
        "rc.qp",
        &QpRange {
            min: 1,
            max: 2,
            init: 3,
        },
    )
    .unwrap();
    let mut slot = s.stage_get("rc.qp").unwrap();
    let mut qp: QpRange = slot.read_struct().unwrap();
    qp.max = 45;
    slot.write_struct(&qp).unwrap();
    s.stage_put().unwrap();
    assert_eq!(s.get_st("rc.qp").unwrap().len(), QpRange::SIZE);
    assert_eq!(s.get_struct::<QpRange>("rc.qp").unwrap().max, 45);
}

#[test]
fn stage_discard_drops_pending_edits() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("k", 1).unwrap();
    *s.stage_get("k").unwrap().u32_mut().unwrap() = 2;
    assert_eq!(s.stage_discard(), 1);
    assert_eq!(s.stage_put().unwrap(), 0);
    assert_eq!(s.get_u32("k").unwrap(), 1);
}

#[test]
fn direct_set_supersedes_pending_stage() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("rc.gop", 30).unwrap();
    s.stage_get("rc.gop").unwrap();
    s.set_u32("rc.gop", 60).unwrap();
    assert!(!s.has_pending());
    assert_eq!(s.stage_put().unwrap(), 0);
    assert_eq!(s.get_u32("rc.gop").unwrap(), 60);

    *s.stage_get("rc.gop").unwrap().u32_mut().unwrap() = 90;
    s.set_s32("rc.gop", -1).unwrap();
    s.stage_put().unwrap();
    assert_eq!(s.get_s32("rc.gop").unwrap(), -1);
}

#[test]
fn remove_drops_pending_stage() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("x", 1).unwrap();
    *s.stage_get("x").unwrap().u32_mut().unwrap() = 2;
    assert_eq!(s.remove("x"), Some(Value::U32(1)));
    assert_eq!(s.stage_put().unwrap(), 0);
    assert!(!s.contains("x"));
}

#[test]
fn get_struct_rejects_wrong_size() {
    let mut s = AttrStore::init().unwrap();
    s.set_st("rc.qp", &[1, 2]).unwrap();
    assert!(matches!(
        s.get_struct::<QpRange>("rc.qp"),
        Err(VencError::InvalidArgument(_))
    ));
}

#[test]
fn dump_lists_entries_in_key_order() {
    let mut s = AttrStore::init().unwrap();
    s.set_u32("prep.width", 1920).unwrap();
    s.set_s32("base.low_delay", 0).unwrap();
    let dump = s.dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("base.low_delay"));
    assert!(lines[0].contains("s32"));
    assert!(lines[1].starts_with("prep.width"));
    assert!(lines[1].ends_with("1920"));
}

#[test]
fn json_profile_round_trips() {
    let json = r#"{
        "base.width": { "u32": 1920 },
        "rc.mode": { "s32": 1 },
        "rc.roi": { "st": [1, 2, 3] }
    }"#;
    let s = AttrStore::from_json_str(json).unwrap();
    assert_eq!(s.get_u32("base.width").unwrap(), 1920);
    assert_eq!(s.get_s32("rc.mode").unwrap(), 1);
    assert_eq!(s.get_st("rc.roi").unwrap(), &[1, 2, 3]);

    let back = AttrStore::from_json_str(&s.to_json_string().unwrap()).unwrap();
    assert_eq!(back.entries(), s.entries());
}

#[test]
fn malformed_json_profile_is_serde_error() {
    assert!(matches!(
        AttrStore::from_json_str(r#"{ "k": { "f32": 1.0 } }"#),
        Err(VencError::Serde(_))
    ));
}

#[test]
fn missing_profile_file_is_reported() {
    let err = AttrStore::from_path("/nonexistent/hwvenc/profile.json").unwrap_err();
    assert!(err.to_string().contains("open attribute profile"));
}
