use super::*;
use crate::foundation::error::VencError;

#[test]
fn init_and_init_by_name_share_stage() {
    let a = StageCfg::init(Stage::Start).unwrap();
    let b = StageCfg::init_by_name("start").unwrap();
    let c = StageCfg::init_by_name("venc_start_cfg").unwrap();
    assert_eq!(a.stage(), b.stage());
    assert_eq!(b.stage(), c.stage());
}

#[test]
fn init_raw_rejects_butt() {
    assert!(matches!(
        StageCfg::init_raw(Stage::BUTT),
        Err(VencError::InvalidArgument(_))
    ));
    assert_eq!(StageCfg::init_raw(4).unwrap().stage(), Stage::Stop);
}

#[test]
fn unknown_profile_name_is_not_found() {
    assert!(matches!(
        StageCfg::init_by_name("warmup"),
        Err(VencError::NotFound(_))
    ));
}

#[test]
fn custom_registry_resolves_aliases() {
    let mut reg = ProfileRegistry::empty();
    reg.register("live", Stage::Reset).unwrap();
    let cfg = StageCfg::init_by_name_in(&reg, "live").unwrap();
    assert_eq!(cfg.stage(), Stage::Reset);
}

#[test]
fn typed_accessors_mirror_the_store() {
    let mut cfg = StageCfg::init(Stage::Init).unwrap();
    cfg.set_s32("chan.id", 2).unwrap();
    cfg.set_u32("init.max_width", 3840).unwrap();
    cfg.set_st("init.name", b"cam0").unwrap();
    assert_eq!(cfg.get_s32("chan.id").unwrap(), 2);
    assert_eq!(cfg.get_u32("init.max_width").unwrap(), 3840);
    assert_eq!(cfg.get_st("init.name").unwrap(), b"cam0");
    assert!(matches!(
        cfg.get_s32("init.max_width"),
        Err(VencError::TypeMismatch { .. })
    ));

    *cfg.stage_get("chan.id").unwrap().s32_mut().unwrap() = 3;
    assert_eq!(cfg.stage_put().unwrap(), 1);
    assert_eq!(cfg.get_s32("chan.id").unwrap(), 3);
}

#[test]
fn store_accepts_keys_of_other_stages() {
    let mut cfg = StageCfg::init(Stage::Stop).unwrap();
    cfg.set_u32("init.buf_size", 1 << 20).unwrap();
    assert_eq!(cfg.get_u32("init.buf_size").unwrap(), 1 << 20);
}

#[test]
fn validate_reports_stage_and_kind_issues() {
    let mut cfg = StageCfg::init(Stage::Stop).unwrap();
    cfg.set_s32("chan.id", 0).unwrap();
    cfg.set_s32("stop.flush", 1).unwrap();
    cfg.set_u32("init.buf_size", 4096).unwrap();
    cfg.set_u32("rc.gop", 60).unwrap();
    cfg.set_u32("vendor.private", 1).unwrap();

    let issues = cfg.validate();
    assert_eq!(issues.len(), 3);
    assert!(issues.contains(&StageIssue::WrongStage {
        name: "init.buf_size".to_owned(),
        stage: Stage::Stop,
    }));
    assert!(issues.contains(&StageIssue::WrongStage {
        name: "rc.gop".to_owned(),
        stage: Stage::Stop,
    }));
    assert!(issues.contains(&StageIssue::WrongKind {
        name: "rc.gop".to_owned(),
        found: ValueKind::U32,
        expected: ValueKind::S32,
    }));
}

#[test]
fn dump_starts_with_stage() {
    let mut cfg = StageCfg::init(Stage::Reset).unwrap();
    cfg.set_s32("rc.mode", 1).unwrap();
    let dump = cfg.dump();
    assert!(dump.starts_with("stage reset\n"));
    assert!(dump.contains("rc.mode"));
}
