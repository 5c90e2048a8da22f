use std::{collections::HashMap, fmt::Write as _, sync::LazyLock};

use crate::{attr::value::ValueKind, kcfg::stage::Stage};

/// A well-known encoder attribute: its key, kind and the lifecycle stages that read it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttrDef {
    /// Dotted key.
    pub name: &'static str,
    /// Kind consumers expect.
    pub kind: ValueKind,
    /// Stages in which the key is meaningful.
    pub stages: &'static [Stage],
    /// One-line description.
    pub desc: &'static str,
}

impl AttrDef {
    /// True when the key is meaningful in `stage`.
    pub fn valid_in(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

const ALL: &[Stage] = &[
    Stage::Init,
    Stage::Deinit,
    Stage::Reset,
    Stage::Start,
    Stage::Stop,
];
const INIT: &[Stage] = &[Stage::Init];
const INIT_RESET: &[Stage] = &[Stage::Init, Stage::Reset];
const RUNTIME: &[Stage] = &[Stage::Init, Stage::Reset, Stage::Start];
const STOP: &[Stage] = &[Stage::Stop];

macro_rules! def {
    ($name:literal, $kind:ident, $stages:expr, $desc:literal) => {
        AttrDef {
            name: $name,
            kind: ValueKind::$kind,
            stages: $stages,
            desc: $desc,
        }
    };
}

const DEFS: &[AttrDef] = &[
    def!("chan.id", S32, ALL, "encoder channel id"),
    def!("init.coding", S32, INIT, "coding type raw id"),
    def!("init.online", S32, INIT, "online (direct-from-capture) mode"),
    def!("init.buf_size", U32, INIT, "stream buffer size in bytes"),
    def!("init.max_strm_cnt", U32, INIT, "max queued output packets"),
    def!("init.max_width", U32, INIT, "max frame width the channel may be reset to"),
    def!("init.max_height", U32, INIT, "max frame height the channel may be reset to"),
    def!("init.name", St, INIT, "channel name bytes"),
    def!("base.low_delay", S32, INIT_RESET, "low delay output"),
    def!("base.smart_en", S32, INIT_RESET, "smart encoding"),
    def!("prep.width", S32, INIT_RESET, "input width in pixels"),
    def!("prep.height", S32, INIT_RESET, "input height in pixels"),
    def!("prep.hor_stride", S32, INIT_RESET, "input byte stride"),
    def!("prep.ver_stride", S32, INIT_RESET, "input vertical stride"),
    def!("prep.format", S32, INIT_RESET, "input pixel format raw id"),
    def!("prep.fbc", S32, INIT_RESET, "input is FBC compressed"),
    def!("prep.rotation", S32, RUNTIME, "rotation in quarter turns"),
    def!("prep.mirroring", S32, RUNTIME, "horizontal mirroring"),
    def!("rc.mode", S32, RUNTIME, "rate control mode"),
    def!("rc.bps_target", S32, RUNTIME, "target bitrate"),
    def!("rc.bps_max", S32, RUNTIME, "max bitrate"),
    def!("rc.bps_min", S32, RUNTIME, "min bitrate"),
    def!("rc.fps_in_num", S32, RUNTIME, "input frame rate numerator"),
    def!("rc.fps_in_denom", S32, RUNTIME, "input frame rate denominator"),
    def!("rc.fps_out_num", S32, RUNTIME, "output frame rate numerator"),
    def!("rc.fps_out_denom", S32, RUNTIME, "output frame rate denominator"),
    def!("rc.gop", S32, RUNTIME, "intra period in frames"),
    def!("rc.qp_init", S32, RUNTIME, "initial qp"),
    def!("rc.qp_min", S32, RUNTIME, "min qp"),
    def!("rc.qp_max", S32, RUNTIME, "max qp"),
    def!("rc.drop_mode", S32, RUNTIME, "frame drop mode"),
    def!("h264.profile", S32, INIT_RESET, "H.264 profile_idc"),
    def!("h264.level", S32, INIT_RESET, "H.264 level_idc"),
    def!("h264.cabac_en", S32, INIT_RESET, "CABAC entropy coding"),
    def!("h265.profile", S32, INIT_RESET, "H.265 general_profile_idc"),
    def!("h265.level", S32, INIT_RESET, "H.265 general_level_idc"),
    def!("jpeg.q_factor", S32, RUNTIME, "JPEG quality factor"),
    def!("jpeg.qf_max", S32, RUNTIME, "JPEG max quality factor"),
    def!("jpeg.qf_min", S32, RUNTIME, "JPEG min quality factor"),
    def!("split.mode", U32, RUNTIME, "slice split mode"),
    def!("split.arg", U32, RUNTIME, "slice split argument"),
    def!("roi.regions", St, RUNTIME, "packed ROI region table"),
    def!("osd.data", Ptr, RUNTIME, "OSD descriptor owned by the caller"),
    def!("user.data", Ptr, RUNTIME, "per-frame user data owned by the caller"),
    def!(
        "start.frame_count",
        U64,
        &[Stage::Start],
        "frames to encode before auto stop, 0 = unbounded"
    ),
    def!("stop.flush", S32, STOP, "drain pending packets before stopping"),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static AttrDef>> =
    LazyLock::new(|| DEFS.iter().map(|d| (d.name, d)).collect());

/// Look up a well-known key.
pub fn lookup(name: &str) -> Option<&'static AttrDef> {
    BY_NAME.get(name).copied()
}

/// Every well-known key, grouped by prefix.
pub fn defs() -> &'static [AttrDef] {
    DEFS
}

/// Render the well-known keys, one `name kind stages desc` line each.
pub fn schema_dump() -> String {
    let mut out = String::new();
    for d in DEFS {
        let stages: Vec<&str> = d.stages.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(
            out,
            "{:<20} {:<3} {:<28} {}",
            d.name,
            d.kind,
            stages.join(","),
            d.desc
        );
    }
    out
}

/// Log every well-known key at `info` level.
pub fn show_schema() {
    tracing::info!(keys = DEFS.len(), "encoder attribute schema");
    for line in schema_dump().lines() {
        tracing::info!("{line}");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/attr/schema.rs"]
mod tests;
