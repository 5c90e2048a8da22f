//! hwvenc models the configuration and buffer-geometry side of a hardware video encoder.
//!
//! Two independent surfaces are exposed:
//!
//! - **Attributes**: a typed, string-keyed registry ([`AttrStore`]) holding encoder
//!   parameters as signed/unsigned 32/64-bit integers, opaque pointers or byte blobs. Values
//!   can be set directly or staged in place ([`AttrStore::stage_get`] then
//!   [`AttrStore::stage_put`]). A [`StageCfg`] binds a store to one encoder lifecycle
//!   [`Stage`].
//! - **Geometry**: pure stride and frame size arithmetic ([`StrideCalculator`]) for
//!   uncompressed and FBC (frame buffer compression) frames, driven by a replaceable
//!   [`GeometryTable`] of hardware constants.
//!
//! Diagnostics go through `tracing`; the `HWVENC_DEBUG` environment variable selects extra
//! logging and abort-on-misuse behavior (see [`DebugFlags`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod attr;
mod foundation;
mod geometry;
mod kcfg;

pub use attr::schema::{AttrDef, defs, lookup as schema_lookup, schema_dump, show_schema};
pub use attr::store::{AttrStore, StagedSlot};
pub use attr::value::{AttrValue, OpaquePtr, StructBlob, Value, ValueKind};
pub use foundation::debug::{DEBUG_ENV, DebugFlags, debug_flags};
pub use foundation::error::{VencError, VencResult};
pub use geometry::format::{CodingType, PixelFormat};
pub use geometry::stride::{
    ByteStrideRequest, FrameLayout, HStrideRequest, SizeRequest, StrideCalculator,
    VStrideRequest, frame_size, h_stride_by_byte, h_stride_by_pixel, v_stride,
};
pub use geometry::table::{CodingRule, FbcFormatRule, FbcRule, FormatRule, GeometryTable};
pub use kcfg::config::{StageCfg, StageIssue};
pub use kcfg::stage::{ProfileRegistry, Stage};
