//! Hardware alignment and compression constants consumed by the stride calculator.
//!
//! The numbers differ between hardware revisions, so they live in a plain data table that
//! can be replaced wholesale (built in code or deserialized from JSON) instead of being
//! baked into the arithmetic.

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{VencError, VencResult},
    geometry::format::{CodingType, PixelFormat},
};

/// Per-coding-type constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingRule {
    /// Vertical stride granularity in rows (minimum coding-unit height).
    pub v_align: u32,
}

/// FBC parameters of one pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbcFormatRule {
    /// Uncompressed bits per pixel across all planes.
    pub bits_per_pixel: u32,
    /// Worst-case body size relative to the uncompressed size, numerator.
    pub ratio_num: u32,
    /// Worst-case body size relative to the uncompressed size, denominator.
    pub ratio_den: u32,
}

/// Per-pixel-format constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRule {
    /// Bits per pixel in a row of the first plane.
    pub luma_bits: u32,
    /// Byte stride granularity.
    pub byte_align: u32,
    /// Whole-frame bytes per first-plane byte, numerator (3 for 4:2:0 with `plane_den` 2).
    pub plane_num: u32,
    /// Whole-frame bytes per first-plane byte, denominator.
    pub plane_den: u32,
    /// FBC parameters; `None` when the format cannot be compressed.
    #[serde(default)]
    pub fbc: Option<FbcFormatRule>,
}

/// Block layout of the FBC scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbcRule {
    /// Compression block width in pixels.
    pub block_width: u32,
    /// Compression block height in rows.
    pub block_height: u32,
    /// Header bytes per compression block.
    pub hdr_bytes_per_block: u32,
    /// Horizontal stride granularity in pixels.
    pub h_align: u32,
    /// Vertical stride granularity in rows, combined with the coding type's.
    pub v_align: u32,
    /// Alignment of the header region in bytes.
    pub hdr_align: u32,
    /// Alignment of the body region in bytes.
    pub bdy_align: u32,
}

/// Complete set of constants for one hardware revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryTable {
    /// Supported coding types.
    pub coding: BTreeMap<CodingType, CodingRule>,
    /// Supported pixel formats.
    pub formats: BTreeMap<PixelFormat, FormatRule>,
    /// FBC block layout.
    pub fbc: FbcRule,
}

const fn fbc(bits_per_pixel: u32, ratio_num: u32, ratio_den: u32) -> Option<FbcFormatRule> {
    Some(FbcFormatRule {
        bits_per_pixel,
        ratio_num,
        ratio_den,
    })
}

const fn rule(
    luma_bits: u32,
    byte_align: u32,
    plane_num: u32,
    plane_den: u32,
    fbc: Option<FbcFormatRule>,
) -> FormatRule {
    FormatRule {
        luma_bits,
        byte_align,
        plane_num,
        plane_den,
        fbc,
    }
}

impl GeometryTable {
    /// Constants of the reference hardware.
    pub fn builtin() -> Self {
        use CodingType as C;
        use PixelFormat as F;

        let coding = [
            (C::Mpeg2, 16),
            (C::H263, 16),
            (C::Mpeg4, 16),
            (C::Avc, 16),
            (C::Mjpeg, 8),
            (C::Vp8, 16),
            (C::Vp9, 64),
            (C::Hevc, 64),
            (C::Avs2, 64),
            (C::Av1, 64),
        ]
        .into_iter()
        .map(|(c, v_align)| (c, CodingRule { v_align }))
        .collect();

        // 10-bit payloads in 16x16 blocks round 480 bytes up to 512.
        let formats = [
            (F::Yuv420sp, rule(8, 16, 3, 2, fbc(12, 1, 1))),
            (F::Yuv420sp10bit, rule(10, 64, 3, 2, fbc(15, 16, 15))),
            (F::Yuv422sp, rule(8, 16, 2, 1, fbc(16, 1, 1))),
            (F::Yuv422sp10bit, rule(10, 64, 2, 1, fbc(20, 1, 1))),
            (F::Yuv420p, rule(8, 16, 3, 2, None)),
            (F::Yuv420spVu, rule(8, 16, 3, 2, None)),
            (F::Yuv422p, rule(8, 16, 2, 1, None)),
            (F::Yuv422spVu, rule(8, 16, 2, 1, None)),
            (F::Yuyv, rule(16, 32, 1, 1, None)),
            (F::Yvyu, rule(16, 32, 1, 1, None)),
            (F::Uyvy, rule(16, 32, 1, 1, None)),
            (F::Vyuy, rule(16, 32, 1, 1, None)),
            (F::Yuv400, rule(8, 16, 1, 1, fbc(8, 1, 1))),
            (F::Yuv440sp, rule(8, 16, 2, 1, None)),
            (F::Yuv411sp, rule(8, 16, 3, 2, None)),
            (F::Yuv444sp, rule(8, 16, 3, 1, fbc(24, 1, 1))),
            (F::Yuv444p, rule(8, 16, 3, 1, None)),
            (F::Rgb565, rule(16, 16, 1, 1, fbc(16, 1, 1))),
            (F::Bgr565, rule(16, 16, 1, 1, fbc(16, 1, 1))),
            (F::Rgb555, rule(16, 16, 1, 1, None)),
            (F::Bgr555, rule(16, 16, 1, 1, None)),
            (F::Rgb444, rule(16, 16, 1, 1, None)),
            (F::Bgr444, rule(16, 16, 1, 1, None)),
            (F::Rgb888, rule(24, 16, 1, 1, fbc(24, 1, 1))),
            (F::Bgr888, rule(24, 16, 1, 1, fbc(24, 1, 1))),
            (F::Rgb101010, rule(32, 16, 1, 1, fbc(32, 1, 1))),
            (F::Bgr101010, rule(32, 16, 1, 1, fbc(32, 1, 1))),
            (F::Argb8888, rule(32, 16, 1, 1, fbc(32, 1, 1))),
            (F::Abgr8888, rule(32, 16, 1, 1, fbc(32, 1, 1))),
            (F::Bgra8888, rule(32, 16, 1, 1, fbc(32, 1, 1))),
            (F::Rgba8888, rule(32, 16, 1, 1, fbc(32, 1, 1))),
        ]
        .into_iter()
        .collect();

        Self {
            coding,
            formats,
            fbc: FbcRule {
                block_width: 16,
                block_height: 16,
                hdr_bytes_per_block: 16,
                h_align: 64,
                v_align: 16,
                hdr_align: 4096,
                bdy_align: 4096,
            },
        }
    }

    /// Rule for `coding`, or `UnsupportedFormat`.
    pub fn coding_rule(&self, coding: CodingType) -> VencResult<&CodingRule> {
        self.coding
            .get(&coding)
            .ok_or_else(|| VencError::unsupported(format!("coding type {coding} not in table")))
    }

    /// Rule for `format`, or `UnsupportedFormat`.
    pub fn format_rule(&self, format: PixelFormat) -> VencResult<&FormatRule> {
        self.formats
            .get(&format)
            .ok_or_else(|| VencError::unsupported(format!("pixel format {format} not in table")))
    }

    /// FBC rule for `format`, or `UnsupportedFormat` when it cannot be compressed.
    pub fn fbc_format_rule(&self, format: PixelFormat) -> VencResult<&FbcFormatRule> {
        self.format_rule(format)?.fbc.as_ref().ok_or_else(|| {
            VencError::unsupported(format!("pixel format {format} has no FBC layout"))
        })
    }

    /// Reject zero divisors and alignments.
    pub fn validate(&self) -> VencResult<()> {
        let nonzero = |what: String, v: u32| -> VencResult<()> {
            if v == 0 {
                return Err(VencError::invalid_argument(format!("{what} must be > 0")));
            }
            Ok(())
        };

        for (c, r) in &self.coding {
            nonzero(format!("{c}.v_align"), r.v_align)?;
        }
        for (f, r) in &self.formats {
            nonzero(format!("{f}.luma_bits"), r.luma_bits)?;
            nonzero(format!("{f}.byte_align"), r.byte_align)?;
            nonzero(format!("{f}.plane_num"), r.plane_num)?;
            nonzero(format!("{f}.plane_den"), r.plane_den)?;
            if let Some(fr) = &r.fbc {
                nonzero(format!("{f}.fbc.bits_per_pixel"), fr.bits_per_pixel)?;
                nonzero(format!("{f}.fbc.ratio_num"), fr.ratio_num)?;
                nonzero(format!("{f}.fbc.ratio_den"), fr.ratio_den)?;
            }
        }
        let b = &self.fbc;
        nonzero("fbc.block_width".into(), b.block_width)?;
        nonzero("fbc.block_height".into(), b.block_height)?;
        nonzero("fbc.hdr_bytes_per_block".into(), b.hdr_bytes_per_block)?;
        nonzero("fbc.h_align".into(), b.h_align)?;
        nonzero("fbc.v_align".into(), b.v_align)?;
        nonzero("fbc.hdr_align".into(), b.hdr_align)?;
        nonzero("fbc.bdy_align".into(), b.bdy_align)?;
        Ok(())
    }

    /// Parse and validate a table from JSON.
    pub fn from_json_str(s: &str) -> VencResult<Self> {
        let table: Self = serde_json::from_str(s)
            .map_err(|e| VencError::serde(format!("parse geometry table JSON: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    /// Parse and validate a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> VencResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open geometry table '{}'", path.display()))?;
        let table: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| VencError::serde(format!("parse geometry table JSON: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    /// Serialize the table as pretty JSON.
    pub fn to_json_string(&self) -> VencResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VencError::serde(format!("write geometry table JSON: {e}")))
    }
}

impl Default for GeometryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/table.rs"]
mod tests;
