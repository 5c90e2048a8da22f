use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{
    foundation::debug::{self, DebugFlags},
    foundation::error::{VencError, VencResult},
    foundation::math::{align_up, is_aligned, lcm, mul_ratio_ceil},
    geometry::format::{CodingType, PixelFormat},
    geometry::table::{CodingRule, FormatRule, GeometryTable},
};

/// Input of [`h_stride_by_pixel`]: convert a known byte stride into pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HStrideRequest {
    /// Coding type.
    pub coding: CodingType,
    /// Pixel format; needed to convert bytes to pixels for uncompressed frames.
    pub format: PixelFormat,
    /// FBC compressed layout.
    pub fbc: bool,
    /// Visible width in pixels.
    pub width: u32,
    /// Byte stride already fixed by the caller.
    pub byte_stride: u32,
}

/// Input of [`h_stride_by_byte`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteStrideRequest {
    /// Coding type.
    pub coding: CodingType,
    /// Pixel format.
    pub format: PixelFormat,
    /// FBC compressed layout.
    pub fbc: bool,
    /// Visible width in pixels.
    pub width: u32,
    /// Stride the caller would like to keep; preserved when it is valid for the format.
    #[serde(default)]
    pub byte_stride: Option<u32>,
}

/// Input of [`v_stride`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VStrideRequest {
    /// Coding type.
    pub coding: CodingType,
    /// FBC compressed layout.
    pub fbc: bool,
    /// Visible height in rows.
    pub height: u32,
    /// Vertical stride the caller would like to keep; preserved when valid.
    #[serde(default)]
    pub v_stride: Option<u32>,
}

/// Input of [`frame_size`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRequest {
    /// Coding type.
    pub coding: CodingType,
    /// Pixel format.
    pub format: PixelFormat,
    /// FBC compressed layout.
    pub fbc: bool,
    /// Visible width in pixels.
    pub width: u32,
    /// Visible height in rows.
    pub height: u32,
    /// Byte stride hint, see [`ByteStrideRequest::byte_stride`].
    #[serde(default)]
    pub byte_stride: Option<u32>,
    /// Vertical stride hint, see [`VStrideRequest::v_stride`].
    #[serde(default)]
    pub v_stride: Option<u32>,
}

impl SizeRequest {
    /// Request without stride hints.
    pub fn new(
        coding: CodingType,
        format: PixelFormat,
        fbc: bool,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            coding,
            format,
            fbc,
            width,
            height,
            byte_stride: None,
            v_stride: None,
        }
    }
}

/// Memory layout of one frame buffer.
///
/// For uncompressed frames the FBC fields are zero. For FBC frames the buffer holds the
/// header region at offset 0 and the body region at `fbc_bdy_offset`, each padded to its
/// hardware alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameLayout {
    /// Horizontal stride in pixels.
    pub h_stride_by_pixel: u32,
    /// Horizontal stride in bytes.
    pub h_stride_by_byte: u32,
    /// Vertical stride in rows.
    pub v_stride: u32,
    /// Bytes to allocate.
    pub size_total: u32,
    /// FBC header bytes before alignment.
    pub size_fbc_hdr: u32,
    /// FBC body bytes before alignment.
    pub size_fbc_bdy: u32,
    /// Byte offset of the FBC body (the aligned header size).
    pub fbc_bdy_offset: u32,
}

impl FrameLayout {
    /// True for an FBC layout.
    pub fn is_compressed(&self) -> bool {
        self.size_fbc_hdr != 0
    }
}

/// Stride and size arithmetic over an injected [`GeometryTable`].
///
/// Every method is pure; one calculator can be shared by any number of threads.
#[derive(Clone, Debug, Default)]
pub struct StrideCalculator {
    table: GeometryTable,
}

static BUILTIN: LazyLock<StrideCalculator> = LazyLock::new(StrideCalculator::default);

impl StrideCalculator {
    /// Calculator over `table`, rejecting tables with zero alignments or divisors.
    pub fn new(table: GeometryTable) -> VencResult<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    /// Calculator over [`GeometryTable::builtin`].
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Table in use.
    pub fn table(&self) -> &GeometryTable {
        &self.table
    }

    /// Horizontal stride in pixels for a known byte stride.
    ///
    /// Uncompressed: `byte_stride * 8 / luma_bits`. FBC strides are already counted in
    /// pixel columns, so they pass through.
    pub fn h_stride_by_pixel(&self, req: &HStrideRequest) -> VencResult<u32> {
        let (_, fmt) = self.rules(req.coding, req.format, req.fbc)?;
        if req.width == 0 {
            return Ok(0);
        }
        if req.fbc {
            return Ok(req.byte_stride);
        }
        narrow(
            u64::from(req.byte_stride) * 8 / u64::from(fmt.luma_bits),
            "h_stride_by_pixel",
        )
    }

    /// Horizontal stride in bytes.
    ///
    /// A supplied stride that is nonzero, covers the row and sits on the format's
    /// granularity is kept; otherwise the minimal aligned stride is returned. FBC strides
    /// are block-aligned pixel counts and ignore the format's byte width.
    pub fn h_stride_by_byte(&self, req: &ByteStrideRequest) -> VencResult<u32> {
        let (_, fmt) = self.rules(req.coding, req.format, req.fbc)?;
        if req.width == 0 {
            return Ok(0);
        }
        let width = u64::from(req.width);
        let (min_row, align) = if req.fbc {
            (width, u64::from(self.table.fbc.h_align))
        } else {
            let row = mul_ratio_ceil(width, u64::from(fmt.luma_bits), 8)
                .ok_or_else(|| overflow("row bytes"))?;
            (row, u64::from(fmt.byte_align))
        };
        narrow(keep_or_align(req.byte_stride, min_row, align), "h_stride_by_byte")
    }

    /// Vertical stride: height padded to the coding type's row granularity, combined
    /// with the FBC block height for compressed frames. A valid supplied stride is kept.
    pub fn v_stride(&self, req: &VStrideRequest) -> VencResult<u32> {
        let coding = self.table.coding_rule(req.coding)?;
        if req.height == 0 {
            return Ok(0);
        }
        let align = self.v_align(coding, req.fbc);
        narrow(
            keep_or_align(req.v_stride, u64::from(req.height), align),
            "v_stride",
        )
    }

    /// Complete frame layout: strides, total size and FBC region sizes.
    ///
    /// Zero width or height yields an all-zero layout once the coding type and pixel
    /// format are known to be supported.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn frame_size(&self, req: &SizeRequest) -> VencResult<FrameLayout> {
        let (_, fmt) = self.rules(req.coding, req.format, req.fbc)?;
        if req.width == 0 || req.height == 0 {
            return Ok(FrameLayout::default());
        }

        let h_stride_by_byte = self.h_stride_by_byte(&ByteStrideRequest {
            coding: req.coding,
            format: req.format,
            fbc: req.fbc,
            width: req.width,
            byte_stride: req.byte_stride,
        })?;
        let v_stride = self.v_stride(&VStrideRequest {
            coding: req.coding,
            fbc: req.fbc,
            height: req.height,
            v_stride: req.v_stride,
        })?;
        let h_stride_by_pixel = self.h_stride_by_pixel(&HStrideRequest {
            coding: req.coding,
            format: req.format,
            fbc: req.fbc,
            width: req.width,
            byte_stride: h_stride_by_byte,
        })?;

        let rows = u64::from(v_stride);
        let layout = if req.fbc {
            let fbc_fmt = self.table.fbc_format_rule(req.format)?;
            let blk = &self.table.fbc;
            let cols = u64::from(h_stride_by_pixel);

            let blocks = cols.div_ceil(u64::from(blk.block_width))
                * rows.div_ceil(u64::from(blk.block_height));
            let hdr = blocks
                .checked_mul(u64::from(blk.hdr_bytes_per_block))
                .ok_or_else(|| overflow("fbc header"))?;
            let bdy = cols
                .checked_mul(rows)
                .and_then(|px| px.checked_mul(u64::from(fbc_fmt.bits_per_pixel)))
                .and_then(|bits| {
                    mul_ratio_ceil(
                        bits,
                        u64::from(fbc_fmt.ratio_num),
                        u64::from(fbc_fmt.ratio_den) * 8,
                    )
                })
                .ok_or_else(|| overflow("fbc body"))?;
            let hdr_aligned = align_up(hdr, u64::from(blk.hdr_align));
            let bdy_aligned = align_up(bdy, u64::from(blk.bdy_align));

            FrameLayout {
                h_stride_by_pixel,
                h_stride_by_byte,
                v_stride,
                size_total: narrow(hdr_aligned.saturating_add(bdy_aligned), "size_total")?,
                size_fbc_hdr: narrow(hdr, "size_fbc_hdr")?,
                size_fbc_bdy: narrow(bdy, "size_fbc_bdy")?,
                fbc_bdy_offset: narrow(hdr_aligned, "fbc_bdy_offset")?,
            }
        } else {
            let total = u64::from(h_stride_by_byte)
                .checked_mul(rows)
                .and_then(|plane| {
                    mul_ratio_ceil(plane, u64::from(fmt.plane_num), u64::from(fmt.plane_den))
                })
                .ok_or_else(|| overflow("size_total"))?;
            FrameLayout {
                h_stride_by_pixel,
                h_stride_by_byte,
                v_stride,
                size_total: narrow(total, "size_total")?,
                ..FrameLayout::default()
            }
        };

        if debug::enabled(DebugFlags::GEOMETRY) {
            tracing::debug!(?layout, "frame layout");
        }
        Ok(layout)
    }

    /// Lay out several frames; each request succeeds or fails on its own.
    pub fn plan_batch(&self, reqs: &[SizeRequest]) -> Vec<VencResult<FrameLayout>> {
        reqs.iter().map(|r| self.frame_size(r)).collect()
    }

    fn rules(
        &self,
        coding: CodingType,
        format: PixelFormat,
        fbc: bool,
    ) -> VencResult<(&CodingRule, &FormatRule)> {
        let c = self.table.coding_rule(coding)?;
        let f = self.table.format_rule(format)?;
        if fbc {
            self.table.fbc_format_rule(format)?;
        }
        Ok((c, f))
    }

    fn v_align(&self, coding: &CodingRule, fbc: bool) -> u64 {
        let v = u64::from(coding.v_align);
        if fbc {
            lcm(v, u64::from(self.table.fbc.v_align))
        } else {
            v
        }
    }
}

/// Keep `hint` when it is nonzero, at least `min` and on `align`; else `align_up(min)`.
fn keep_or_align(hint: Option<u32>, min: u64, align: u64) -> u64 {
    match hint.map(u64::from) {
        Some(s) if s != 0 && s >= min && is_aligned(s, align) => s,
        _ => align_up(min, align),
    }
}

fn narrow(v: u64, what: &str) -> VencResult<u32> {
    u32::try_from(v).map_err(|_| VencError::invalid_argument(format!("{what} {v} exceeds u32")))
}

fn overflow(what: &str) -> VencError {
    VencError::invalid_argument(format!("{what} overflows u64"))
}

/// [`StrideCalculator::h_stride_by_pixel`] over the built-in table.
pub fn h_stride_by_pixel(req: &HStrideRequest) -> VencResult<u32> {
    StrideCalculator::builtin().h_stride_by_pixel(req)
}

/// [`StrideCalculator::h_stride_by_byte`] over the built-in table.
pub fn h_stride_by_byte(req: &ByteStrideRequest) -> VencResult<u32> {
    StrideCalculator::builtin().h_stride_by_byte(req)
}

/// [`StrideCalculator::v_stride`] over the built-in table.
pub fn v_stride(req: &VStrideRequest) -> VencResult<u32> {
    StrideCalculator::builtin().v_stride(req)
}

/// [`StrideCalculator::frame_size`] over the built-in table.
pub fn frame_size(req: &SizeRequest) -> VencResult<FrameLayout> {
    StrideCalculator::builtin().frame_size(req)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/stride.rs"]
mod tests;
