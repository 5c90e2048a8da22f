use serde::{Deserialize, Serialize};

use crate::foundation::error::{VencError, VencResult};

/// Declares a closed enum with the raw hardware-library id and the text name of every
/// variant, plus the conversions both ways.
macro_rules! raw_id_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($what:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $raw:expr, $text:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Convert a raw id; unknown ids are `UnsupportedFormat`.
            pub fn from_raw(raw: u32) -> VencResult<Self> {
                $(
                    if raw == $raw {
                        return Ok(Self::$variant);
                    }
                )+
                Err(VencError::unsupported(format!(concat!($what, " id {:#x}"), raw)))
            }

            /// Raw id.
            pub fn raw(self) -> u32 {
                match self {
                    $( Self::$variant => $raw, )+
                }
            }

            /// Lowercase name, as used in tables and on the command line.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = VencError;

            fn try_from(raw: u32) -> VencResult<Self> {
                Self::from_raw(raw)
            }
        }

        impl std::str::FromStr for $name {
            type Err = VencError;

            fn from_str(s: &str) -> VencResult<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| VencError::unsupported(format!(concat!($what, " '{}'"), s)))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

raw_id_enum! {
    /// Video compression standard a buffer or config is intended for.
    pub enum CodingType ("coding type") {
        /// MPEG-2 video.
        Mpeg2 = 2, "mpeg2";
        /// H.263.
        H263 = 3, "h263";
        /// MPEG-4 part 2.
        Mpeg4 = 4, "mpeg4";
        /// H.264 / AVC.
        Avc = 7, "avc";
        /// Motion JPEG.
        Mjpeg = 8, "mjpeg";
        /// VP8.
        Vp8 = 9, "vp8";
        /// VP9.
        Vp9 = 10, "vp9";
        /// H.265 / HEVC.
        Hevc = 0x0100_0004, "hevc";
        /// AVS2.
        Avs2 = 0x0100_0007, "avs2";
        /// AV1.
        Av1 = 0x0100_0008, "av1";
    }
}

const RGB_BASE: u32 = 0x0001_0000;

raw_id_enum! {
    /// Memory layout of sample data.
    pub enum PixelFormat ("pixel format") {
        /// 4:2:0 semi-planar, Y then interleaved UV (NV12).
        Yuv420sp = 0, "yuv420sp";
        /// 4:2:0 semi-planar, 10-bit samples packed without padding.
        Yuv420sp10bit = 1, "yuv420sp10bit";
        /// 4:2:2 semi-planar (NV16).
        Yuv422sp = 2, "yuv422sp";
        /// 4:2:2 semi-planar, packed 10-bit.
        Yuv422sp10bit = 3, "yuv422sp10bit";
        /// 4:2:0 planar (I420).
        Yuv420p = 4, "yuv420p";
        /// 4:2:0 semi-planar, interleaved VU (NV21).
        Yuv420spVu = 5, "yuv420sp_vu";
        /// 4:2:2 planar.
        Yuv422p = 6, "yuv422p";
        /// 4:2:2 semi-planar, interleaved VU (NV61).
        Yuv422spVu = 7, "yuv422sp_vu";
        /// 4:2:2 packed Y0 U Y1 V.
        Yuyv = 8, "yuyv";
        /// 4:2:2 packed Y0 V Y1 U.
        Yvyu = 9, "yvyu";
        /// 4:2:2 packed U Y0 V Y1.
        Uyvy = 10, "uyvy";
        /// 4:2:2 packed V Y0 U Y1.
        Vyuy = 11, "vyuy";
        /// Luma only.
        Yuv400 = 12, "yuv400";
        /// 4:4:0 semi-planar.
        Yuv440sp = 13, "yuv440sp";
        /// 4:1:1 semi-planar.
        Yuv411sp = 14, "yuv411sp";
        /// 4:4:4 semi-planar (NV24).
        Yuv444sp = 15, "yuv444sp";
        /// 4:4:4 planar.
        Yuv444p = 16, "yuv444p";
        /// 16-bit RGB 5:6:5.
        Rgb565 = RGB_BASE, "rgb565";
        /// 16-bit BGR 5:6:5.
        Bgr565 = RGB_BASE + 1, "bgr565";
        /// 16-bit RGB 5:5:5.
        Rgb555 = RGB_BASE + 2, "rgb555";
        /// 16-bit BGR 5:5:5.
        Bgr555 = RGB_BASE + 3, "bgr555";
        /// 16-bit RGB 4:4:4.
        Rgb444 = RGB_BASE + 4, "rgb444";
        /// 16-bit BGR 4:4:4.
        Bgr444 = RGB_BASE + 5, "bgr444";
        /// 24-bit RGB.
        Rgb888 = RGB_BASE + 6, "rgb888";
        /// 24-bit BGR.
        Bgr888 = RGB_BASE + 7, "bgr888";
        /// 32-bit RGB 10:10:10.
        Rgb101010 = RGB_BASE + 8, "rgb101010";
        /// 32-bit BGR 10:10:10.
        Bgr101010 = RGB_BASE + 9, "bgr101010";
        /// 32-bit ARGB.
        Argb8888 = RGB_BASE + 10, "argb8888";
        /// 32-bit ABGR.
        Abgr8888 = RGB_BASE + 11, "abgr8888";
        /// 32-bit BGRA.
        Bgra8888 = RGB_BASE + 12, "bgra8888";
        /// 32-bit RGBA.
        Rgba8888 = RGB_BASE + 13, "rgba8888";
    }
}

impl PixelFormat {
    /// True for packed RGB formats.
    pub fn is_rgb(self) -> bool {
        self.raw() >= RGB_BASE
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/format.rs"]
mod tests;
