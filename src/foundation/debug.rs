use std::sync::LazyLock;

use crate::foundation::error::VencError;

/// Environment variable holding the process-wide debug word.
pub const DEBUG_ENV: &str = "HWVENC_DEBUG";

/// Process-wide debug flag word.
///
/// Read once from [`DEBUG_ENV`] (decimal or `0x`-prefixed hex). Unset or unparsable
/// values mean "no flags".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DebugFlags(u32);

impl DebugFlags {
    /// Trace attribute writes and reads.
    pub const CFG: Self = Self(0x0000_0001);
    /// Trace computed frame layouts.
    pub const GEOMETRY: Self = Self(0x0000_0002);
    /// Dump every stage config when it is created.
    pub const DUMP_CFG: Self = Self(0x0000_0800);
    /// Abort the process on contract violations.
    pub const ABORT: Self = Self(0x1000_0000);

    /// Wrap a raw flag word.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw flag word.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Parse a debug word the way [`DEBUG_ENV`] is parsed.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let bits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => s.parse::<u32>().ok()?,
        };
        Some(Self(bits))
    }
}

impl std::ops::BitOr for DebugFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

static FLAGS: LazyLock<DebugFlags> = LazyLock::new(|| {
    std::env::var(DEBUG_ENV)
        .ok()
        .and_then(|v| DebugFlags::parse(&v))
        .unwrap_or_default()
});

/// Current process-wide debug flags.
pub fn debug_flags() -> DebugFlags {
    *FLAGS
}

pub(crate) fn enabled(flag: DebugFlags) -> bool {
    debug_flags().contains(flag)
}

/// Log an error; contract violations additionally take the abort path when
/// [`DebugFlags::ABORT`] is set.
pub(crate) fn report(err: VencError) -> VencError {
    if err.is_contract_violation() {
        tracing::error!(error = %err, "attribute contract violation");
        if enabled(DebugFlags::ABORT) {
            std::process::abort();
        }
    } else if enabled(DebugFlags::CFG) {
        tracing::debug!(error = %err);
    }
    err
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/debug.rs"]
mod tests;
