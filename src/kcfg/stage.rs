use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::BufReader,
    path::Path,
    sync::LazyLock,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    debug,
    error::{VencError, VencResult},
};

/// Encoder lifecycle stage a [`crate::StageCfg`] is built for.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Channel creation.
    Init = 0,
    /// Channel teardown.
    Deinit = 1,
    /// Parameter reset on a live channel.
    Reset = 2,
    /// Start encoding.
    Start = 3,
    /// Stop encoding.
    Stop = 4,
}

impl Stage {
    /// Every stage in lifecycle order.
    pub const ALL: [Stage; 5] = [
        Stage::Init,
        Stage::Deinit,
        Stage::Reset,
        Stage::Start,
        Stage::Stop,
    ];

    /// First raw value past the last stage; never a valid stage.
    pub const BUTT: u32 = 5;

    /// Convert a raw stage id. [`Stage::BUTT`] and above are `InvalidArgument`.
    pub fn from_raw(raw: u32) -> VencResult<Self> {
        Self::ALL.get(raw as usize).copied().ok_or_else(|| {
            debug::report(VencError::invalid_argument(format!(
                "stage id {raw} out of range (must be < {})",
                Self::BUTT
            )))
        })
    }

    /// Raw stage id.
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Lowercase stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Deinit => "deinit",
            Self::Reset => "reset",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl TryFrom<u32> for Stage {
    type Error = VencError;

    fn try_from(raw: u32) -> VencResult<Self> {
        Self::from_raw(raw)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Maps symbolic profile names to lifecycle stages.
///
/// Keeps profile naming independent of the [`Stage`] enum so deployments can add their
/// own aliases (from code or a JSON file) without touching the stage set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileRegistry {
    by_name: HashMap<String, Stage>,
}

static BUILTIN: LazyLock<ProfileRegistry> = LazyLock::new(|| {
    let mut reg = ProfileRegistry::empty();
    for stage in Stage::ALL {
        reg.by_name.insert(stage.as_str().to_owned(), stage);
        reg.by_name
            .insert(format!("venc_{}_cfg", stage.as_str()), stage);
    }
    reg
});

impl ProfileRegistry {
    /// A registry with no names.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in registry: `init`..`stop` and `venc_init_cfg`..`venc_stop_cfg`.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Add or replace a profile name.
    pub fn register(&mut self, name: &str, stage: Stage) -> VencResult<()> {
        if name.is_empty() {
            return Err(debug::report(VencError::invalid_argument(
                "profile name must not be empty",
            )));
        }
        self.by_name.insert(name.to_owned(), stage);
        Ok(())
    }

    /// Copy every name of `other` into `self`, replacing duplicates.
    pub fn merge(&mut self, other: &Self) {
        for (name, stage) in &other.by_name {
            self.by_name.insert(name.clone(), *stage);
        }
    }

    /// Resolve a profile name; unknown names are `NotFound`.
    pub fn resolve(&self, name: &str) -> VencResult<Stage> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| VencError::not_found(format!("config profile '{name}'")))
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse a JSON object of profile name to stage name, e.g. `{"live": "start"}`.
    pub fn from_json_str(s: &str) -> VencResult<Self> {
        let map: BTreeMap<String, Stage> = serde_json::from_str(s)
            .map_err(|e| VencError::serde(format!("parse profile registry JSON: {e}")))?;
        Self::from_map(map)
    }

    /// Parse a profile registry JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> VencResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open profile registry '{}'", path.display()))?;
        let map: BTreeMap<String, Stage> = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| VencError::serde(format!("parse profile registry JSON: {e}")))?;
        Self::from_map(map)
    }

    fn from_map(map: BTreeMap<String, Stage>) -> VencResult<Self> {
        let mut reg = Self::empty();
        for (name, stage) in map {
            reg.register(&name, stage)?;
        }
        Ok(reg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kcfg/stage.rs"]
mod tests;
