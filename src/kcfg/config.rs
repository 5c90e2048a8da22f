use std::ops::{Deref, DerefMut};

use crate::{
    attr::{schema, store::AttrStore, value::ValueKind},
    foundation::debug::{self, DebugFlags},
    foundation::error::VencResult,
    kcfg::stage::{ProfileRegistry, Stage},
};

/// Attribute store tagged with the encoder lifecycle stage it is meant for.
///
/// The stage is fixed at creation. The store does not check keys against the stage;
/// [`StageCfg::validate`] reports mismatches for consumers that want to enforce them.
/// Typed accessors come from [`AttrStore`] through `Deref`.
#[derive(Clone, Debug)]
pub struct StageCfg {
    stage: Stage,
    attrs: AttrStore,
}

/// A key whose use disagrees with the well-known schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageIssue {
    /// The key is known but not read in this stage.
    WrongStage {
        /// Attribute key.
        name: String,
        /// Stage of the config.
        stage: Stage,
    },
    /// The key is known with another kind.
    WrongKind {
        /// Attribute key.
        name: String,
        /// Kind held by the config.
        found: ValueKind,
        /// Kind the schema declares.
        expected: ValueKind,
    },
}

impl std::fmt::Display for StageIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongStage { name, stage } => write!(f, "'{name}' is not read at {stage}"),
            Self::WrongKind {
                name,
                found,
                expected,
            } => write!(f, "'{name}' is {found}, schema declares {expected}"),
        }
    }
}

impl StageCfg {
    /// Create an empty config for `stage`.
    pub fn init(stage: Stage) -> VencResult<Self> {
        let cfg = Self {
            stage,
            attrs: AttrStore::init()?,
        };
        if debug::enabled(DebugFlags::DUMP_CFG) {
            cfg.show();
        }
        Ok(cfg)
    }

    /// Create an empty config from a raw stage id; `Stage::BUTT` and above are rejected.
    pub fn init_raw(raw: u32) -> VencResult<Self> {
        Self::init(Stage::from_raw(raw)?)
    }

    /// Create an empty config for the stage a built-in profile name resolves to.
    pub fn init_by_name(name: &str) -> VencResult<Self> {
        Self::init_by_name_in(ProfileRegistry::builtin(), name)
    }

    /// Create an empty config for the stage `name` resolves to in `registry`.
    pub fn init_by_name_in(registry: &ProfileRegistry, name: &str) -> VencResult<Self> {
        let stage = registry.resolve(name)?;
        tracing::debug!(profile = name, %stage, "resolved config profile");
        Self::init(stage)
    }

    /// Wrap an already populated store.
    pub fn from_store(stage: Stage, attrs: AttrStore) -> Self {
        Self { stage, attrs }
    }

    /// Release the config.
    pub fn deinit(self) {
        self.attrs.deinit();
    }

    /// Lifecycle stage this config is for.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Underlying attribute store.
    pub fn attrs(&self) -> &AttrStore {
        &self.attrs
    }

    /// Give up the stage tag and keep the attributes.
    pub fn into_store(self) -> AttrStore {
        self.attrs
    }

    /// Check committed keys against the well-known schema.
    ///
    /// Keys the schema does not know are ignored.
    pub fn validate(&self) -> Vec<StageIssue> {
        let mut issues = Vec::new();
        for (name, value) in self.attrs.entries() {
            let Some(def) = schema::lookup(name) else {
                continue;
            };
            if !def.valid_in(self.stage) {
                issues.push(StageIssue::WrongStage {
                    name: name.to_owned(),
                    stage: self.stage,
                });
            }
            if value.kind() != def.kind {
                issues.push(StageIssue::WrongKind {
                    name: name.to_owned(),
                    found: value.kind(),
                    expected: def.kind,
                });
            }
        }
        issues
    }

    /// Log the stage and every committed entry at `info` level.
    pub fn show(&self) {
        tracing::info!(stage = %self.stage, "stage config");
        self.attrs.show();
    }

    /// Render the stage header followed by every committed entry.
    pub fn dump(&self) -> String {
        format!("stage {}\n{}", self.stage, self.attrs.dump())
    }
}

impl Deref for StageCfg {
    type Target = AttrStore;

    fn deref(&self) -> &AttrStore {
        &self.attrs
    }
}

impl DerefMut for StageCfg {
    fn deref_mut(&mut self) -> &mut AttrStore {
        &mut self.attrs
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kcfg/config.rs"]
mod tests;
