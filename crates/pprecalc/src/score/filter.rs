use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{Error, Result};
use crate::game::{GameMode, RankedStatus, Ruleset};

/// How the ranked-status and map-id refinements are interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, IntoStaticStr, Display,
)]
pub enum SelectionVariant {
    /// Ranked status optional, specific map allowed
    #[default]
    #[strum(serialize = "map")]
    Map,
    /// Ranked status mandatory, specific map not allowed
    #[strum(serialize = "status")]
    Status,
}

/// Immutable selection parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionFilter {
    mode: GameMode,
    ruleset: Ruleset,
    ranked: Option<RankedStatus>,
    map_id: Option<u32>,
    limit: Option<u32>,
}

impl SelectionFilter {
    /// Create a new filter builder
    pub fn builder() -> SelectionFilterBuilder {
        SelectionFilterBuilder::default()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    pub fn ranked(&self) -> Option<RankedStatus> {
        self.ranked
    }

    /// Statuses the query accepts: the requested one, or every eligible one.
    pub fn statuses(&self) -> Vec<RankedStatus> {
        match self.ranked {
            Some(status) => vec![status],
            None => RankedStatus::ELIGIBLE.to_vec(),
        }
    }

    pub fn map_id(&self) -> Option<u32> {
        self.map_id
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn table(&self) -> &'static str {
        self.ruleset.score_table()
    }
}

/// Builder for SelectionFilter
#[derive(Debug, Clone, Default)]
pub struct SelectionFilterBuilder {
    mode: GameMode,
    ruleset: Ruleset,
    ranked: Option<RankedStatus>,
    map_id: Option<u32>,
    limit: Option<u32>,
    variant: SelectionVariant,
}

impl SelectionFilterBuilder {
    pub fn mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    pub fn ranked(mut self, ranked: Option<RankedStatus>) -> Self {
        self.ranked = ranked;
        self
    }

    /// Restrict to one map. `0` means no restriction.
    pub fn map_id(mut self, map_id: Option<u32>) -> Self {
        self.map_id = map_id.filter(|&id| id != 0);
        self
    }

    /// Cap the number of rows. `0` means no limit.
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit.filter(|&n| n != 0);
        self
    }

    pub fn variant(mut self, variant: SelectionVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Validate against the variant and build the filter
    pub fn build(self) -> Result<SelectionFilter> {
        if self.variant == SelectionVariant::Status {
            if self.ranked.is_none() {
                return Err(Error::InvalidFilter(
                    "a ranked status is required for the status variant".into(),
                ));
            }
            if self.map_id.is_some() {
                return Err(Error::InvalidFilter(
                    "the status variant does not accept a map id".into(),
                ));
            }
        }

        Ok(SelectionFilter {
            mode: self.mode,
            ruleset: self.ruleset,
            ranked: self.ranked,
            map_id: self.map_id,
            limit: self.limit,
        })
    }
}
