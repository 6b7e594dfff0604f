//! Civic support - bells, the support percentage and the production bonus
//!
//! Two behaviors are kept on purpose although they look irregular:
//! bells only accrue while `members <= headcount + 1`, and a computer-run
//! owner never suffers a negative production bonus.

use serde::{Deserialize, Serialize};

use crate::core::config::EngineConfig;

/// Headcount as the civic model sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Headcount {
    Known(u32),
    /// Settlement is not locally owned; civic computation is skipped
    Hidden,
}

/// Civic change worth a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CivicChange {
    SupportReached50,
    SupportReached100,
    SupportFellBelow50,
    SupportFellBelow100,
    GovernmentBad,
    GovernmentVeryBad,
    GovernmentRecovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SupportBand {
    Minority,
    Majority,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GovernmentBand {
    Fine,
    Bad,
    VeryBad,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivicState {
    bells: u32,
    support: u32,
    previous_support: u32,
    opposition: u32,
    previous_opposition: u32,
    members: u32,
    production_bonus: i32,
}

impl CivicState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bells(&self) -> u32 {
        self.bells
    }

    pub fn support(&self) -> u32 {
        self.support
    }

    pub fn previous_support(&self) -> u32 {
        self.previous_support
    }

    pub fn opposition(&self) -> u32 {
        self.opposition
    }

    pub fn previous_opposition(&self) -> u32 {
        self.previous_opposition
    }

    pub fn members(&self) -> u32 {
        self.members
    }

    pub fn production_bonus(&self) -> i32 {
        self.production_bonus
    }

    /// Credit bells; ignored once members exceed `headcount + 1`
    pub fn add_bells(&mut self, amount: u32, headcount: u32) {
        if self.members <= headcount + 1 {
            self.bells = self.bells.saturating_add(amount);
        }
    }

    /// Per-turn upkeep of `max(0, headcount - 2)` bells
    pub fn apply_upkeep(&mut self, headcount: u32) {
        self.bells = self.bells.saturating_sub(headcount.saturating_sub(2));
    }

    /// Recompute support, opposition and bonus; report band crossings
    pub fn recompute(
        &mut self,
        headcount: u32,
        config: &EngineConfig,
        difficulty: i32,
        human: bool,
    ) -> Vec<CivicChange> {
        self.previous_support = self.support;
        self.previous_opposition = self.opposition;

        self.support = support_percent(self.bells, headcount, config.bells_per_member);
        self.members = members(self.bells, headcount, config.bells_per_member);
        self.opposition = headcount - self.members;
        self.production_bonus =
            production_bonus(self.support, self.opposition, difficulty, human, config);

        let mut changes = Vec::new();

        let before = support_band(self.previous_support, config);
        let after = support_band(self.support, config);
        if after > before {
            changes.push(match after {
                SupportBand::Full => CivicChange::SupportReached100,
                _ => CivicChange::SupportReached50,
            });
        } else if after < before {
            changes.push(match after {
                SupportBand::Minority => CivicChange::SupportFellBelow50,
                _ => CivicChange::SupportFellBelow100,
            });
        }

        let before = government_band(self.previous_opposition, difficulty, config);
        let after = government_band(self.opposition, difficulty, config);
        if after != before {
            changes.push(match after {
                GovernmentBand::VeryBad => CivicChange::GovernmentVeryBad,
                GovernmentBand::Bad => CivicChange::GovernmentBad,
                GovernmentBand::Fine => CivicChange::GovernmentRecovered,
            });
        }

        changes
    }
}

/// `clamp(0, 100, bells * 100 / (bells_per_member * headcount))`
pub fn support_percent(bells: u32, headcount: u32, bells_per_member: u32) -> u32 {
    if headcount == 0 || bells_per_member == 0 {
        return 0;
    }
    let percent = u64::from(bells) * 100 / (u64::from(bells_per_member) * u64::from(headcount));
    percent.min(100) as u32
}

/// Whole members backed by bells, never more than the headcount
pub fn members(bells: u32, headcount: u32, bells_per_member: u32) -> u32 {
    if bells_per_member == 0 {
        return 0;
    }
    (bells / bells_per_member).min(headcount)
}

/// Support raises the bonus; opposition beyond the government thresholds
/// overrides it with a penalty
pub fn production_bonus(
    support: u32,
    opposition: u32,
    difficulty: i32,
    human: bool,
    config: &EngineConfig,
) -> i32 {
    let mut bonus = 0;
    if support >= config.support_full {
        bonus = 2;
    } else if support >= config.support_majority {
        bonus = 1;
    }

    match government_band(opposition, difficulty, config) {
        GovernmentBand::VeryBad => bonus = -2,
        GovernmentBand::Bad => bonus = -1,
        GovernmentBand::Fine => {}
    }

    if human {
        bonus
    } else {
        bonus.max(0)
    }
}

fn support_band(support: u32, config: &EngineConfig) -> SupportBand {
    if support >= config.support_full {
        SupportBand::Full
    } else if support >= config.support_majority {
        SupportBand::Majority
    } else {
        SupportBand::Minority
    }
}

fn government_band(opposition: u32, difficulty: i32, config: &EngineConfig) -> GovernmentBand {
    let opposition = opposition as i32;
    if opposition > config.very_bad_government_base - difficulty {
        GovernmentBand::VeryBad
    } else if opposition > config.bad_government_base - difficulty {
        GovernmentBand::Bad
    } else {
        GovernmentBand::Fine
    }
}
