use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which teams a view should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TeamSelection {
    All,
    #[default]
    Defaults,
    Teams(Vec<String>),
}

impl TeamSelection {
    /// Builds a selection from command-line style inputs: `all` wins, then any
    /// named teams, otherwise the sport's defaults.
    pub fn from_args(all: bool, teams: Vec<String>) -> Self {
        if all {
            TeamSelection::All
        } else if teams.is_empty() {
            TeamSelection::Defaults
        } else {
            TeamSelection::Teams(teams)
        }
    }

    /// Resolves to the canonical names present in `available`, in selection
    /// order. Names are matched case-insensitively; unknown names are dropped.
    /// An empty result means nothing valid was selected.
    pub fn resolve(&self, available: &BTreeSet<String>, defaults: &[String]) -> Vec<String> {
        let requested: &[String] = match self {
            TeamSelection::All => return available.iter().cloned().collect(),
            TeamSelection::Defaults => defaults,
            TeamSelection::Teams(teams) => teams,
        };

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for name in requested {
            let wanted = name.trim();
            match available.iter().find(|team| team.eq_ignore_ascii_case(wanted)) {
                Some(team) => {
                    if seen.insert(team.clone()) {
                        resolved.push(team.clone());
                    }
                }
                None => debug!(team = %wanted, "Ignoring unknown team"),
            }
        }
        resolved
    }
}
