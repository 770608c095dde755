use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// The simulated result of submitting a batch against a routing plan.
/// Plans that are not in the table resolve to "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingPlanOutcome {
    Success,
    /// Success, but every message must carry a lone `body` personalisation field.
    SuccessWithPersonalisationRules,
    InvalidConfig,
    RateLimited,
    MissingTemplates,
    DuplicateTemplates,
    MissingNhsTemplate,
    SimulatedServerError,
}

pub const GLOBAL_NHS_APP_ROUTING_PLAN_ID: &str = "00000000-0000-0000-0000-000000000001";

const BUILT_IN_PLANS: [(&str, RoutingPlanOutcome); 9] = [
    ("b838b13c-f98c-4def-93f0-515d4e4f4ee1", RoutingPlanOutcome::Success),
    ("49e43b98-70cb-47a9-a55e-fe70c9a6f77c", RoutingPlanOutcome::Success),
    (GLOBAL_NHS_APP_ROUTING_PLAN_ID, RoutingPlanOutcome::SuccessWithPersonalisationRules),
    ("4ead415a-c033-4b39-9b05-326ac237a3be", RoutingPlanOutcome::InvalidConfig),
    ("d895ade5-0029-4fc3-9fb5-86e1e5370854", RoutingPlanOutcome::RateLimited),
    ("c8857ccf-06ec-483f-9b3a-7fc732d9ad48", RoutingPlanOutcome::MissingTemplates),
    ("a3a4e55d-7a21-45a6-9286-8eb595c872a8", RoutingPlanOutcome::DuplicateTemplates),
    ("aeb16ab8-cb9c-4d23-92e9-87c78119175c", RoutingPlanOutcome::MissingNhsTemplate),
    ("3bb82e6a-9873-4683-b2b9-fdf33c9ba86f", RoutingPlanOutcome::SimulatedServerError),
];

#[derive(Debug, thiserror::Error)]
pub enum RoutingPlanLoadError {
    #[error("failed to read routing plans file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse routing plans file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable lookup from routing plan id to simulated outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPlanTable {
    plans: HashMap<String, RoutingPlanOutcome>,
}

impl RoutingPlanTable {
    /// The routing plans every sandbox ships with.
    #[must_use]
    pub fn built_in() -> Self {
        Self { plans: BUILT_IN_PLANS.iter().map(|(id, outcome)| ((*id).to_string(), *outcome)).collect() }
    }

    /// Built-in plans, with entries from `overrides` added or replacing them.
    #[must_use]
    pub fn with_overrides(overrides: HashMap<String, RoutingPlanOutcome>) -> Self {
        let mut table = Self::built_in();
        table.plans.extend(overrides);
        table
    }

    /// Loads a JSON object of `{"<plan id>": "<outcome>"}` on top of the built-in plans.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid plan map.
    pub fn load(path: &Path) -> Result<Self, RoutingPlanLoadError> {
        let raw = std::fs::read_to_string(path)?;
        let overrides: HashMap<String, RoutingPlanOutcome> = serde_json::from_str(&raw)?;
        Ok(Self::with_overrides(overrides))
    }

    #[must_use]
    pub fn resolve(&self, routing_plan_id: &str) -> Option<RoutingPlanOutcome> {
        self.plans.get(routing_plan_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Default for RoutingPlanTable {
    fn default() -> Self {
        Self::built_in()
    }
}
