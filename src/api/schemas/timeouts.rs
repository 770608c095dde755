use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SleepQuery {
    /// Milliseconds the simulated downstream call should take
    pub sleep: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepResponse {
    pub slept_ms: u64,
}
