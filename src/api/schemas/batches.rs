use crate::services::batch_service::AcceptedBatch;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBatchResponse {
    pub request_id: String,
    pub routing_plan: RoutingPlanSchema,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoutingPlanSchema {
    pub id: String,
    pub version: String,
}

impl From<AcceptedBatch> for SendBatchResponse {
    fn from(accepted: AcceptedBatch) -> Self {
        Self {
            request_id: accepted.request_id.to_string(),
            routing_plan: RoutingPlanSchema {
                id: accepted.routing_plan_id,
                version: accepted.routing_plan_version.to_string(),
            },
        }
    }
}
