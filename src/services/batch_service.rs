use crate::domain::batch::MessageBatch;
use crate::domain::routing_plan::{RoutingPlanOutcome, RoutingPlanTable};
use crate::domain::template::{DUPLICATE_TEMPLATES, MISSING_NHS_TEMPLATE_ID};
use crate::error::{AppError, Result};
use std::sync::Arc;
use uuid::Uuid;

pub const ROUTING_PLAN_VERSION: &str = "1";

/// A batch the sandbox pretended to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedBatch {
    /// Time-ordered, so ids from one process sort by creation.
    pub request_id: Uuid,
    pub routing_plan_id: String,
    pub routing_plan_version: &'static str,
}

#[derive(Clone, Debug)]
pub struct BatchService {
    routing_plans: Arc<RoutingPlanTable>,
    client_id: String,
}

impl BatchService {
    #[must_use]
    pub const fn new(routing_plans: Arc<RoutingPlanTable>, client_id: String) -> Self {
        Self { routing_plans, client_id }
    }

    #[must_use]
    pub fn routing_plan_count(&self) -> usize {
        self.routing_plans.len()
    }

    /// Resolves the batch's routing plan and produces the simulated outcome.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` for unknown routing plans, and the canned
    /// rejection for plans configured to fail.
    pub fn submit(&self, batch: &MessageBatch) -> Result<AcceptedBatch> {
        let plan_id = batch.routing_plan_id.as_str();
        let outcome = self.routing_plans.resolve(plan_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Routing Config does not exist for clientId \"{}\" and routingPlanId \"{plan_id}\"",
                self.client_id
            ))
        })?;

        match outcome {
            RoutingPlanOutcome::Success => {}
            RoutingPlanOutcome::SuccessWithPersonalisationRules => {
                if !batch.messages.iter().all(|message| message.has_single_body_personalisation()) {
                    return Err(AppError::BadRequest("Expect single personalisation field of 'body'".to_string()));
                }
            }
            RoutingPlanOutcome::InvalidConfig => {
                return Err(AppError::BadRequest("Invalid Routing Config".to_string()));
            }
            RoutingPlanOutcome::RateLimited => {
                return Err(AppError::TooEarly(
                    "Message with this idempotency key is already being processed".to_string(),
                ));
            }
            RoutingPlanOutcome::MissingNhsTemplate => {
                return Err(AppError::Internal(format!(
                    "NHS App Template does not exist with internalTemplateId: {MISSING_NHS_TEMPLATE_ID}"
                )));
            }
            RoutingPlanOutcome::MissingTemplates => {
                return Err(AppError::Internal(format!(
                    "Templates required in \"{plan_id}\" routing config not found"
                )));
            }
            RoutingPlanOutcome::DuplicateTemplates => {
                let templates = serde_json::to_string(&DUPLICATE_TEMPLATES)
                    .map_err(|e| AppError::Internal(format!("Failed to render duplicate templates: {e}")))?;
                return Err(AppError::Internal(format!("Duplicate templates in routing config: {templates}")));
            }
            RoutingPlanOutcome::SimulatedServerError => {
                return Err(AppError::Internal("Error writing request items to DynamoDB".to_string()));
            }
        }

        let accepted = AcceptedBatch {
            request_id: Uuid::now_v7(),
            routing_plan_id: plan_id.to_string(),
            routing_plan_version: ROUTING_PLAN_VERSION,
        };

        tracing::info!(
            request_id = %accepted.request_id,
            routing_plan_id = %plan_id,
            message_batch_reference = %batch.message_batch_reference,
            message_count = batch.message_count(),
            "Message batch accepted"
        );

        Ok(accepted)
    }
}
