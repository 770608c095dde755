pub mod batch;
pub mod routing_plan;
pub mod template;
