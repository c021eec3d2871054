//! Application layer - the capability dispatcher façade and its log
//! writers.

mod dispatcher;
mod loggers;

pub use dispatcher::{AiGateway, AiGatewayBuilder};
pub use loggers::{IntegrationLogger, InteractionLogger};
