//! Integration module - the outbound third-party call trace.

mod record;

pub use record::{
    ActionDescriptor, ActionType, BusinessContext, ComplianceFlags, ErrorSeverity,
    IntegrationCallError, IntegrationLogRecord, IntegrationPerformance, RequestSnapshot,
    ResponseSnapshot, ResponseStatus, ServiceDescriptor, ServiceName,
};
