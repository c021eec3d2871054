//! One record per outbound call to a third-party service.
//!
//! Unlike the interaction record, this trace is independent of business
//! framing: every attempt against an external service gets exactly one
//! record, owned by its call for its duration. Mutations are full-record
//! rewrites; concurrent calls never share a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{ContactId, IntegrationLogId, LeadId, ProjectId, PropertyId, UserId};

/// Third-party services the CRM integrates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceName {
    Whatsapp,
    Telegram,
    GoogleWorkspace,
    Gmail,
    GoogleDrive,
    GoogleCalendar,
    Stripe,
    AwsS3,
    Cloudinary,
    Twilio,
    Openai,
    GoogleMaps,
    GoogleTranslate,
}

impl ServiceName {
    /// Stable string form stored in the log database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Whatsapp => "whatsapp",
            ServiceName::Telegram => "telegram",
            ServiceName::GoogleWorkspace => "google_workspace",
            ServiceName::Gmail => "gmail",
            ServiceName::GoogleDrive => "google_drive",
            ServiceName::GoogleCalendar => "google_calendar",
            ServiceName::Stripe => "stripe",
            ServiceName::AwsS3 => "aws_s3",
            ServiceName::Cloudinary => "cloudinary",
            ServiceName::Twilio => "twilio",
            ServiceName::Openai => "openai",
            ServiceName::GoogleMaps => "google_maps",
            ServiceName::GoogleTranslate => "google_translate",
        }
    }
}

/// What kind of action the outbound call performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    SendMessage,
    ReceiveMessage,
    UploadFile,
    DownloadFile,
    CreateEvent,
    UpdateEvent,
    PaymentProcessing,
    ApiCall,
    Webhook,
    SyncData,
    TranslateText,
    GenerateContent,
    AnalyzeImage,
    SendNotification,
}

impl ActionType {
    /// Stable string form stored in the log database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::SendMessage => "send_message",
            ActionType::ReceiveMessage => "receive_message",
            ActionType::UploadFile => "upload_file",
            ActionType::DownloadFile => "download_file",
            ActionType::CreateEvent => "create_event",
            ActionType::UpdateEvent => "update_event",
            ActionType::PaymentProcessing => "payment_processing",
            ActionType::ApiCall => "api_call",
            ActionType::Webhook => "webhook",
            ActionType::SyncData => "sync_data",
            ActionType::TranslateText => "translate_text",
            ActionType::GenerateContent => "generate_content",
            ActionType::AnalyzeImage => "analyze_image",
            ActionType::SendNotification => "send_notification",
        }
    }
}

/// Outcome classification of the outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
    Timeout,
    RateLimited,
}

impl ResponseStatus {
    /// Stable string form stored in the log database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Success => "success",
            ResponseStatus::Error => "error",
            ResponseStatus::Timeout => "timeout",
            ResponseStatus::RateLimited => "rate_limited",
        }
    }
}

/// Operator-facing severity of an integration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Stable string form stored in the log database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Low => "low",
            ErrorSeverity::Medium => "medium",
            ErrorSeverity::High => "high",
            ErrorSeverity::Critical => "critical",
        }
    }
}

/// Which service was called, and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: ServiceName,
    pub version: Option<String>,
    pub endpoint: Option<String>,
    /// HTTP verb of the outbound call.
    pub method: Option<String>,
}

impl ServiceDescriptor {
    /// Descriptor with only the service name set.
    pub fn named(name: ServiceName) -> Self {
        Self {
            name,
            version: None,
            endpoint: None,
            method: None,
        }
    }

    /// Sets the HTTP verb.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// What the call did, in the fixed taxonomy plus free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub kind: ActionType,
    pub description: Option<String>,
}

/// Snapshot of the outbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub payload: Option<Value>,
    pub headers: Option<Value>,
    pub size_bytes: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl Default for RequestSnapshot {
    fn default() -> Self {
        Self {
            payload: None,
            headers: None,
            size_bytes: None,
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of the response, filled by `record_success`/`mark_as_error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status: Option<ResponseStatus>,
    pub status_code: Option<u16>,
    pub data: Option<Value>,
    pub size_bytes: Option<u64>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Latency, retries and rate-limit observations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationPerformance {
    pub response_time_ms: Option<u64>,
    pub retry_count: u32,
    pub cache_hit: bool,
    pub rate_limited: bool,
}

/// Error descriptor for the outbound call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationCallError {
    pub occurred: bool,
    pub message: Option<String>,
    pub code: Option<String>,
    pub severity: ErrorSeverity,
}

/// Optional links back to CRM entities touched by the call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessContext {
    pub property_id: Option<PropertyId>,
    pub project_id: Option<ProjectId>,
    pub lead_id: Option<LeadId>,
    pub contact_id: Option<ContactId>,
}

/// Informational compliance flags; nothing in the gateway enforces them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ComplianceFlags {
    pub gdpr_processed: bool,
    pub consent_given: bool,
    pub encryption_used: bool,
}

/// One outbound third-party call, attempted or completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationLogRecord {
    pub id: IntegrationLogId,
    pub user_id: Option<UserId>,
    pub service: ServiceDescriptor,
    pub action: ActionDescriptor,
    pub request: RequestSnapshot,
    pub response: ResponseSnapshot,
    pub performance: IntegrationPerformance,
    pub error: IntegrationCallError,
    pub business_context: BusinessContext,
    pub compliance: ComplianceFlags,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IntegrationLogRecord {
    /// Creates a record for one call attempt.
    pub fn new(service: ServiceDescriptor, action: ActionDescriptor) -> Self {
        let now = Utc::now();
        Self {
            id: IntegrationLogId::new(),
            user_id: None,
            service,
            action,
            request: RequestSnapshot::default(),
            response: ResponseSnapshot::default(),
            performance: IntegrationPerformance::default(),
            error: IntegrationCallError::default(),
            business_context: BusinessContext::default(),
            compliance: ComplianceFlags::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the requester.
    pub fn with_user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Sets the request payload snapshot.
    pub fn with_request_payload(mut self, payload: Value) -> Self {
        self.request.payload = Some(payload);
        self
    }

    /// Marks the call as failed.
    pub fn mark_as_error(&mut self, message: impl Into<String>, code: Option<String>) {
        self.error.occurred = true;
        self.error.message = Some(message.into());
        self.error.code = code;
        self.response.status = Some(ResponseStatus::Error);
        self.response.timestamp = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Marks the call as succeeded with its response data.
    pub fn record_success(&mut self, data: Value) {
        self.response.status = Some(ResponseStatus::Success);
        self.response.data = Some(data);
        self.response.timestamp = Some(Utc::now());
        self.error.occurred = false;
        self.updated_at = Utc::now();
    }

    /// Records latency and retry observations.
    pub fn update_performance_metrics(&mut self, response_time_ms: u64, retry_count: u32) {
        self.performance.response_time_ms = Some(response_time_ms);
        self.performance.retry_count = retry_count;
        self.updated_at = Utc::now();
    }
}
