//! Staged, resumable lifecycle orchestration for managed Prometheus
//! workspaces and the configurations attached to them.
//!
//! Every operation is a single stateless invocation. Long-running remote
//! work is never waited on in-process: the handler returns an in-progress
//! event carrying a continuation blob, and the caller invokes it again with
//! that blob after the suggested delay.
//!
//! ```text
//! create:  workspace -> alert manager definition -> logging configuration
//! update:  workspace -> alert manager definition -> logging configuration
//! delete:  workspace (attached configurations go with it)
//! ```

pub mod alert_manager;
pub mod bootstrap;
pub mod event;
pub mod handler;
pub mod logging_config;
pub mod model;
pub mod request;
pub mod resource;
pub mod rule_groups;
pub mod stage;
pub mod workspace;

pub use bootstrap::bootstrap;
pub use event::{OperationStatus, ProgressEvent};
pub use handler::WorkspaceOrchestrator;
pub use model::{LoggingConfiguration, RuleGroupsNamespaceModel, WorkspaceModel};
pub use request::HandlerRequest;
pub use rule_groups::RuleGroupsNamespaceOrchestrator;
pub use stage::{Stage, StageOutcome, StagePipeline};
