pub mod config;
pub mod controller;
pub mod error;
pub mod fact;
pub mod metrics;
pub mod settings;

// Re-export specific items if needed for convenient access
pub use config::{ControllerConfig, LifecycleGuard};
pub use controller::{create, Consent, ControllerDeps, MetricController, MetricServiceType, MetricsService};
pub use error::{BusError, ConfigError, LifecycleError};
pub use fact::{Action, Component, Fact, FactBus, FactProcessor, Item, Metadata};
