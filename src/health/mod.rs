// src/health/mod.rs
mod checker;
mod context;
mod decision;
mod endpoint;
mod http;
mod probe;
mod registry;
mod result;
mod target;

pub use checker::{CheckError, HealthChecker};
pub use context::CheckContext;
pub use decision::{decide, Decision};
pub use endpoint::{HealthEndpoint, NO_DEPS_PARAM};
pub use http::HttpProbe;
pub use probe::{Probe, ProbeError};
pub use registry::Registry;
pub use result::{CheckResult, Outcome, Status};
pub use target::{Importance, Target};
