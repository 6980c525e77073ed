// src/page/mod.rs
mod build_info;
mod model;
mod page;
mod severity;
mod template;

pub use build_info::BuildInfo;
pub use model::{CheckView, Link, RenderModel};
pub use page::{PageBuilder, PageError, StatusPage, DEFAULT_TITLE, RENDER_ERROR_MESSAGE};
pub use severity::Severity;
pub use template::{PageTemplate, DEFAULT_TEMPLATE};
