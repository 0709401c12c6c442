//! Application services - Use cases shared by several handlers and validators

mod project_insights_service;

pub use project_insights_service::{
    ProjectInsightsService, ProjectNameUniqueRule, DUPLICATE_NAME_MESSAGE,
};
