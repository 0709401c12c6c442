//! Demo data seeding

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::commands::CreateProjectCommand;
use crate::application::pipeline::Mediator;
use crate::application::queries::GetAllProjectsQuery;
use crate::infrastructure::config::AppConfig;

const DEMO_PROJECT_NAME: &str = "Personal Tasks";
const DEMO_PROJECT_DESCRIPTION: &str = "My personal task management";

/// Create the demo project when seeding is enabled and no project exists
///
/// Returns whether anything was created.
pub async fn seed_demo_data(mediator: &Mediator, config: &AppConfig) -> Result<bool> {
    if !config.seed_demo_data {
        debug!("Demo data seeding disabled");
        return Ok(false);
    }

    let cancel = CancellationToken::new();
    let projects = mediator
        .send(&GetAllProjectsQuery, &cancel)
        .await
        .context("Failed to list existing projects")?;
    if !projects.is_empty() {
        debug!(projects = projects.len(), "Projects already exist, skipping seed");
        return Ok(false);
    }

    let command = CreateProjectCommand {
        name: DEMO_PROJECT_NAME.to_string(),
        description: Some(DEMO_PROJECT_DESCRIPTION.to_string()),
        user_id: config.seed_user.value().to_string(),
    };
    let project = mediator
        .send(&command, &cancel)
        .await
        .context("Failed to create the demo project")?;

    info!(project_id = %project.id, user_id = %project.user_id, "Seeded demo project");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::state::AppState;

    fn config(seed: bool) -> AppConfig {
        let flag = seed.to_string();
        AppConfig::from_lookup(|key| (key == "DEVPILOT_SEED_DEMO_DATA").then(|| flag.clone()))
            .unwrap()
    }

    #[tokio::test]
    async fn seeds_once() {
        let (state, _events) = AppState::new(config(true));

        assert!(seed_demo_data(&state.mediator, &state.config).await.unwrap());
        assert!(!seed_demo_data(&state.mediator, &state.config).await.unwrap());

        let projects = state
            .mediator
            .send(&GetAllProjectsQuery, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, DEMO_PROJECT_NAME);
        assert_eq!(projects[0].user_id, "demo@devpilot.dev");
    }

    #[tokio::test]
    async fn disabled_seeding_creates_nothing() {
        let (state, _events) = AppState::new(config(false));
        assert!(!seed_demo_data(&state.mediator, &state.config).await.unwrap());
    }
}
