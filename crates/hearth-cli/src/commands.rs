//! Command handlers for the Hearth CLI

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info};

use hearth_core::{Credentials, TopicTable};
use hearth_harness::{Fixture, MemoryBackend};
use hearth_runtime::{AppRuntime, RuntimeBuilder};

use crate::cli::Commands;
use crate::config::CliAppConfig;
use crate::error::{CliError, Result};
use crate::render;

/// Load the seed data for the in-memory backend
pub fn load_fixture(path: Option<&str>) -> Result<Fixture> {
    match path {
        Some(path) => {
            info!("Loading fixture from: {}", path);
            let fixture = Fixture::load_from_file(path)
                .with_context(|| format!("Failed to load fixture {}", path))?;
            Ok(fixture)
        }
        None => Ok(Fixture::demo(hearth_core::Timestamp::now())),
    }
}

/// Command dispatcher for handling CLI commands
pub struct CommandDispatcher {
    config: CliAppConfig,
    fixture: Fixture,
}

impl CommandDispatcher {
    pub fn new(config: CliAppConfig, fixture: Fixture) -> Self {
        Self { config, fixture }
    }

    /// Execute a CLI command, writing its output to `out`
    pub async fn execute<W: Write>(&self, command: Commands, out: &mut W) -> Result<()> {
        match command {
            Commands::Route { path, as_user } => {
                self.handle_route_command(&path, as_user.as_deref(), out)
                    .await
            }
            Commands::Topics => {
                write!(out, "{}", render::topics(&TopicTable::trending()))?;
                Ok(())
            }
            Commands::Watch { as_user, ticks } => {
                let ticks = ticks.unwrap_or(self.config.cli.watch_ticks);
                self.handle_watch_command(as_user.as_deref(), ticks, out)
                    .await
            }
            Commands::Notifications { as_user } => {
                self.handle_notifications_command(&as_user, out).await
            }
            Commands::Config => {
                write!(out, "{}", self.config.to_toml()?)?;
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------------

    async fn handle_route_command<W: Write>(
        &self,
        path: &str,
        as_user: Option<&str>,
        out: &mut W,
    ) -> Result<()> {
        let mut runtime = self.start_runtime()?;
        runtime.resolved().await?;
        if let Some(uid) = as_user {
            self.sign_in_as(&runtime, uid).await?;
        }

        let counts = runtime
            .refresh_unread()
            .await
            .map(|snapshot| snapshot.counts)
            .unwrap_or_default();
        let navigation = runtime.navigate(path);
        debug!("Resolved {} to {:?}", path, navigation.view);

        write!(
            out,
            "{}",
            render::navigation(&navigation, runtime.shell(), &counts)
        )?;
        runtime.shutdown();
        Ok(())
    }

    async fn handle_watch_command<W: Write>(
        &self,
        as_user: Option<&str>,
        ticks: u64,
        out: &mut W,
    ) -> Result<()> {
        let mut runtime = self.start_runtime()?;
        let mut unread = runtime.subscribe_unread();

        runtime.resolved().await?;
        if let Some(uid) = as_user {
            self.sign_in_as(&runtime, uid).await?;
        }

        let session = runtime.session();
        let Some(identity) = session.identity() else {
            writeln!(out, "Not signed in; unread polling is idle")?;
            runtime.shutdown();
            return Ok(());
        };

        info!("Watching unread counts for {}", identity.uid);
        let mut printed = 0u64;
        loop {
            tokio::select! {
                changed = unread.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = *unread.borrow_and_update();
                    writeln!(out, "{}", render::snapshot(&snapshot))?;
                    out.flush()?;

                    printed += 1;
                    if ticks > 0 && printed >= ticks {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping watch");
                    break;
                }
            }
        }

        runtime.shutdown();
        Ok(())
    }

    async fn handle_notifications_command<W: Write>(&self, uid: &str, out: &mut W) -> Result<()> {
        let mut runtime = self.start_runtime()?;
        runtime.resolved().await?;
        self.sign_in_as(&runtime, uid).await?;

        let entries = runtime.notifications().await?;
        write!(out, "{}", render::notifications(&entries))?;
        runtime.shutdown();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn start_runtime(&self) -> Result<AppRuntime> {
        let backend = Arc::new(MemoryBackend::from_fixture(self.fixture.clone()));
        let client = backend.into_client(self.config.backend.clone())?;
        let runtime = RuntimeBuilder::new(client)
            .with_config(self.config.hearth_config())
            .start()?;
        Ok(runtime)
    }

    async fn sign_in_as(&self, runtime: &AppRuntime, uid: &str) -> Result<()> {
        let user = self
            .fixture
            .users
            .iter()
            .find(|user| user.uid.as_str() == uid)
            .ok_or_else(|| CliError::UnknownUser(uid.to_string()))?;

        runtime
            .sign_in(Credentials::new(user.email.clone(), user.password.clone()))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::Timestamp;

    fn dispatcher() -> CommandDispatcher {
        let mut config = CliAppConfig::default();
        config.poller.poll_interval_ms = 50;
        CommandDispatcher::new(config, Fixture::demo(Timestamp::now()))
    }

    async fn run(command: Commands) -> Result<String> {
        let mut out = Vec::new();
        dispatcher().execute(command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn route_home_signed_out_shows_sign_in() {
        let output = run(Commands::Route {
            path: "/".to_string(),
            as_user: None,
        })
        .await
        .unwrap();
        assert!(output.contains("Sign in to Hearth"));
    }

    #[tokio::test]
    async fn route_unknown_path_redirects_home() {
        let output = run(Commands::Route {
            path: "/does/not/exist".to_string(),
            as_user: Some("ada".to_string()),
        })
        .await
        .unwrap();
        assert!(output.starts_with("path: /\nredirects: 1\n"));
        assert!(output.contains("[Feed]"));
        assert!(output.contains("Notifications (2)"));
        assert!(output.contains("Messages (2)"));
    }

    #[tokio::test]
    async fn route_topic_requires_sign_in() {
        let output = run(Commands::Route {
            path: "/topic/ai".to_string(),
            as_user: None,
        })
        .await
        .unwrap();
        assert!(output.contains("Sign in to Hearth"));

        let output = run(Commands::Route {
            path: "/topic/ai".to_string(),
            as_user: Some("grace".to_string()),
        })
        .await
        .unwrap();
        assert!(output.contains("#AI"));
        assert!(output.contains("331 posts"));
    }

    #[tokio::test]
    async fn unknown_user_is_reported() {
        let err = run(Commands::Notifications {
            as_user: "nobody".to_string(),
        })
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::UnknownUser(uid) if uid == "nobody"));
    }

    #[tokio::test]
    async fn notifications_lists_newest_first() {
        let output = run(Commands::Notifications {
            as_user: "ada".to_string(),
        })
        .await
        .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("* (A) Alan Turing liked your post"));
        assert!(lines[2].starts_with("  (A) Alan Turing commented"));
    }

    #[tokio::test]
    async fn watch_prints_requested_ticks() {
        let output = run(Commands::Watch {
            as_user: Some("ada".to_string()),
            ticks: Some(2),
        })
        .await
        .unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines
            .iter()
            .all(|line| line.ends_with("2 notifications, 2 messages")));
    }

    #[tokio::test]
    async fn watch_signed_out_is_idle() {
        let output = run(Commands::Watch {
            as_user: None,
            ticks: Some(1),
        })
        .await
        .unwrap();
        assert_eq!(output, "Not signed in; unread polling is idle\n");
    }

    #[tokio::test]
    async fn topics_and_config_render() {
        let topics = run(Commands::Topics).await.unwrap();
        assert!(topics.contains("#Technology"));

        let config = run(Commands::Config).await.unwrap();
        assert!(config.contains("poll_interval_ms = 50"));
    }
}
