use anyhow::Context;
use dl_config::DataLinkConfig;
use dl_core::session::SessionContext;
use dl_db::DataLinkService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: DataLinkService,
    pub config: DataLinkConfig,
    pub session: SessionContext,
}

impl AppContext {
    /// Open the configured store and log in as the configured session user.
    pub async fn init(config: DataLinkConfig) -> anyhow::Result<Self> {
        let role = config.session.role()?;
        let service = DataLinkService::from_config(&config)
            .await
            .with_context(|| format!("failed to open database '{}'", config.database.url))?;
        let session = SessionContext::login(config.session.user.clone(), role);
        tracing::debug!(user = session.username(), role = %role, "session started");

        Ok(Self {
            service,
            config,
            session,
        })
    }

    /// Log the session out. Consumes the context, so nothing can run after it.
    pub fn close(self) {
        let user = self.session.username().to_string();
        let duration = self.session.logout();
        tracing::debug!(
            user = %user,
            seconds = duration.num_seconds(),
            "session ended"
        );
    }

    /// In-memory context with the sample data, for handler tests.
    #[cfg(test)]
    pub async fn in_memory(role: dl_core::enums::Role) -> Self {
        let mut config = DataLinkConfig::default();
        config.database.url = ":memory:".to_string();
        config.session.role = role.to_string();
        Self::init(config).await.expect("in-memory context")
    }
}
