use thiserror::Error;

use crate::{
    config::LoadError, infra::error::InfraError, presentation::views::TemplateRenderError,
};

use super::repos::FetchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Render(#[from] TemplateRenderError),
}

impl AppError {
    /// Short label used when reporting the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Fetch(FetchError::Transport { .. }) => "transport_failure",
            AppError::Fetch(FetchError::Server { .. }) => "server_failure",
            AppError::Config(_) | AppError::Infra(InfraError::Configuration { .. }) => {
                "configuration"
            }
            AppError::Infra(InfraError::Telemetry(_)) => "telemetry",
            AppError::Infra(InfraError::Io(_)) => "io",
            AppError::Render(_) => "render",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_keep_their_kind() {
        let transport: AppError = FetchError::transport("timed out").into();
        let server: AppError = FetchError::server(502, "bad gateway").into();

        assert_eq!(transport.kind(), "transport_failure");
        assert_eq!(server.kind(), "server_failure");
        assert_eq!(
            server.to_string(),
            "server failure (status 502): bad gateway"
        );
    }

    #[test]
    fn configuration_and_io_failures_are_classified() {
        let config: AppError = LoadError::Invalid {
            key: "api.timeout_seconds",
            reason: "must be greater than 0".into(),
        }
        .into();
        let io: AppError =
            InfraError::from(std::io::Error::other("stdin closed unexpectedly")).into();

        assert_eq!(config.kind(), "configuration");
        assert!(config.to_string().contains("api.timeout_seconds"));
        assert_eq!(io.kind(), "io");
    }
}
