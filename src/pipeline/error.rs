use crate::config::ConfigError;
use crate::debian::ChangelogError;
use crate::environment::EnvironmentError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("can't specify --include and --exclude together")]
    ConflictingSelection,

    #[error("--include/--exclude can't be combined with the '{0}' subcommand")]
    FilterWithStepCommand(String),

    #[error("dist image not found: no base image offers tag '{0}'")]
    DistributionImageNotFound(String),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error("command `{command}` exited with status {code}")]
    ToolExecution { command: String, code: i64 },

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Metadata(#[from] ChangelogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| PipelineError::Io {
            action,
            path,
            source,
        }
    }

    /// Errors caused by the invocation itself rather than by the environment.
    /// Re-running without changing the input cannot fix them.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PipelineError::ConflictingSelection
                | PipelineError::FilterWithStepCommand(_)
                | PipelineError::DistributionImageNotFound(_)
                | PipelineError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PipelineError::ConflictingSelection.to_string(),
            "can't specify --include and --exclude together"
        );
        assert_eq!(
            PipelineError::DistributionImageNotFound("nonexistent99".to_string()).to_string(),
            "dist image not found: no base image offers tag 'nonexistent99'"
        );
        assert_eq!(
            PipelineError::FilterWithStepCommand("deps".to_string()).to_string(),
            "--include/--exclude can't be combined with the 'deps' subcommand"
        );
        assert_eq!(
            PipelineError::ToolExecution {
                command: "lintian -i".to_string(),
                code: 2
            }
            .to_string(),
            "command `lintian -i` exited with status 2"
        );
    }

    #[test]
    fn test_io_helper() {
        let err = PipelineError::io("Failed to create", "/tmp/x")(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.to_string(), "Failed to create /tmp/x: denied");
    }

    #[test]
    fn test_is_configuration() {
        assert!(PipelineError::ConflictingSelection.is_configuration());
        assert!(PipelineError::DistributionImageNotFound("x".into()).is_configuration());
        assert!(PipelineError::FilterWithStepCommand("build".into()).is_configuration());
        assert!(!PipelineError::ToolExecution {
            command: "scan".into(),
            code: 1
        }
        .is_configuration());
    }
}
