use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): every file was processed
/// - `Failure` (1): the run finished but some files could not be transformed
/// - `Error` (2): the run could not start or finish (config, artifact, write failure)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
