//! Exit codes for the `ppc` CLI.
//!
//! Exit code ranges:
//! - 0: success
//! - 10-19: user/input errors (recoverable by fixing arguments or data)
//! - 20-29: environment errors (files, streams)

use ppc_common::{Error, ErrorCategory};

/// Process exit codes. Stable contract for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed.
    Clean = 0,

    /// Invalid arguments (bad sizes, shapes, id lists).
    ArgsError = 10,

    /// Inference data or target arrays are unusable.
    DataError = 11,

    /// Settings file missing, unparsable or invalid.
    ConfigError = 12,

    /// Figure could not be drawn or exported.
    RenderError = 13,

    /// I/O error reading input or writing output.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes 10-19, resolvable by the user.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Name used in JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::DataError => "ERR_DATA",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::RenderError => "ERR_RENDER",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a library error.
    pub fn from_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Input => ExitCode::ArgsError,
            ErrorCategory::Data => ExitCode::DataError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Render => ExitCode::RenderError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::DataError.as_i32(), 11);
        assert_eq!(ExitCode::ConfigError.as_i32(), 12);
        assert_eq!(ExitCode::RenderError.as_i32(), 13);
        assert_eq!(ExitCode::IoError.as_i32(), 21);
    }

    #[test]
    fn test_from_error() {
        let err = Error::SampleSizeExceedsPopulation {
            requested: 5,
            population: 2,
        };
        assert_eq!(ExitCode::from_error(&err), ExitCode::ArgsError);

        let err = Error::UnknownObservation {
            id: 9,
            n_observations: 3,
        };
        assert_eq!(ExitCode::from_error(&err), ExitCode::DataError);

        let err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ExitCode::from_error(&err), ExitCode::IoError);

        let err = Error::UnsupportedExportFormat("bmp".into());
        assert_eq!(ExitCode::from_error(&err), ExitCode::RenderError);
    }

    #[test]
    fn test_every_failure_code_is_reachable() {
        let errors = [
            Error::InvalidArgument("k".into()),
            Error::NonFinite("y".into()),
            Error::Config("bad".into()),
            Error::Render("oops".into()),
            Error::Io(std::io::Error::other("eof")),
        ];
        let codes: Vec<ExitCode> = errors.iter().map(ExitCode::from_error).collect();
        assert_eq!(
            codes,
            vec![
                ExitCode::ArgsError,
                ExitCode::DataError,
                ExitCode::ConfigError,
                ExitCode::RenderError,
                ExitCode::IoError,
            ]
        );
    }

    #[test]
    fn test_classification() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::Clean.is_user_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(!ExitCode::IoError.is_user_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::DataError.to_string(), "ERR_DATA (11)");
    }
}
