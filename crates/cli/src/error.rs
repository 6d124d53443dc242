//! Failure kinds for the `terrain-mesh` binary and the exit code of each.
//!
//! | code | meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | success                                          |
//! | 2    | argument parsing (reported by clap)              |
//! | 10   | rejected scene, dimensions or theme              |
//! | 11   | scene file unreadable or PNG not writable        |
//! | 12   | malformed user value such as a background color  |
//! | 13   | JSON report could not be produced                |

use std::fmt;
use terrain_mesh_core::EngineError;

#[derive(Debug)]
pub enum CliError {
    Engine(EngineError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "i/o: {msg}"),
            CliError::Input(msg) => f.write_str(msg),
            CliError::Serialization(msg) => write!(f, "json output: {msg}"),
        }
    }
}

impl From<EngineError> for CliError {
    /// Snapshot write failures surface as I/O and bad colors as input
    /// errors; everything else the engine rejects keeps its own code.
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            EngineError::InvalidColor(value) => {
                CliError::Input(format!("invalid background color: {value}"))
            }
            rejected => CliError::Engine(rejected),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_code() {
        let codes = [
            CliError::Engine(EngineError::InvalidDimensions).exit_code(),
            CliError::Io("png".into()).exit_code(),
            CliError::Input("color".into()).exit_code(),
            CliError::Serialization("json".into()).exit_code(),
        ];
        assert_eq!(codes, [10, 11, 12, 13]);
    }

    #[test]
    fn snapshot_failure_keeps_its_message() {
        let err = CliError::from(EngineError::Io("permission denied".into()));
        assert_eq!(err.exit_code(), 11);
        assert_eq!(err.to_string(), "i/o: permission denied");
    }

    #[test]
    fn bad_background_is_input_error() {
        let err = CliError::from(EngineError::InvalidColor("#12".into()));
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("#12"));
    }

    #[test]
    fn scene_and_theme_rejections_stay_engine_errors() {
        for e in [
            EngineError::UnknownTheme("sunset".into()),
            EngineError::InvalidScene("point count must be at least 1".into()),
            EngineError::InvalidDimensions,
        ] {
            assert_eq!(CliError::from(e).exit_code(), 10);
        }
    }

    #[test]
    fn json_failure_is_serialization_error() {
        let bad = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let err = CliError::from(bad);
        assert_eq!(err.exit_code(), 13);
        assert!(err.to_string().starts_with("json output:"));
    }
}
