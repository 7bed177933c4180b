use thiserror::Error;

/// Error type for invalid operations.
///
/// None of these are raised by the numeric engine itself: degenerate inputs
/// there resolve to zero. They cover wiring mistakes made by callers
/// (unknown names, unsupported sweeps) and configuration loading.
#[derive(Error, Debug)]
pub enum SludgeError {
    #[error("Unknown parameter group `{0}`")]
    UnknownGroup(String),
    #[error("Unknown field `{field}` in the {group} parameter group")]
    UnknownField { group: String, field: String },
    #[error("Unknown calculator mode `{0}`. Expected one of: biomass, land")]
    UnknownMode(String),
    #[error("Unknown sweep variable `{0}`. Expected one of: r_ratio, ts_sludge, fcr, target_biomass")]
    UnknownVariable(String),
    #[error("{variable} cannot be swept in {mode} mode")]
    UnsupportedSweep { variable: String, mode: String },
    #[error("Invalid sweep range: start={start}, stop={stop}, step={step}")]
    InvalidRange { start: f64, stop: f64, step: f64 },
    #[error("Could not parse scenario configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, SludgeError>`.
pub type SludgeResult<T> = Result<T, SludgeError>;
