use thiserror::Error;

/// Errors surfaced by the fallible constructors and the configuration
/// loader.  The engines themselves never fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid hex color “{0}”")]
    InvalidHex(String),

    #[error("color coordinates must be finite")]
    NonFinite,

    #[error("could not parse color “{0}”")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
