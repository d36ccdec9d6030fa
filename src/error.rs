use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("floor {floor} is outside the valid range [{min}, {max}]")]
    FloorOutOfRange { floor: i32, min: i32, max: i32 },
    #[error("invalid floor range: min floor {min} must be below max floor {max}")]
    InvalidFloorRange { min: i32, max: i32 },
    #[error("{0} must be greater than 0")]
    InvalidInterval(&'static str),
    #[error("request '{0}' is already assigned")]
    AlreadyAssigned(String),
    #[error("request '{0}' is already tracked")]
    DuplicateRequest(String),
    #[error("unknown request '{0}'")]
    UnknownRequest(String),
    #[error("unknown elevator index {0}")]
    UnknownElevator(usize),
    #[error("invalid request entry '{0}': expected source:destination")]
    InvalidRequestEntry(String),
    #[error("request channel closed")]
    ChannelClosed,
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
