use std::fmt::Display;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Config(String),
    Channel(String),
    Payload(String),
    Fetch {
        url: String,
        message: String,
    },
    Runtime(String),
}

impl Error {
    pub fn fetch(url: impl AsRef<str>, message: impl AsRef<str>) -> Self {
        Self::Fetch {
            url: url.as_ref().to_string(),
            message: message.as_ref().to_string(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "config: {message}"),
            Self::Channel(message) => write!(f, "channel: {message}"),
            Self::Payload(message) => write!(f, "payload: {message}"),
            Self::Fetch { url, message } => write!(f, "fetch {url}: {message}"),
            Self::Runtime(message) => write!(f, "runtime: {message}"),
        }
    }
}

impl core::error::Error for Error {}
