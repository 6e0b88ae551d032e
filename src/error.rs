use std::convert::From;
use std::error;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    InvalidMonthIndex,
    DateOutOfRange,
    MalformedRange(Vec<String>),
    ParseError,
    ConfigParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    /// Tokens rejected by a strict range parse, empty for every other kind.
    pub fn rejected_tokens(&self) -> &[String] {
        match &self.kind {
            ErrorKind::MalformedRange(tokens) => tokens.as_slice(),
            _ => &[],
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for Error {
    fn from(error: nom::Err<E>) -> Self {
        Error::new(
            ErrorKind::ParseError,
            &format!("Error while parsing: {}", error),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::IOError(err) => Some(err),
            _ => None,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::InvalidMonthIndex => "invalid month index".to_owned(),
            ErrorKind::DateOutOfRange => "date out of representable range".to_owned(),
            ErrorKind::MalformedRange(tokens) => {
                format!("malformed day range token(s) '{}'", tokens.join("', '"))
            }
            ErrorKind::ParseError => "invalid format".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_message() {
        let bare = Error::from(ErrorKind::InvalidMonthIndex);
        assert_eq!(bare.to_string(), "invalid month index");

        let detailed = bare.with_msg("12 is not in 0..=11");
        assert_eq!(detailed.to_string(), "invalid month index: 12 is not in 0..=11");
    }

    #[test]
    fn malformed_range_lists_tokens() {
        let err = Error::from(ErrorKind::MalformedRange(vec![
            "x".to_owned(),
            "5-2".to_owned(),
        ]));
        assert_eq!(err.rejected_tokens(), &["x".to_owned(), "5-2".to_owned()]);
        assert_eq!(err.to_string(), "malformed day range token(s) 'x', '5-2'");
    }
}
