/// Failure taxonomy for the Store contract (`spec.md` §4.4).
#[derive(Debug)]
pub enum Error {
    Backend(sled::Error),
    Ssz(ssz::DecodeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl From<sled::Error> for Error {
    fn from(e: sled::Error) -> Self {
        Error::Backend(e)
    }
}

impl From<ssz::DecodeError> for Error {
    fn from(e: ssz::DecodeError) -> Self {
        Error::Ssz(e)
    }
}
