/// Failure taxonomy for loading the genesis/bootnode YAML files
/// (`spec.md` §6) — tier 1 ("bad YAML") in the §7 taxonomy.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    /// Neither `genesis_validators` nor `VALIDATOR_COUNT` was present.
    MissingValidators,
    /// A `genesis_validators` entry wasn't valid hex, or wasn't exactly
    /// `PUBKEY_BYTES` long.
    InvalidPubkeyHex { index: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Yaml(e)
    }
}
