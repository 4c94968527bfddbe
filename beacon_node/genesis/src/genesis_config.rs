use std::path::Path;

use pqsig::{Keypair, MockXmss};
use serde::{Deserialize, Serialize};
use types::config::preset::PUBKEY_BYTES;
use types::{GenesisSpec, Validator};

use crate::error::Error;

/// The on-disk genesis YAML shape (`spec.md` §6):
///
/// ```yaml
/// GENESIS_TIME: 1700000000
/// genesis_validators:
///   - "aabb...  (52 bytes hex)"
/// # or, instead:
/// # VALIDATOR_COUNT: 4
/// ```
///
/// When both `genesis_validators` and `VALIDATOR_COUNT` are present,
/// `genesis_validators` wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisYaml {
    #[serde(rename = "GENESIS_TIME")]
    pub genesis_time: u64,
    #[serde(default)]
    pub genesis_validators: Option<Vec<String>>,
    #[serde(rename = "VALIDATOR_COUNT", default)]
    pub validator_count: Option<u64>,
}

impl GenesisYaml {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Resolve this YAML into a typed `GenesisSpec`, deriving
    /// deterministic validator keys from an index-keyed seed when only
    /// `VALIDATOR_COUNT` is given.
    pub fn into_genesis_spec(self) -> Result<GenesisSpec, Error> {
        let validators = match self.genesis_validators {
            Some(hex_pubkeys) => hex_pubkeys
                .iter()
                .enumerate()
                .map(|(index, hex_str)| decode_pubkey(hex_str, index))
                .collect::<Result<Vec<_>, _>>()?,
            None => {
                let count = self.validator_count.ok_or(Error::MissingValidators)?;
                (0..count).map(derive_deterministic_validator).collect()
            }
        };

        Ok(GenesisSpec {
            genesis_time: self.genesis_time,
            validators,
        })
    }
}

fn decode_pubkey(hex_str: &str, index: usize) -> Result<Validator, Error> {
    let stripped = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    let bytes = hex::decode(stripped).map_err(|_| Error::InvalidPubkeyHex { index })?;
    let array: [u8; PUBKEY_BYTES] =
        bytes.try_into().map_err(|_| Error::InvalidPubkeyHex { index })?;
    Ok(Validator::from_pubkey_bytes(array))
}

/// A devnet convenience: derive a validator's keypair from its index
/// alone, so `VALIDATOR_COUNT: N` genesis files are reproducible without
/// shipping a key file. Validator-key lifecycle beyond load-at-start is
/// out of scope (`spec.md` §1); this only covers genesis bring-up.
fn derive_deterministic_validator(index: u64) -> Validator {
    let seed = format!("lean-genesis-validator-{index}");
    let keypair = Keypair::<MockXmss>::generate(seed.as_bytes(), 0, 1 << 20);
    Validator {
        pubkey: keypair.public_key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_count_derives_the_right_number_of_keys() {
        let yaml = GenesisYaml {
            genesis_time: 1000,
            genesis_validators: None,
            validator_count: Some(3),
        };
        let spec = yaml.into_genesis_spec().unwrap();
        assert_eq!(spec.validators.len(), 3);
        assert_ne!(spec.validators[0].pubkey, spec.validators[1].pubkey);
    }

    #[test]
    fn explicit_validators_win_over_validator_count() {
        let pubkey_hex = "aa".repeat(PUBKEY_BYTES);
        let yaml = GenesisYaml {
            genesis_time: 1000,
            genesis_validators: Some(vec![pubkey_hex]),
            validator_count: Some(10),
        };
        let spec = yaml.into_genesis_spec().unwrap();
        assert_eq!(spec.validators.len(), 1);
    }

    #[test]
    fn missing_both_fields_is_an_error() {
        let yaml = GenesisYaml {
            genesis_time: 1000,
            genesis_validators: None,
            validator_count: None,
        };
        assert!(matches!(
            yaml.into_genesis_spec(),
            Err(Error::MissingValidators)
        ));
    }
}
