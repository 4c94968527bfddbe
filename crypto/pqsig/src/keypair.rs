use crate::{
    error::PqSigError,
    primitive::XmssPrimitive,
    signature::{PublicKeyBytes, Signature},
};

/// A validator's signing key together with the last-used-epoch guard
/// the reference design calls for (`spec.md` §9, "Stateful signatures"):
/// because XMSS is a stateful scheme, signing twice at the same epoch
/// (or signing at an earlier epoch after a later one has been used)
/// risks a forgeable key. `Keypair` refuses such calls before they ever
/// reach the primitive.
pub struct Keypair<P: XmssPrimitive> {
    secret: P::SecretState,
    pub public_key: PublicKeyBytes,
    last_used_epoch: Option<u32>,
}

impl<P: XmssPrimitive> Keypair<P> {
    /// `keypair_generate(seed, activation_epoch, num_active_epochs)` (`spec.md` §4.2).
    pub fn generate(seed: &[u8], activation_epoch: u32, num_active_epochs: u32) -> Self {
        let (secret, public_key) = P::derive_keypair(seed, activation_epoch, num_active_epochs);
        Keypair {
            secret,
            public_key,
            last_used_epoch: None,
        }
    }

    /// Restore a keypair together with the last epoch it is known to have
    /// signed at, e.g. after loading persisted state on node restart.
    pub fn restore(
        seed: &[u8],
        activation_epoch: u32,
        num_active_epochs: u32,
        last_used_epoch: Option<u32>,
    ) -> Self {
        let mut keypair = Self::generate(seed, activation_epoch, num_active_epochs);
        keypair.last_used_epoch = last_used_epoch;
        keypair
    }

    pub fn last_used_epoch(&self) -> Option<u32> {
        self.last_used_epoch
    }

    /// `sign(keypair, message_root, epoch)` (`spec.md` §4.2). Refuses to
    /// sign at an epoch at or before the last one used by this key.
    pub fn sign(&mut self, message_root: [u8; 32], epoch: u32) -> Result<Signature, PqSigError> {
        if let Some(last_used) = self.last_used_epoch {
            if epoch <= last_used {
                return Err(PqSigError::EpochAlreadyUsed {
                    requested: epoch,
                    last_used,
                });
            }
        }

        let signature = P::sign(&self.secret, message_root, epoch);
        self.last_used_epoch = Some(epoch);
        Ok(signature)
    }
}

/// `verify(pubkey_bytes, message_root, epoch, signature_bytes)` (`spec.md` §4.2).
pub fn verify<P: XmssPrimitive>(
    pubkey: &PublicKeyBytes,
    message_root: [u8; 32],
    epoch: u32,
    signature: &Signature,
) -> bool {
    P::verify(pubkey, message_root, epoch, signature)
}
