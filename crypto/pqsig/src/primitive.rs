use alloy_primitives::B256;
use sha2::{Digest, Sha256};
use ssz_types::{FixedVector, VariableList};

use crate::signature::{PublicKeyBytes, Signature};

/// The key/sign/verify contract a Generalized-XMSS primitive must
/// satisfy. The concrete primitive (the actual hash-chain / Merkle-tree
/// construction and the underlying hash function) is an external
/// collaborator per `spec.md` §1; the core only ever calls through this
/// trait. Swapping in a real, security-reviewed XMSS implementation
/// means providing a new `impl XmssPrimitive`.
pub trait XmssPrimitive: Send + Sync {
    /// Per-key secret state retained between signing calls.
    type SecretState: Clone + Send + Sync;

    fn derive_keypair(
        seed: &[u8],
        activation_epoch: u32,
        num_active_epochs: u32,
    ) -> (Self::SecretState, PublicKeyBytes);

    fn sign(secret: &Self::SecretState, message_root: [u8; 32], epoch: u32) -> Signature;

    fn verify(
        pubkey: &PublicKeyBytes,
        message_root: [u8; 32],
        epoch: u32,
        signature: &Signature,
    ) -> bool;
}

/// A deterministic, hash-chain-shaped stand-in for a real Generalized-XMSS
/// primitive. It has no cryptographic hardness — the "public" key embeds
/// the seed a real scheme would keep secret, so `verify` can recompute the
/// expected signature and compare — but it has the right container shape
/// (Merkle path + randomness + per-chunk hashes) and the rebinding
/// property `spec.md` §8 requires: a signature verifies only against the
/// exact `(pubkey, message_root, epoch)` it was produced for. It exists so
/// the core, its tests, and local devnets can exercise the full contract
/// without linking a production XMSS library.
pub struct MockXmss;

#[derive(Clone)]
pub struct MockSecretState {
    seed: [u8; 32],
    activation_epoch: u32,
    num_active_epochs: u32,
}

fn hash(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

fn chain(seed: &[u8; 32], message_root: [u8; 32], epoch: u32) -> (Vec<B256>, [u8; 28], Vec<B256>) {
    let path: Vec<B256> = (0..4)
        .map(|i| B256::from(hash(&[b"pqsig-mock-path", seed, &epoch.to_le_bytes(), &[i as u8]])))
        .collect();

    let rho_full = hash(&[b"pqsig-mock-rho", seed, &message_root, &epoch.to_le_bytes()]);
    let mut rho = [0u8; 28];
    rho.copy_from_slice(&rho_full[..28]);

    let hashes: Vec<B256> = (0..4)
        .map(|i| {
            B256::from(hash(&[
                b"pqsig-mock-chunk",
                seed,
                &message_root,
                &epoch.to_le_bytes(),
                &[i as u8],
            ]))
        })
        .collect();

    (path, rho, hashes)
}

fn unpack_pubkey(pubkey: &PublicKeyBytes) -> Option<([u8; 32], u32, u32)> {
    let bytes: &[u8] = pubkey;
    if bytes.len() != 52 {
        return None;
    }
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);
    let activation_epoch = u32::from_le_bytes(bytes[32..36].try_into().ok()?);
    let num_active_epochs = u32::from_le_bytes(bytes[36..40].try_into().ok()?);
    Some((seed, activation_epoch, num_active_epochs))
}

impl XmssPrimitive for MockXmss {
    type SecretState = MockSecretState;

    fn derive_keypair(
        seed: &[u8],
        activation_epoch: u32,
        num_active_epochs: u32,
    ) -> (Self::SecretState, PublicKeyBytes) {
        let mut seed32 = [0u8; 32];
        let n = seed.len().min(32);
        seed32[..n].copy_from_slice(&seed[..n]);

        let mut pk_bytes = vec![0u8; 52];
        pk_bytes[..32].copy_from_slice(&seed32);
        pk_bytes[32..36].copy_from_slice(&activation_epoch.to_le_bytes());
        pk_bytes[36..40].copy_from_slice(&num_active_epochs.to_le_bytes());
        // Remaining bytes (40..52) are reserved padding, left zeroed.

        (
            MockSecretState {
                seed: seed32,
                activation_epoch,
                num_active_epochs,
            },
            PublicKeyBytes::from(pk_bytes),
        )
    }

    fn sign(secret: &Self::SecretState, message_root: [u8; 32], epoch: u32) -> Signature {
        let (path, rho, hashes) = chain(&secret.seed, message_root, epoch);
        Signature {
            path: VariableList::from(path),
            rho: FixedVector::from(rho.to_vec()),
            hashes: VariableList::from(hashes),
        }
    }

    fn verify(
        pubkey: &PublicKeyBytes,
        message_root: [u8; 32],
        epoch: u32,
        signature: &Signature,
    ) -> bool {
        let Some((seed, activation_epoch, num_active_epochs)) = unpack_pubkey(pubkey) else {
            return false;
        };
        if epoch < activation_epoch || epoch >= activation_epoch.saturating_add(num_active_epochs)
        {
            return false;
        }

        let (expected_path, expected_rho, expected_hashes) = chain(&seed, message_root, epoch);

        signature.path.to_vec() == expected_path
            && signature.rho.to_vec() == expected_rho.to_vec()
            && signature.hashes.to_vec() == expected_hashes
    }
}
