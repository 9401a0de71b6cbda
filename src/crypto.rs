/*!

Transfer encryption for `dh-ietf1024-sha256-aes128-cbc-pkcs7` sessions.

The client and daemon agree on a key with Diffie-Hellman over the 1024-bit
MODP group of RFC 2409 (generator 2). The shared secret, left-padded to 128
bytes, goes through HKDF-SHA256 (no salt, empty info) to give a 16-byte
AES-128 key. Each secret is then encrypted with AES-128-CBC and PKCS#7
padding under a fresh random IV, which travels as the secret's parameters.

*/

use std::sync::LazyLock;

use aes::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7, generic_array::GenericArray};
use cbc::Encryptor;
use hkdf::Hkdf;
use num::BigUint;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error)]
pub enum Error {
    #[error("daemon sent an invalid Diffie-Hellman public key")]
    InvalidServerKey,
    #[error("cannot derive session key")]
    DeriveKey(#[source] hkdf::InvalidLength),
}

pub type AesKey = Zeroizing<[u8; 16]>;

const KEY_BYTES: usize = 128;

static DH_GENERATOR: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(2u32));
static DH_PRIME: LazyLock<BigUint> = LazyLock::new(|| {
    BigUint::from_bytes_be(&[
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xC9, 0x0F, 0xDA, 0xA2, 0x21, 0x68, 0xC2,
        0x34, 0xC4, 0xC6, 0x62, 0x8B, 0x80, 0xDC, 0x1C, 0xD1, 0x29, 0x02, 0x4E, 0x08, 0x8A, 0x67,
        0xCC, 0x74, 0x02, 0x0B, 0xBE, 0xA6, 0x3B, 0x13, 0x9B, 0x22, 0x51, 0x4A, 0x08, 0x79, 0x8E,
        0x34, 0x04, 0xDD, 0xEF, 0x95, 0x19, 0xB3, 0xCD, 0x3A, 0x43, 0x1B, 0x30, 0x2B, 0x0A, 0x6D,
        0xF2, 0x5F, 0x14, 0x37, 0x4F, 0xE1, 0x35, 0x6D, 0x6D, 0x51, 0xC2, 0x45, 0xE4, 0x85, 0xB5,
        0x76, 0x62, 0x5E, 0x7E, 0xC6, 0xF4, 0x4C, 0x42, 0xE9, 0xA6, 0x37, 0xED, 0x6B, 0x0B, 0xFF,
        0x5C, 0xB6, 0xF4, 0x06, 0xB7, 0xED, 0xEE, 0x38, 0x6B, 0xFB, 0x5A, 0x89, 0x9F, 0xA5, 0xAE,
        0x9F, 0x24, 0x11, 0x7C, 0x4B, 0x1F, 0xE6, 0x49, 0x28, 0x66, 0x51, 0xEC, 0xE6, 0x53, 0x81,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    ])
});

/// Client half of the key agreement.
pub struct Keypair {
    private: BigUint,
    public: BigUint,
}

impl Keypair {
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_BYTES]);
        OsRng.fill_bytes(&mut bytes[..]);
        let private = BigUint::from_bytes_be(&bytes[..]);
        let public = DH_GENERATOR.modpow(&private, &DH_PRIME);
        Self { private, public }
    }

    /// Big-endian public key, as sent in `OpenSession`.
    pub fn public_bytes(&self) -> Vec<u8> {
        self.public.to_bytes_be()
    }

    /// Combine our private key with the daemon's public key into the AES key.
    pub fn derive_key(&self, server_public: &[u8]) -> Result<AesKey, Error> {
        let server_public = BigUint::from_bytes_be(server_public);
        let one = BigUint::from(1u32);
        if server_public <= one || server_public >= &*DH_PRIME - &one {
            return Err(Error::InvalidServerKey);
        }

        let shared = server_public.modpow(&self.private, &DH_PRIME).to_bytes_be();
        let mut ikm = Zeroizing::new(vec![0u8; KEY_BYTES - shared.len()]);
        ikm.extend_from_slice(&shared);

        let mut okm = Zeroizing::new([0u8; 16]);
        Hkdf::<Sha256>::new(None, &ikm)
            .expand(&[], &mut okm[..])
            .map_err(Error::DeriveKey)?;
        Ok(okm)
    }
}

/// Encrypt `data` under `key`, returning `(ciphertext, iv)`.
pub fn encrypt(data: &[u8], key: &AesKey) -> (Vec<u8>, Vec<u8>) {
    let mut iv = [0u8; 16];
    OsRng.fill_bytes(&mut iv);

    let encryptor = Encryptor::<aes::Aes128>::new(
        GenericArray::from_slice(&key[..]),
        GenericArray::from_slice(&iv),
    );
    let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(data);
    (ciphertext, iv.to_vec())
}
