/*!

Secret Service transfer sessions.

Every secret sent to the daemon names the session it was encoded for. The
session's algorithm decides whether the value travels as plaintext or
encrypted under a key agreed when the session was opened.

*/

use dbus::Path;
use dbus::arg::{RefArg, Variant};

use crate::errors::Result;
use crate::secret::{EncodedSecret, PlaintextSecret};

pub const ALGORITHM_PLAIN: &str = "plain";
pub const ALGORITHM_DH: &str = "dh-ietf1024-sha256-aes128-cbc-pkcs7";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Algorithm {
    Plain,
    #[cfg(feature = "crypto-rust")]
    Dh,
}

impl Default for Algorithm {
    #[cfg(feature = "crypto-rust")]
    fn default() -> Self {
        Self::Dh
    }

    #[cfg(not(feature = "crypto-rust"))]
    fn default() -> Self {
        Self::Plain
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        match self {
            Self::Plain => ALGORITHM_PLAIN,
            #[cfg(feature = "crypto-rust")]
            Self::Dh => ALGORITHM_DH,
        }
    }
}

/// Client-side state needed before calling `OpenSession`.
pub(crate) enum Handshake {
    Plain,
    #[cfg(feature = "crypto-rust")]
    Dh(crate::crypto::Keypair),
}

impl Handshake {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Plain => Self::Plain,
            #[cfg(feature = "crypto-rust")]
            Algorithm::Dh => Self::Dh(crate::crypto::Keypair::generate()),
        }
    }

    pub(crate) fn algorithm(&self) -> Algorithm {
        match self {
            Self::Plain => Algorithm::Plain,
            #[cfg(feature = "crypto-rust")]
            Self::Dh(_) => Algorithm::Dh,
        }
    }

    /// The `input` argument of `OpenSession`.
    pub(crate) fn input(&self) -> Variant<Box<dyn RefArg>> {
        match self {
            Self::Plain => Variant(Box::new(String::new()) as Box<dyn RefArg>),
            #[cfg(feature = "crypto-rust")]
            Self::Dh(keypair) => Variant(Box::new(keypair.public_bytes()) as Box<dyn RefArg>),
        }
    }

    /// Finish the handshake with the daemon's `OpenSession` reply.
    pub(crate) fn complete(
        self,
        output: &(dyn RefArg + 'static),
        path: Path<'static>,
    ) -> Result<Encoder> {
        match self {
            Self::Plain => {
                let _ = output;
                Ok(Encoder::plain(path))
            }
            #[cfg(feature = "crypto-rust")]
            Self::Dh(keypair) => {
                let server_public = dbus::arg::cast::<Vec<u8>>(output)
                    .ok_or(crate::crypto::Error::InvalidServerKey)?;
                let key = keypair.derive_key(server_public)?;
                Ok(Encoder {
                    path,
                    key: Some(key),
                })
            }
        }
    }
}

/// Encodes secrets for one open session.
pub struct Encoder {
    path: Path<'static>,
    #[cfg(feature = "crypto-rust")]
    key: Option<crate::crypto::AesKey>,
}

impl Encoder {
    pub fn plain(path: Path<'static>) -> Self {
        Self {
            path,
            #[cfg(feature = "crypto-rust")]
            key: None,
        }
    }

    pub fn path(&self) -> &Path<'static> {
        &self.path
    }

    pub fn algorithm(&self) -> Algorithm {
        #[cfg(feature = "crypto-rust")]
        if self.key.is_some() {
            return Algorithm::Dh;
        }
        Algorithm::Plain
    }

    pub fn encode(&self, secret: &PlaintextSecret) -> Result<EncodedSecret> {
        #[cfg(feature = "crypto-rust")]
        if let Some(key) = &self.key {
            let (value, parameters) = crate::crypto::encrypt(secret.value(), key);
            return Ok(EncodedSecret {
                session: self.path.clone(),
                parameters,
                value,
                content_type: secret.content_type().to_string(),
            });
        }
        Ok(EncodedSecret {
            session: self.path.clone(),
            parameters: Vec::new(),
            value: secret.value().to_vec(),
            content_type: secret.content_type().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_encoding_passes_bytes_through() {
        let encoder = Encoder::plain(Path::from("/org/freedesktop/secrets/session/1"));
        let encoded = encoder.encode(&PlaintextSecret::new(b"hunter2")).unwrap();
        assert_eq!(&*encoded.session, "/org/freedesktop/secrets/session/1");
        assert!(encoded.parameters.is_empty());
        assert_eq!(encoded.value, b"hunter2");
        assert_eq!(encoded.content_type, "text/plain");
        assert_eq!(encoder.algorithm(), Algorithm::Plain);
    }

    #[test]
    fn plain_encoding_keeps_empty_secret_empty() {
        let encoder = Encoder::plain(Path::from("/s"));
        let encoded = encoder.encode(&PlaintextSecret::new(b"")).unwrap();
        assert!(encoded.value.is_empty());
        assert!(encoded.parameters.is_empty());
    }

    #[test]
    fn algorithm_names_match_the_wire() {
        assert_eq!(Algorithm::Plain.as_ref(), "plain");
        #[cfg(feature = "crypto-rust")]
        assert_eq!(Algorithm::Dh.as_ref(), "dh-ietf1024-sha256-aes128-cbc-pkcs7");
    }

    #[cfg(feature = "crypto-rust")]
    #[test]
    fn dh_handshake_produces_encrypting_encoder() {
        let daemon = crate::crypto::Keypair::generate();
        let handshake = Handshake::new(Algorithm::Dh);
        assert_eq!(handshake.algorithm(), Algorithm::Dh);

        let reply: Box<dyn RefArg> = Box::new(daemon.public_bytes());
        let encoder = handshake
            .complete(&*reply, Path::from("/org/freedesktop/secrets/session/2"))
            .unwrap();
        assert_eq!(encoder.algorithm(), Algorithm::Dh);

        let encoded = encoder.encode(&PlaintextSecret::new(b"hunter2")).unwrap();
        assert_eq!(encoded.parameters.len(), 16);
        assert_eq!(encoded.value.len(), 16);
        assert_ne!(encoded.value, b"hunter2");
    }

    #[cfg(feature = "crypto-rust")]
    #[test]
    fn dh_handshake_rejects_non_byte_reply() {
        let reply: Box<dyn RefArg> = Box::new(String::from("nope"));
        let result = Handshake::new(Algorithm::Dh).complete(&*reply, Path::from("/s"));
        assert!(matches!(result, Err(crate::errors::Error::Encryption(_))));
    }
}
