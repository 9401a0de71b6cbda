/*!

Secret values as they travel to the daemon.

A [`PlaintextSecret`] is what the caller hands in; an [`EncodedSecret`] is the
Secret Service `Secret` struct (D-Bus signature `(oayays)`) produced by a
session. Both wipe their bytes when dropped.

*/

use dbus::Path;
use zeroize::{Zeroize, Zeroizing};

/// Content type attached to every password sent to the daemon.
pub const TEXT_PLAIN: &str = "text/plain";

pub struct PlaintextSecret {
    value: Zeroizing<Vec<u8>>,
    content_type: &'static str,
}

impl PlaintextSecret {
    pub fn new(value: &[u8]) -> Self {
        Self {
            value: Zeroizing::new(value.to_vec()),
            content_type: TEXT_PLAIN,
        }
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

impl std::fmt::Debug for PlaintextSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaintextSecret")
            .field("len", &self.value.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// D-Bus argument form of an encoded secret, borrowing its bytes.
pub type DbusSecret<'a> = (Path<'static>, &'a [u8], &'a [u8], &'a str);

#[derive(Clone, PartialEq, Eq)]
pub struct EncodedSecret {
    pub session: Path<'static>,
    pub parameters: Vec<u8>,
    pub value: Vec<u8>,
    pub content_type: String,
}

impl EncodedSecret {
    /// The tuple form the `dbus` crate appends as `(oayays)`. Only the
    /// session path is copied; the value stays in this wiped buffer.
    pub fn to_dbus(&self) -> DbusSecret<'_> {
        (
            self.session.clone(),
            &self.parameters[..],
            &self.value[..],
            self.content_type.as_str(),
        )
    }
}

impl Drop for EncodedSecret {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl std::fmt::Debug for EncodedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedSecret")
            .field("session", &self.session)
            .field("parameters", &self.parameters.len())
            .field("value", &self.value.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dbus_form_borrows_the_value() {
        let secret = EncodedSecret {
            session: Path::from("/org/freedesktop/secrets/session/1"),
            parameters: Vec::new(),
            value: b"-secret".to_vec(),
            content_type: TEXT_PLAIN.to_string(),
        };
        let (session, parameters, value, content_type) = secret.to_dbus();
        assert_eq!(session, secret.session);
        assert!(parameters.is_empty());
        assert_eq!(value, b"-secret");
        assert!(std::ptr::eq(value.as_ptr(), secret.value.as_ptr()));
        assert_eq!(content_type, "text/plain");
    }

    #[test]
    fn debug_hides_the_password() {
        let secret = PlaintextSecret::new(b"hunter2");
        let shown = format!("{secret:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("len: 7"));
    }
}
