/*!

Errors raised while changing a keyring's master password.

Each variant names the step of the password change that failed, so callers
can tell a missing daemon from a rejected password. D-Bus failures are kept
as the error source where one exists.

*/

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The session bus or the Secret Service daemon could not be reached,
    /// or it refused to open a transfer session.
    #[error("cannot open Secret Service session: {0}")]
    ServiceUnavailable(#[source] dbus::Error),

    /// The daemon failed while resolving the collection alias.
    #[error("cannot resolve keyring collection alias '{alias}': {source}")]
    CollectionUnavailable {
        alias: String,
        #[source]
        source: dbus::Error,
    },

    /// The alias is not bound to any collection.
    #[error("keyring collection alias '{0}' does not exist")]
    CollectionNotFound(String),

    /// A secret could not be encrypted for the session.
    #[cfg(feature = "crypto-rust")]
    #[error("cannot encrypt secret for Secret Service session: {0}")]
    Encryption(#[from] crate::crypto::Error),

    /// The keyring daemon's private interface is not reachable on the bus.
    #[error("cannot reach gnome-keyring on the session bus: {reason}")]
    BusUnavailable {
        reason: String,
        #[source]
        source: Option<dbus::Error>,
    },

    /// The daemon answered the password change with an error.
    #[error("cannot change keyring password: {message} ({name})")]
    RemoteCallFailed { name: String, message: String },
}

impl Error {
    /// Wrap a failed `ChangeWithMasterPassword` reply, keeping the name and
    /// message the daemon sent back.
    pub(crate) fn remote(err: dbus::Error) -> Self {
        Self::RemoteCallFailed {
            name: err.name().unwrap_or("unknown").to_string(),
            message: err.message().unwrap_or("no message").to_string(),
        }
    }

    /// The bus could not answer whether gnome-keyring is running.
    pub(crate) fn bus(err: dbus::Error) -> Self {
        Self::BusUnavailable {
            reason: err.message().unwrap_or("no reply from the bus").to_string(),
            source: Some(err),
        }
    }

    /// True for the one failure that leaves the keyring untouched because
    /// there is nothing to change.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CollectionNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn bus_failure_keeps_dbus_source() {
        let err = Error::bus(dbus::Error::new_custom(
            "org.freedesktop.DBus.Error.NoReply",
            "Did not receive a reply",
        ));
        assert_eq!(
            err.to_string(),
            "cannot reach gnome-keyring on the session bus: Did not receive a reply"
        );
        let source = err.source().expect("dbus error should be the source");
        assert!(source.to_string().contains("Did not receive a reply"));
    }

    #[test]
    fn missing_owner_has_no_source() {
        let err = Error::BusUnavailable {
            reason: "org.gnome.keyring is not running".to_string(),
            source: None,
        };
        assert!(err.source().is_none());
        assert!(!err.is_not_found());
    }
}
