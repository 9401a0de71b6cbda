/*!

The seam between the password changer and the keyring daemon.

[`Backend`] opens sessions, a [`ServiceSession`] resolves collections and
encodes secrets, and [`MasterPasswordInterface`] is the daemon's password
change call. The D-Bus implementation lives in [`crate::service`]; tests
plug in their own.

Acquired values release whatever they hold when dropped, so a failure at
any step gives back everything taken by the steps before it.

*/

use dbus::Path;

use crate::errors::Result;
use crate::secret::{EncodedSecret, PlaintextSecret};

pub trait Backend {
    type Session: ServiceSession;

    /// Open a transfer session with the Secret Service daemon.
    fn open_session(&self) -> Result<Self::Session>;
}

pub trait ServiceSession {
    type Interface<'a>: MasterPasswordInterface
    where
        Self: 'a;

    /// Look up the collection an alias points at. `Ok(None)` when the alias
    /// is unset.
    fn read_alias(&self, alias: &str) -> Result<Option<Path<'static>>>;

    /// Encode a secret for transfer within this session.
    fn encode(&self, secret: &PlaintextSecret) -> Result<EncodedSecret>;

    /// Attach to the daemon's private password-change interface.
    fn master_password_interface(&self) -> Result<Self::Interface<'_>>;
}

pub trait MasterPasswordInterface {
    /// Replace the master password of `collection`. `original` and `master`
    /// must have been encoded by the session this interface came from.
    fn change_with_master_password(
        &self,
        collection: &Path<'static>,
        original: &EncodedSecret,
        master: &EncodedSecret,
    ) -> Result<()>;
}
