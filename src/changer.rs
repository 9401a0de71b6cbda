/*!

The master password change.

[`KeyringPasswordChanger`] runs the whole sequence for one change: open a
session, resolve the collection, encode both passwords, attach to the
daemon's interface and make the call. Nothing is cached between calls and
every value acquired along the way is dropped before the call returns,
whichever step fails.

*/

use tracing::{debug, info, instrument};

use crate::backend::{Backend, MasterPasswordInterface, ServiceSession};
use crate::errors::{Error, Result};
use crate::secret::PlaintextSecret;

#[derive(Debug)]
pub struct KeyringPasswordChanger<B> {
    backend: B,
    alias: String,
}

impl<B: Backend> KeyringPasswordChanger<B> {
    pub fn new(backend: B, alias: impl Into<String>) -> Self {
        Self {
            backend,
            alias: alias.into(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Change the collection's master password from `current` to `new`.
    ///
    /// Empty slices mean "no password" and go through the same sequence.
    #[instrument(skip_all, fields(alias = %self.alias, current_empty = current.is_empty(), new_empty = new.is_empty()))]
    pub fn change_password(&self, current: &[u8], new: &[u8]) -> Result<()> {
        let session = self.backend.open_session()?;

        let collection = session
            .read_alias(&self.alias)?
            .ok_or_else(|| Error::CollectionNotFound(self.alias.clone()))?;
        debug!(%collection, "found collection");

        let original = session.encode(&PlaintextSecret::new(current))?;
        let master = session.encode(&PlaintextSecret::new(new))?;

        let interface = session.master_password_interface()?;
        interface.change_with_master_password(&collection, &original, &master)?;

        info!(%collection, "keyring password changed");
        Ok(())
    }

    /// Remove the password: `current` becomes the empty password.
    pub fn clear_password(&self, current: &[u8]) -> Result<()> {
        info!("clearing keyring password");
        self.change_password(current, b"")
    }

    /// Set `new` on a keyring whose password is currently empty.
    pub fn restore_password(&self, new: &[u8]) -> Result<()> {
        info!("restoring keyring password");
        self.change_password(b"", new)
    }
}
