/*!

Secret Service access over D-Bus.

This module implements the [`Backend`] traits on top of a blocking
session-bus connection. One connection carries every call of a password
change: gnome-keyring only accepts secrets encoded for a session that
belongs to the caller, so the session, the alias lookup and the change
itself must all share it.

The password change goes through
`org.gnome.keyring.InternalUnsupportedGuiltRiddenInterface`, which is
private to gnome-keyring and may change or disappear in any release.

*/

use std::time::Duration;

use dbus::Path;
use dbus::arg::{RefArg, Variant};
use dbus::blocking::{Connection, Proxy};
use tracing::{debug, instrument, warn};

use crate::backend::{Backend, MasterPasswordInterface, ServiceSession};
use crate::config::Config;
use crate::errors::{Error, Result};
use crate::secret::{EncodedSecret, PlaintextSecret};
use crate::session::{Encoder, Handshake};

pub const SECRETS_DEST: &str = "org.freedesktop.secrets";
pub const SECRETS_PATH: &str = "/org/freedesktop/secrets";
pub const SERVICE_INTERFACE: &str = "org.freedesktop.Secret.Service";
pub const SESSION_INTERFACE: &str = "org.freedesktop.Secret.Session";

pub const KEYRING_DEST: &str = "org.gnome.keyring";
pub const KEYRING_INTERFACE: &str = "org.gnome.keyring.InternalUnsupportedGuiltRiddenInterface";

/// Timeout for the bookkeeping calls around the password change.
const SERVICE_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Clone, Debug, Default)]
pub struct DbusBackend {
    config: Config,
}

impl DbusBackend {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Backend for DbusBackend {
    type Session = DbusSession;

    #[instrument(skip_all, fields(algorithm = self.config.algorithm.as_ref()))]
    fn open_session(&self) -> Result<DbusSession> {
        let connection = Connection::new_session().map_err(Error::ServiceUnavailable)?;
        debug!(name = %connection.unique_name(), "connected to session bus");

        let handshake = Handshake::new(self.config.algorithm);
        let (output, path): (Variant<Box<dyn RefArg>>, Path<'static>) = connection
            .with_proxy(SECRETS_DEST, SECRETS_PATH, SERVICE_TIMEOUT)
            .method_call(
                SERVICE_INTERFACE,
                "OpenSession",
                (handshake.algorithm().as_ref(), handshake.input()),
            )
            .map_err(Error::ServiceUnavailable)?;
        debug!(%path, "opened Secret Service session");

        let encoder = match handshake.complete(&*output.0, path.clone()) {
            Ok(encoder) => encoder,
            Err(err) => {
                close_session(&connection, &path);
                return Err(err);
            }
        };

        Ok(DbusSession {
            connection,
            encoder,
            timeout: self.config.timeout,
        })
    }
}

/// An open Secret Service session and the connection that owns it.
///
/// Dropping it closes the session on the daemon before the connection goes.
pub struct DbusSession {
    connection: Connection,
    encoder: Encoder,
    timeout: Duration,
}

impl ServiceSession for DbusSession {
    type Interface<'a> = KeyringInterface<'a>;

    fn read_alias(&self, alias: &str) -> Result<Option<Path<'static>>> {
        let proxy = self
            .connection
            .with_proxy(SECRETS_DEST, SECRETS_PATH, SERVICE_TIMEOUT);
        let (path,): (Path<'static>,) = proxy
            .method_call(SERVICE_INTERFACE, "ReadAlias", (alias,))
            .map_err(|source| Error::CollectionUnavailable {
                alias: alias.to_string(),
                source,
            })?;
        debug!(alias, %path, "resolved collection alias");

        if &*path == "/" {
            Ok(None)
        } else {
            Ok(Some(path))
        }
    }

    fn encode(&self, secret: &PlaintextSecret) -> Result<EncodedSecret> {
        self.encoder.encode(secret)
    }

    fn master_password_interface(&self) -> Result<KeyringInterface<'_>> {
        let bus = self.connection.with_proxy(
            "org.freedesktop.DBus",
            "/org/freedesktop/DBus",
            SERVICE_TIMEOUT,
        );
        let (owned,): (bool,) = bus
            .method_call("org.freedesktop.DBus", "NameHasOwner", (KEYRING_DEST,))
            .map_err(Error::bus)?;
        if !owned {
            return Err(Error::BusUnavailable {
                reason: format!("{KEYRING_DEST} is not running"),
                source: None,
            });
        }

        Ok(KeyringInterface {
            proxy: self
                .connection
                .with_proxy(KEYRING_DEST, SECRETS_PATH, self.timeout),
        })
    }
}

impl Drop for DbusSession {
    fn drop(&mut self) {
        close_session(&self.connection, self.encoder.path());
    }
}

fn close_session(connection: &Connection, path: &Path<'static>) {
    let proxy = connection.with_proxy(SECRETS_DEST, path, SERVICE_TIMEOUT);
    match proxy.method_call::<(), _, _, _>(SESSION_INTERFACE, "Close", ()) {
        Ok(()) => debug!(%path, "closed Secret Service session"),
        Err(err) => warn!(%path, %err, "cannot close Secret Service session"),
    }
}

/// gnome-keyring's private password-change interface.
pub struct KeyringInterface<'a> {
    proxy: Proxy<'a, &'a Connection>,
}

impl MasterPasswordInterface for KeyringInterface<'_> {
    fn change_with_master_password(
        &self,
        collection: &Path<'static>,
        original: &EncodedSecret,
        master: &EncodedSecret,
    ) -> Result<()> {
        debug!(%collection, timeout = ?self.proxy.timeout, "calling ChangeWithMasterPassword");
        self.proxy
            .method_call::<(), _, _, _>(
                KEYRING_INTERFACE,
                "ChangeWithMasterPassword",
                (collection.clone(), original.to_dbus(), master.to_dbus()),
            )
            .map_err(Error::remote)
    }
}
