/*!

# GNOME keyring master password changer

This crate changes the master password of a GNOME keyring collection
through the Secret Service running on the session bus. It is a client of a
single daemon method,
`org.gnome.keyring.InternalUnsupportedGuiltRiddenInterface.ChangeWithMasterPassword`,
which takes the collection path and two secrets (the current password and
the new one).

## Stability

That interface is private to gnome-keyring. Its name says as much: it is
unsupported, undocumented, and may change or vanish in any release. Other
Secret Service providers (KeePassXC, KWallet) do not implement it; against
them the change fails with [`Error::BusUnavailable`].

## Steps

A change runs through these steps, and an [`Error`] names the one that failed:

1. open a Secret Service session ([`Error::ServiceUnavailable`]);
2. resolve the collection alias, `default` unless configured
   ([`Error::CollectionUnavailable`], [`Error::CollectionNotFound`]);
3. encode both passwords for the session, encrypted with the
   `dh-ietf1024-sha256-aes128-cbc-pkcs7` algorithm when the `crypto-rust`
   feature is on (the default);
4. attach to gnome-keyring's interface ([`Error::BusUnavailable`]);
5. call `ChangeWithMasterPassword` ([`Error::RemoteCallFailed`]).

Everything acquired is released when the call returns, on success and on
failure. There is no retry.

## Empty passwords

An empty password is a valid value and means "no password".
[`KeyringPasswordChanger::clear_password`] changes to it and
[`KeyringPasswordChanger::restore_password`] changes away from it. An
unprotected keyring stores its secrets unencrypted on disk.

## Headless usage

The daemon may ask to unlock the collection or confirm the change with a
prompt. On a headless box there is nobody to answer it, and the call then
waits; the default timeout is the longest libdbus allows.

 */

mod backend;
pub mod changer;
pub mod cli;
pub mod config;
#[cfg(feature = "crypto-rust")]
pub mod crypto;
pub mod errors;
pub mod secret;
pub mod service;
pub mod session;

pub use backend::{Backend, MasterPasswordInterface, ServiceSession};
pub use changer::KeyringPasswordChanger;
pub use config::Config;
pub use errors::{Error, Result};
