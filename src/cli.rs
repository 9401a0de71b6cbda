/*!

Command line front end.

```text
gnome-keyring-master-password <MODE> [PASSWORD]
```

Mode `0` clears the password (PASSWORD is the current one), mode `1`
restores it (PASSWORD is the new one). A missing PASSWORD is the empty
password. The exit code is 0 on success and 1 on any failure, including
bad arguments.

*/

use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use zeroize::Zeroizing;

use crate::backend::Backend;
use crate::changer::KeyringPasswordChanger;
use crate::config::{Config, DEFAULT_ALIAS};
use crate::session::Algorithm;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "gnome-keyring-master-password")]
#[command(version)]
#[command(about = "Clear or restore the GNOME keyring master password")]
#[command(long_about = "Clear or restore the GNOME keyring master password.\n\n\
    The change goes through gnome-keyring's private \
    InternalUnsupportedGuiltRiddenInterface, which is not a stable API and \
    may break with any gnome-keyring release.\n\n\
    Examples:\n  \
    gnome-keyring-master-password 0 mypassword    # clear, needs the current password\n  \
    gnome-keyring-master-password 1 newpassword   # restore, sets a new password")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// 0 clears the password, 1 restores it
    #[arg(value_parser = clap::value_parser!(i64), allow_negative_numbers = true)]
    pub mode: i64,

    /// Current password when clearing, new password when restoring
    #[arg(value_parser = clap::value_parser!(OsString), allow_hyphen_values = true)]
    pub password: Option<OsString>,

    /// Alias of the collection to change
    #[arg(long, default_value = DEFAULT_ALIAS)]
    pub alias: String,

    /// Send passwords unencrypted within the session
    #[arg(long)]
    pub plain: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        let config = Config::default().with_alias(self.alias.clone());
        if self.plain {
            config.with_algorithm(Algorithm::Plain)
        } else {
            config
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Clear,
    Restore,
}

impl TryFrom<i64> for Mode {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, i64> {
        match value {
            0 => Ok(Self::Clear),
            1 => Ok(Self::Restore),
            other => Err(other),
        }
    }
}

/// Parse `args`, build a backend for the resulting configuration and run the
/// requested mode. Returns the process exit code.
pub fn run<I, T, B, F>(args: I, connect: F) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: Backend,
    F: FnOnce(Config) -> B,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
                _ => EXIT_FAILURE,
            };
        }
    };

    let mode = match Mode::try_from(cli.mode) {
        Ok(mode) => mode,
        Err(other) => {
            eprintln!("error: invalid mode '{other}': use 0 (clear) or 1 (restore)");
            eprintln!();
            let _ = Cli::command().print_help();
            return EXIT_FAILURE;
        }
    };

    let config = cli.config();
    let password = match cli.password {
        Some(password) => Zeroizing::new(password.into_vec()),
        None => {
            println!("note: no password given, using the empty password");
            Zeroizing::new(Vec::new())
        }
    };

    let changer = KeyringPasswordChanger::new(connect(config.clone()), config.alias);
    if execute(&changer, mode, &password) {
        println!();
        println!("Done.");
        EXIT_SUCCESS
    } else {
        eprintln!();
        eprintln!("Failed.");
        EXIT_FAILURE
    }
}

fn execute<B: Backend>(changer: &KeyringPasswordChanger<B>, mode: Mode, password: &[u8]) -> bool {
    let empty: &[u8] = &[];
    let (current, new) = match mode {
        Mode::Clear => {
            println!("=== Clearing keyring password ===");
            (password, empty)
        }
        Mode::Restore => {
            println!("=== Restoring keyring password ===");
            (empty, password)
        }
    };
    println!("Changing password of collection '{}'...", changer.alias());
    println!("current password: {}", mask(current));
    println!("new password: {}", mask(new));

    let result = match mode {
        Mode::Clear => changer.clear_password(current),
        Mode::Restore => changer.restore_password(new),
    };
    match result {
        Ok(()) => {
            println!("Keyring password changed.");
            true
        }
        Err(err) if err.is_not_found() => {
            println!("note: {err}");
            false
        }
        Err(err) => {
            eprintln!("error: {err}");
            false
        }
    }
}

fn mask(password: &[u8]) -> &'static str {
    if password.is_empty() { "[empty]" } else { "***" }
}
