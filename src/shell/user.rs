//! Running commands as another account.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{GemsyncError, Result};

/// A local account looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub name: String,
    pub uid: u32,
    pub gid: u32,
    pub home: PathBuf,
}

/// Look up `name` in the system user database.
#[cfg(unix)]
pub fn lookup(name: &str) -> Result<UserAccount> {
    let unknown = || GemsyncError::ConfigValidationError {
        message: format!("Unknown user '{}'", name),
    };

    let user = nix::unistd::User::from_name(name)
        .map_err(|e| {
            tracing::debug!("User lookup for '{}' failed: {}", name, e);
            unknown()
        })?
        .ok_or_else(unknown)?;

    Ok(UserAccount {
        name: user.name,
        uid: user.uid.as_raw(),
        gid: user.gid.as_raw(),
        home: user.dir,
    })
}

#[cfg(not(unix))]
pub fn lookup(name: &str) -> Result<UserAccount> {
    Err(GemsyncError::ConfigValidationError {
        message: format!(
            "Running as user '{}' is only supported on Unix platforms",
            name
        ),
    })
}

/// Configure `cmd` to run as `account`.
#[cfg(unix)]
pub fn apply(cmd: &mut Command, account: &UserAccount) {
    use std::os::unix::process::CommandExt;

    cmd.uid(account.uid);
    cmd.gid(account.gid);
    cmd.env("HOME", &account.home);
    cmd.env("USER", &account.name);
    cmd.env("LOGNAME", &account.name);
}

#[cfg(not(unix))]
pub fn apply(_cmd: &mut Command, _account: &UserAccount) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn looks_up_root() {
        let account = lookup("root").unwrap();
        assert_eq!(account.uid, 0);
        assert_eq!(account.gid, 0);
        assert_eq!(account.name, "root");
        assert!(account.home.is_absolute());
    }

    #[test]
    fn unknown_user_is_a_validation_error() {
        let err = lookup("gemsync-no-such-user").unwrap_err();
        assert!(matches!(err, GemsyncError::ConfigValidationError { .. }));
        assert!(err.to_string().contains("gemsync-no-such-user"));
    }

    #[test]
    fn interior_nul_is_rejected() {
        assert!(lookup("bad\0name").is_err());
    }

    #[test]
    fn apply_sets_identity_env() {
        let account = UserAccount {
            name: "deploy".into(),
            uid: 1001,
            gid: 1001,
            home: PathBuf::from("/home/deploy"),
        };
        let mut cmd = Command::new("true");
        apply(&mut cmd, &account);

        let envs: Vec<_> = cmd
            .get_envs()
            .map(|(k, v)| (k.to_owned(), v.map(|v| v.to_owned())))
            .collect();
        assert!(envs.contains(&("HOME".into(), Some("/home/deploy".into()))));
        assert!(envs.contains(&("USER".into(), Some("deploy".into()))));
    }
}
