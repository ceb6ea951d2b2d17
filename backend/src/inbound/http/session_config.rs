//! Session cookie settings validation.
//!
//! Release builds refuse weak or missing keys, cookies without `Secure`
//! (unless explicitly allowed) and insecure `SameSite=None` cookies; debug
//! builds log a warning and fall back to safe defaults.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_MIN_LEN: usize = 64;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as loaded from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SessionToggles<'a> {
    pub key_file: &'a Path,
    pub cookie_secure: bool,
    pub same_site: Option<&'a str>,
    pub allow_ephemeral: bool,
    /// Permit `cookie_secure == false` in release builds, e.g. behind a
    /// TLS-terminating proxy on a private network.
    pub allow_insecure_cookie: bool,
}

/// Validated session settings.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid session SameSite value '{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session cookies must be secure in release builds")]
    InsecureCookie,
    #[error("SameSite=None requires secure session cookies")]
    InsecureSameSiteNone,
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Validate `toggles` for `mode`.
///
/// # Errors
/// Returns [`SessionConfigError`] when a release build is misconfigured or
/// the `SameSite` value cannot be parsed.
pub fn session_settings(
    toggles: SessionToggles<'_>,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if toggles.allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    if !toggles.cookie_secure {
        if !mode.is_debug() && !toggles.allow_insecure_cookie {
            return Err(SessionConfigError::InsecureCookie);
        }
        warn!("session cookies are sent without the Secure attribute");
    }
    let same_site = parse_same_site(toggles.same_site, toggles.cookie_secure, mode)?;
    let key = load_key(toggles.key_file, mode, toggles.allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure: toggles.cookie_secure,
        same_site,
    })
}

fn parse_same_site(
    value: Option<&str>,
    cookie_secure: bool,
    mode: BuildMode,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = value else {
        return Ok(if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        });
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SameSite=None without secure cookies; browsers may reject the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ => Err(SessionConfigError::InvalidSameSite {
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn load_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct KeyFile(PathBuf);

    impl KeyFile {
        fn with_len(len: usize) -> Self {
            let path = std::env::temp_dir().join(format!("descarte_key_{}", uuid::Uuid::new_v4()));
            std::fs::write(&path, vec![b'k'; len]).expect("write key file");
            Self(path)
        }
    }

    impl Drop for KeyFile {
        fn drop(&mut self) {
            std::fs::remove_file(&self.0).ok();
        }
    }

    fn toggles(path: &Path) -> SessionToggles<'_> {
        SessionToggles {
            key_file: path,
            cookie_secure: true,
            same_site: None,
            allow_ephemeral: false,
            allow_insecure_cookie: false,
        }
    }

    #[rstest]
    #[case(BuildMode::Debug, SameSite::Lax)]
    #[case(BuildMode::Release, SameSite::Strict)]
    fn defaults_same_site_by_mode(#[case] mode: BuildMode, #[case] expected: SameSite) {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let settings = session_settings(toggles(&key.0), mode).expect("valid settings");
        assert_eq!(settings.same_site, expected);
        assert!(settings.cookie_secure);
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let key = KeyFile::with_len(16);
        let err = session_settings(toggles(&key.0), BuildMode::Release)
            .err()
            .expect("short key rejected");
        assert!(matches!(err, SessionConfigError::KeyTooShort { length: 16, .. }));
    }

    #[rstest]
    fn missing_key_is_fatal_only_in_release() {
        let path = std::env::temp_dir().join("descarte_missing_session_key");
        assert!(session_settings(toggles(&path), BuildMode::Debug).is_ok());
        let err = session_settings(toggles(&path), BuildMode::Release)
            .err()
            .expect("missing key rejected");
        assert!(matches!(err, SessionConfigError::KeyRead { .. }));
    }

    #[rstest]
    fn release_refuses_ephemeral_keys() {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let mut raw = toggles(&key.0);
        raw.allow_ephemeral = true;
        let err = session_settings(raw, BuildMode::Release)
            .err()
            .expect("ephemeral rejected");
        assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
    }

    #[rstest]
    #[case(BuildMode::Release, false, false)]
    #[case(BuildMode::Release, true, true)]
    #[case(BuildMode::Debug, false, true)]
    fn insecure_cookies_need_an_override_in_release(
        #[case] mode: BuildMode,
        #[case] allow_insecure_cookie: bool,
        #[case] accepted: bool,
    ) {
        let key = KeyFile::with_len(SESSION_KEY_MIN_LEN);
        let mut raw = toggles(&key.0);
        raw.cookie_secure = false;
        raw.allow_insecure_cookie = allow_insecure_cookie;
        let result = session_settings(raw, mode);
        assert_eq!(result.is_ok(), accepted);
        if let Err(err) = result {
            assert!(matches!(err, SessionConfigError::InsecureCookie));
        }
    }

    #[rstest]
    #[case(Some("none"), false, BuildMode::Release, false)]
    #[case(Some("none"), false, BuildMode::Debug, true)]
    #[case(Some("none"), true, BuildMode::Release, true)]
    #[case(Some("STRICT"), false, BuildMode::Release, true)]
    #[case(Some("sideways"), true, BuildMode::Debug, false)]
    fn validates_same_site(
        #[case] value: Option<&str>,
        #[case] secure: bool,
        #[case] mode: BuildMode,
        #[case] accepted: bool,
    ) {
        assert_eq!(parse_same_site(value, secure, mode).is_ok(), accepted);
    }
}
