//! Application settings loaded via OrthoConfig.
//!
//! Values come from `HOTEL_DESK_*` environment variables or the command line;
//! unset values fall back to the defaults documented on each accessor. The
//! session cookie toggles are read from the environment only, see
//! [`SessionToggles`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::Key;
use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;
use zeroize::Zeroize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
/// Shortest key material `Key::derive_from` accepts.
const SESSION_KEY_HARD_MIN_LEN: usize = 32;
const COOKIE_SECURE_ENV: &str = "HOTEL_DESK_COOKIE_SECURE";
const ALLOW_EPHEMERAL_ENV: &str = "HOTEL_DESK_SESSION_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for session key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to a temporary key.
    Debug,
    /// Release builds require a readable key of sufficient length.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
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

/// Errors raised while turning settings into runtime values.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// `api_base_url` is not an absolute URL.
    #[error("invalid api_base_url '{value}': {source}")]
    InvalidApiBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// `bind_addr` is not a socket address.
    #[error("invalid bind_addr '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short for the build mode.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// A boolean toggle holds an unrecognised value.
    #[error("invalid {name}='{value}', expected one of {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Session cookie toggles read from the environment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SessionToggles {
    /// Mark the session cookie `Secure`; defaults to `true`.
    pub cookie_secure: bool,
    /// Allow a temporary signing key when the key file is unreadable;
    /// defaults to `false`.
    pub allow_ephemeral: bool,
}

impl Default for SessionToggles {
    fn default() -> Self {
        Self {
            cookie_secure: true,
            allow_ephemeral: false,
        }
    }
}

impl SessionToggles {
    /// Read `HOTEL_DESK_COOKIE_SECURE` and `HOTEL_DESK_SESSION_ALLOW_EPHEMERAL`.
    ///
    /// Unset variables keep the defaults. Unrecognised values fall back to the
    /// default with a warning in debug builds.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidEnv`] for unrecognised values in
    /// release builds.
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Ok(Self {
            cookie_secure: bool_from_env(env, mode, COOKIE_SECURE_ENV, defaults.cookie_secure)?,
            allow_ephemeral: bool_from_env(
                env,
                mode,
                ALLOW_EPHEMERAL_ENV,
                defaults.allow_ephemeral,
            )?,
        })
    }
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SettingsError> {
    let Some(value) = env.string(name) else {
        return Ok(default);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(name, value = %value, default, "invalid boolean toggle; using default");
            Ok(default)
        }
        None => Err(SettingsError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Runtime configuration for the desk server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HOTEL_DESK")]
pub struct DeskSettings {
    /// Origin of the upstream REST API; in-memory resources are served when
    /// unset.
    pub api_base_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Per-request timeout for upstream calls, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Path of the cookie signing key.
    pub session_key_file: Option<PathBuf>,
}

impl DeskSettings {
    /// Parsed upstream origin, if configured.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidApiBaseUrl`] for malformed URLs.
    pub fn api_base_url(&self) -> Result<Option<Url>, SettingsError> {
        self.api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                Url::parse(raw).map_err(|source| SettingsError::InvalidApiBaseUrl {
                    value: raw.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] for malformed addresses.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Upstream request timeout; `None` waits indefinitely.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Path of the session key, falling back to the mounted secret.
    #[must_use]
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }

    /// Load the cookie signing key.
    ///
    /// Debug builds, or any build with `allow_ephemeral`, fall back to a
    /// generated key when the file cannot be read. A readable key needs at
    /// least 32 bytes, and 64 in release builds.
    ///
    /// # Errors
    /// Returns [`SettingsError::KeyRead`] or [`SettingsError::KeyTooShort`]
    /// when no usable key is available.
    pub fn session_key(&self, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SettingsError> {
        let path = self.session_key_file();
        match std::fs::read(&path) {
            Ok(mut bytes) => {
                let length = bytes.len();
                let min_len = match mode {
                    BuildMode::Debug => SESSION_KEY_HARD_MIN_LEN,
                    BuildMode::Release => SESSION_KEY_MIN_LEN,
                };
                if length < min_len {
                    bytes.zeroize();
                    return Err(SettingsError::KeyTooShort {
                        path,
                        length,
                        min_len,
                    });
                }
                let key = Key::derive_from(&bytes);
                bytes.zeroize();
                Ok(key)
            }
            Err(error) => {
                if mode.is_debug() || allow_ephemeral {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "using temporary session key (dev only)"
                    );
                    Ok(Key::generate())
                } else {
                    Err(SettingsError::KeyRead {
                        path,
                        source: error,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and session key loading.

    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::io::Write;

    use env_lock::lock_env;
    use mockable::MockEnv;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "HOTEL_DESK_API_BASE_URL",
        "HOTEL_DESK_BIND_ADDR",
        "HOTEL_DESK_REQUEST_TIMEOUT_SECS",
        "HOTEL_DESK_SESSION_KEY_FILE",
    ];

    fn load_from_empty_args() -> DeskSettings {
        DeskSettings::load_from_iter([OsString::from("hotel-desk")]).expect("config should load")
    }

    fn settings_with_key_file(path: PathBuf) -> DeskSettings {
        DeskSettings {
            api_base_url: None,
            bind_addr: None,
            request_timeout_secs: None,
            session_key_file: Some(path),
        }
    }

    fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn key_file(len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(&vec![b'k'; len]).expect("write key");
        file
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.api_base_url().expect("no url").is_none());
        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(settings.request_timeout().is_none());
        assert_eq!(
            settings.session_key_file(),
            PathBuf::from(SESSION_KEY_DEFAULT_PATH)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HOTEL_DESK_API_BASE_URL", Some("http://api.hotel.test:3000".to_owned())),
            ("HOTEL_DESK_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("HOTEL_DESK_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("HOTEL_DESK_SESSION_KEY_FILE", Some("/tmp/desk_key".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings
                .api_base_url()
                .expect("valid url")
                .map(|url| url.to_string()),
            Some("http://api.hotel.test:3000/".to_owned())
        );
        assert_eq!(
            settings.bind_addr().expect("addr").to_string(),
            "127.0.0.1:9000"
        );
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(settings.session_key_file(), PathBuf::from("/tmp/desk_key"));
    }

    #[rstest]
    #[case::debug(BuildMode::Debug)]
    #[case::release(BuildMode::Release)]
    fn toggles_default_to_secure_without_ephemeral(#[case] mode: BuildMode) {
        let toggles = SessionToggles::from_env(&mock_env(&[]), mode).expect("defaults");
        assert!(toggles.cookie_secure);
        assert!(!toggles.allow_ephemeral);
    }

    #[rstest]
    #[case::words("false", "true", false, true)]
    #[case::digits("0", "1", false, true)]
    #[case::short_forms("Y", "n", true, false)]
    fn toggles_follow_environment(
        #[case] secure: &str,
        #[case] ephemeral: &str,
        #[case] expect_secure: bool,
        #[case] expect_ephemeral: bool,
    ) {
        let env = mock_env(&[(COOKIE_SECURE_ENV, secure), (ALLOW_EPHEMERAL_ENV, ephemeral)]);
        let toggles = SessionToggles::from_env(&env, BuildMode::Release).expect("valid toggles");
        assert_eq!(toggles.cookie_secure, expect_secure);
        assert_eq!(toggles.allow_ephemeral, expect_ephemeral);
    }

    #[rstest]
    fn unrecognised_toggle_is_rejected_in_release_only() {
        let env = mock_env(&[(COOKIE_SECURE_ENV, "maybe")]);

        let err = SessionToggles::from_env(&env, BuildMode::Release).expect_err("invalid toggle");
        assert!(matches!(
            err,
            SettingsError::InvalidEnv { name: COOKIE_SECURE_ENV, .. }
        ));

        let toggles = SessionToggles::from_env(&env, BuildMode::Debug).expect("debug default");
        assert!(toggles.cookie_secure);
    }

    #[rstest]
    #[case::not_a_url("api.hotel.test")]
    #[case::relative("/api")]
    fn malformed_api_base_url_is_rejected(#[case] raw: &str) {
        let mut settings = settings_with_key_file(PathBuf::from("/nonexistent"));
        settings.api_base_url = Some(raw.to_owned());
        let err = settings.api_base_url().expect_err("invalid url");
        assert!(matches!(err, SettingsError::InvalidApiBaseUrl { .. }));
    }

    #[rstest]
    fn zero_timeout_means_no_timeout() {
        let mut settings = settings_with_key_file(PathBuf::from("/nonexistent"));
        settings.request_timeout_secs = Some(0);
        assert!(settings.request_timeout().is_none());
    }

    #[rstest]
    #[case::debug(BuildMode::Debug, false, true)]
    #[case::release_ephemeral(BuildMode::Release, true, true)]
    #[case::release_strict(BuildMode::Release, false, false)]
    fn missing_key_file_falls_back_only_when_allowed(
        #[case] mode: BuildMode,
        #[case] allow_ephemeral: bool,
        #[case] expect_key: bool,
    ) {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = settings_with_key_file(dir.path().join("missing"));
        let result = settings.session_key(mode, allow_ephemeral);
        assert_eq!(result.is_ok(), expect_key);
        if !expect_key {
            assert!(matches!(result, Err(SettingsError::KeyRead { .. })));
        }
    }

    #[rstest]
    #[case::debug(BuildMode::Debug, 32)]
    #[case::release(BuildMode::Release, 64)]
    fn short_key_is_rejected_in_every_mode(#[case] mode: BuildMode, #[case] min_len: usize) {
        let file = key_file(16);
        let settings = settings_with_key_file(file.path().to_path_buf());

        let err = settings.session_key(mode, true).err().expect("short key");
        assert!(matches!(
            err,
            SettingsError::KeyTooShort { length: 16, min_len: found, .. } if found == min_len
        ));
    }

    #[rstest]
    fn debug_accepts_keys_between_the_two_minimums() {
        let file = key_file(40);
        let settings = settings_with_key_file(file.path().to_path_buf());

        assert!(settings.session_key(BuildMode::Debug, false).is_ok());
        assert!(matches!(
            settings.session_key(BuildMode::Release, false),
            Err(SettingsError::KeyTooShort { length: 40, min_len: 64, .. })
        ));
    }

    #[rstest]
    fn long_key_derives_stable_key() {
        let file = key_file(64);
        let settings = settings_with_key_file(file.path().to_path_buf());

        let first = settings.session_key(BuildMode::Release, false).expect("key");
        let second = settings.session_key(BuildMode::Release, false).expect("key");
        assert_eq!(first.master(), second.master());
    }
}
