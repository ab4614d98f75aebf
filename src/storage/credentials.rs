//! AWS credential lookup: environment first, then a shared credentials file.

use super::StorageError;
use std::{env, fmt, fs, path::Path};

#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            access_key: env::var("AWS_ACCESS_KEY_ID").ok()?,
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok()?,
            session_token: env::var("AWS_SESSION_TOKEN").ok(),
        })
    }

    /// Read `profile` from an INI-style credentials file.
    pub fn from_profile(path: &Path, profile: &str) -> Result<Self, StorageError> {
        let content =
            fs::read_to_string(path).map_err(|err| StorageError::Io(path.to_path_buf(), err))?;
        Self::parse_profile(&content, profile)
            .ok_or_else(|| StorageError::Credentials(profile.to_owned()))
    }

    /// Environment variables win over the credentials file.
    pub fn resolve(path: &Path, profile: &str) -> Result<Self, StorageError> {
        match Self::from_env() {
            Some(credentials) => Ok(credentials),
            None => Self::from_profile(path, profile),
        }
    }

    fn parse_profile(content: &str, profile: &str) -> Option<Self> {
        let mut in_profile = false;
        let (mut access_key, mut secret_key, mut session_token) = (None, None, None);

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_profile = section.trim() == profile;
                continue;
            }
            if !in_profile {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = Some(value.trim().to_owned());
            match key.trim() {
                "aws_access_key_id" => access_key = value,
                "aws_secret_access_key" => secret_key = value,
                "aws_session_token" => session_token = value,
                _ => {}
            }
        }

        Some(Self {
            access_key: access_key?,
            secret_key: secret_key?,
            session_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "
        [default]
        aws_access_key_id = DEFAULTKEY
        aws_secret_access_key = defaultsecret

        # personal account
        [personal]
        aws_access_key_id=PERSONALKEY
        aws_secret_access_key = personal/secret
        aws_session_token = tok
    ";

    #[test]
    fn test_parse_named_profile() {
        let credentials = Credentials::parse_profile(FILE, "personal").unwrap();
        assert_eq!(credentials.access_key, "PERSONALKEY");
        assert_eq!(credentials.secret_key, "personal/secret");
        assert_eq!(credentials.session_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_parse_default_profile() {
        let credentials = Credentials::parse_profile(FILE, "default").unwrap();
        assert_eq!(credentials.access_key, "DEFAULTKEY");
        assert_eq!(credentials.session_token, None);
    }

    #[test]
    fn test_missing_profile() {
        assert!(Credentials::parse_profile(FILE, "work").is_none());
    }

    #[test]
    fn test_from_profile_missing_file() {
        let err = Credentials::from_profile(Path::new("/nonexistent/credentials"), "x").unwrap_err();
        assert!(matches!(err, StorageError::Io(..)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials::parse_profile(FILE, "personal").unwrap();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("personal/secret"));
        assert!(!debug.contains("tok\""));
    }
}
