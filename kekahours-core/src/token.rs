//! Access token resolution.
//!
//! The token is never obtained or refreshed here. It is read from the
//! environment or from a file the operator placed beforehand.

use crate::config::{AuthConfig, Config};
use std::path::Path;

/// Environment variable checked before any token file.
pub const TOKEN_ENV: &str = "KEKA_ACCESS_TOKEN";

/// Resolve the access token, if one is available.
///
/// Order: `KEKA_ACCESS_TOKEN`, then the configured token file (default
/// `~/.config/kekahours/access_token`). Surrounding whitespace is trimmed;
/// an empty value counts as absent.
pub fn read_access_token(auth: &AuthConfig) -> Option<String> {
    if let Ok(raw) = std::env::var(TOKEN_ENV) {
        let token = raw.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    let path = auth.token_file.clone().unwrap_or_else(Config::token_path);
    token_from_file(&path)
}

fn token_from_file(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let token = raw.trim();
    if token.is_empty() {
        tracing::debug!(path = %path.display(), "Token file exists but is empty");
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_token_from_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("access_token");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "  tok-abc123  ").unwrap();
        assert_eq!(token_from_file(&path), Some("tok-abc123".to_string()));

        let empty = dir.path().join("empty");
        std::fs::File::create(&empty).unwrap();
        assert_eq!(token_from_file(&empty), None);

        assert_eq!(token_from_file(&dir.path().join("missing")), None);
    }

    #[test]
    fn test_env_var_takes_precedence() {
        // Single test owns the env var so parallel tests cannot interleave
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access_token");
        std::fs::write(&path, "file-token").unwrap();
        let auth = AuthConfig {
            token_file: Some(path),
        };

        std::env::set_var(TOKEN_ENV, "env-token");
        assert_eq!(read_access_token(&auth), Some("env-token".to_string()));

        // Blank env value falls through to the file
        std::env::set_var(TOKEN_ENV, "   ");
        assert_eq!(read_access_token(&auth), Some("file-token".to_string()));

        std::env::remove_var(TOKEN_ENV);
        assert_eq!(read_access_token(&auth), Some("file-token".to_string()));
    }
}
