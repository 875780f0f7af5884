use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// Directory holding the built client bundle.
pub fn static_dir() -> PathBuf {
    std::env::var("STATIC_DIR")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DEFAULT_SERVER_PORT, DEFAULT_STATIC_DIR, server_port, static_dir};

    #[test]
    fn port_defaults_when_unset() {
        temp_env::with_var_unset("SERVER_PORT", || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
    }

    #[test]
    fn port_reads_env_override() {
        temp_env::with_var("SERVER_PORT", Some(" 8080 "), || {
            assert_eq!(server_port(), 8080);
        });
    }

    #[test]
    fn port_ignores_invalid_values() {
        for value in ["0", "-1", "http", "70000"] {
            temp_env::with_var("SERVER_PORT", Some(value), || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
            });
        }
    }

    #[test]
    fn static_dir_defaults_and_overrides() {
        temp_env::with_var_unset("STATIC_DIR", || {
            assert_eq!(static_dir(), PathBuf::from(DEFAULT_STATIC_DIR));
        });
        temp_env::with_var("STATIC_DIR", Some("  "), || {
            assert_eq!(static_dir(), PathBuf::from(DEFAULT_STATIC_DIR));
        });
        temp_env::with_var("STATIC_DIR", Some("/srv/regionmap"), || {
            assert_eq!(static_dir(), PathBuf::from("/srv/regionmap"));
        });
    }
}
