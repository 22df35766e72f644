use std::env;
use std::path::PathBuf;

pub const STATE_DIR_ENV: &str = "VIABILITY_STATE_DIR";
pub const STATE_DIR_NAME: &str = "viability";

/// State directory, in precedence order: explicit override, the
/// `VIABILITY_STATE_DIR` environment variable, the platform-local data
/// directory, a dot directory under the working directory.
#[must_use]
pub fn resolve_state_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Ok(dir) = env::var(STATE_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_local_dir()
        .map(|base| base.join(STATE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{STATE_DIR_NAME}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let dir = resolve_state_dir(Some(PathBuf::from("/tmp/custom-state")));
        assert_eq!(dir, PathBuf::from("/tmp/custom-state"));
    }
}
