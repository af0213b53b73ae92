use std::ffi::OsString;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

const ENV_VARS: [&str; 5] = [
    "XDG_CONFIG_HOME",
    "LINKDROP_API_URL",
    "LINKDROP_API_TIMEOUT",
    "LINKDROP_UPLOAD_LIMIT",
    "LINKDROP_DOWNLOAD_POLICY",
];

struct EnvRestore {
    saved: Vec<(&'static str, Option<OsString>)>,
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain(..) {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Runs `f` with a temp config file and a clean LINKDROP_* environment.
/// Environment mutation is serialized across tests and restored on exit.
pub fn with_config_env(contents: &str, f: impl FnOnce()) {
    let _guard = match env_lock().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    let _restore = EnvRestore {
        saved: ENV_VARS
            .iter()
            .map(|name| (*name, std::env::var_os(name)))
            .collect(),
    };
    for name in ENV_VARS {
        std::env::remove_var(name);
    }

    let temp_dir = TempDir::new().expect("create temp dir");
    let app_config_dir = temp_dir.path().join("linkdrop");
    std::fs::create_dir_all(&app_config_dir).expect("create config dir");
    std::fs::write(app_config_dir.join("config.toml"), contents).expect("write config");
    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    f();
}
