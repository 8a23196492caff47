use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

/// Layered configuration: built-in defaults, overridden by `.svizrc`,
/// overridden by environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .svizrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self {
            inner: map,
            config_path,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.parse::<f32>().ok())
    }

    /// Base address of the visualization service, without trailing slash.
    pub fn backend_url(&self) -> String {
        let url = self
            .get("VIZ_BACKEND_URL")
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.get_u64("VIZ_REQUEST_TIMEOUT").unwrap_or(60)
    }

    pub fn split_ratio(&self) -> f32 {
        self.get_f32("VIZ_SPLIT_RATIO").unwrap_or(45.0)
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "VIZ_BACKEND_URL",
        "VIZ_REQUEST_TIMEOUT",
        "VIZ_DEFAULT_LANGUAGE",
        "VIZ_DEFAULT_TYPE",
        "VIZ_SPLIT_RATIO",
    ];

    KEYS.contains(&k) || k.starts_with("VIZ_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("sviz").join(".svizrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("VIZ_BACKEND_URL".into(), "http://localhost:8000".into());
    m.insert("VIZ_REQUEST_TIMEOUT".into(), "60".into());
    m.insert("VIZ_DEFAULT_LANGUAGE".into(), "python".into());
    m.insert("VIZ_DEFAULT_TYPE".into(), "static".into());
    m.insert("VIZ_SPLIT_RATIO".into(), "45".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rc_file_lives_under_the_sviz_config_dir() {
        let path = default_config_path();
        assert!(path.ends_with("sviz/.svizrc"));
    }

    #[test]
    fn load_records_the_rc_path() {
        let cfg = Config::load();
        assert_eq!(cfg.config_path.file_name().unwrap(), ".svizrc");
    }

    #[test]
    fn defaults_cover_every_known_key() {
        let m = default_map();
        for key in [
            "VIZ_BACKEND_URL",
            "VIZ_REQUEST_TIMEOUT",
            "VIZ_DEFAULT_LANGUAGE",
            "VIZ_DEFAULT_TYPE",
            "VIZ_SPLIT_RATIO",
        ] {
            assert!(m.contains_key(key), "{key}");
            assert!(is_config_key(key), "{key}");
        }
    }
}
