use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    File,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_type: StoreType,
    pub store_file_path: String,
    pub sampler_command: Option<String>,
    pub clipboard_command: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            host: non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            store_type: match lookup("STORE_TYPE").as_deref() {
                Some("memory") => StoreType::Memory,
                _ => StoreType::File,
            },
            store_file_path: non_empty("STORE_FILE_PATH")
                .unwrap_or_else(|| "color-root.json".to_string()),
            // External picker, e.g. `hyprpicker` or `gpick -pso --no-newline`
            sampler_command: non_empty("SAMPLER_COMMAND"),
            clipboard_command: non_empty("CLIPBOARD_COMMAND"),
        }
    }
}
