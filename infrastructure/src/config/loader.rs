//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, in lookup order
const PROJECT_FILES: [&str; 2] = ["courier.toml", ".courier.toml"];

/// Prefix for generic overrides, e.g. `COURIER_EXECUTION__MAX_CALLS_PER_TURN=4`
const ENV_PREFIX: &str = "COURIER_";

/// Conventional environment variables and the config keys they set
const ENV_KEYS: [(&str, &str); 6] = [
    ("JIRA_URL", "jira.url"),
    ("CONFLUENCE_URL", "confluence.url"),
    ("ATLASSIAN_EMAIL", "atlassian.email"),
    ("ATLASSIAN_TOKEN", "atlassian.token"),
    ("GITHUB_TOKEN", "github.token"),
    ("GITHUB_API_URL", "github.api_url"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment (`JIRA_URL`, ..., then `COURIER_<SECTION>__<KEY>`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./courier.toml` or `./.courier.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/agent-courier/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Self::file_figment(config_path);
        figment = figment
            .merge(Env::raw().only(&Self::env_names()).map(map_env_key))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration plus environment (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::raw().only(&Self::env_names()).map(map_env_key))
            .extract()
            .map_err(Box::new)
    }

    /// Load a single file on top of the defaults, ignoring the environment.
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(Box::new)
    }

    fn file_figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    fn env_names() -> Vec<&'static str> {
        ENV_KEYS.iter().map(|(name, _)| *name).collect()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/agent-courier/config.toml if set,
    /// otherwise falls back to ~/.config/agent-courier/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("agent-courier").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        for (name, _) in ENV_KEYS {
            let state = if std::env::var_os(name).is_some() {
                "[SET  ]"
            } else {
                "[     ]"
            };
            println!("  {} Env:     {}", state, name);
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./courier.toml or ./.courier.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

fn map_env_key(key: &UncasedStr) -> Uncased<'_> {
    ENV_KEYS
        .iter()
        .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
        .map(|(_, path)| Uncased::from(*path))
        .unwrap_or_else(|| key.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("agent-courier"));
    }

    #[test]
    fn test_map_env_key() {
        assert_eq!(map_env_key(UncasedStr::new("JIRA_URL")).as_str(), "jira.url");
        assert_eq!(map_env_key(UncasedStr::new("github_token")).as_str(), "github.token");
        assert_eq!(map_env_key(UncasedStr::new("OTHER")).as_str(), "OTHER");
    }

    #[test]
    fn test_load_file_merges_over_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[confluence]\nurl = \"https://wiki.example.com\"\n\n[execution]\nmax_calls_per_turn = 2"
        )
        .unwrap();

        let config = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(config.confluence.url.as_deref(), Some("https://wiki.example.com"));
        assert_eq!(config.execution.max_calls_per_turn, 2);
        assert_eq!(config.execution.http_timeout_seconds, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("courier.toml", "[jira]\nurl = \"https://file.example.com\"")?;
            jail.set_env("JIRA_URL", "https://env.example.com");
            jail.set_env("COURIER_EXECUTION__MAX_CALLS_PER_TURN", "3");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.jira.url.as_deref(), Some("https://env.example.com"));
            assert_eq!(config.execution.max_calls_per_turn, 3);
            Ok(())
        });
    }
}
