use indexmap::IndexMap;
use serde::Deserialize;

/// Environment variable holding the path of the settings file.
pub const CONFIG_FILE_ENV_VAR: &str = "DAZZLER_CONFIG";

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "DAZZLER";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_quantumleap_base_url")]
    pub quantumleap_base_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Dashboards to mount, per tenant, in file order.
    #[serde(default)]
    pub boards: IndexMap<String, Vec<BoardAssembly>>,
}

/// How to assemble one dashboard for a tenant.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardAssembly {
    /// Name of a builder in the board catalog.
    pub builder: String,
    pub service_path: Option<String>,
    pub board_path: Option<String>,
}

impl BoardAssembly {
    pub fn new(builder: &str) -> Self {
        Self {
            builder: builder.to_string(),
            service_path: None,
            board_path: None,
        }
    }

    pub fn with_service_path(mut self, service_path: &str) -> Self {
        self.service_path = Some(service_path.to_string());
        self
    }

    pub fn with_board_path(mut self, board_path: &str) -> Self {
        self.board_path = Some(board_path.to_string());
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quantumleap_base_url: default_quantumleap_base_url(),
            bind_address: default_bind_address(),
            boards: IndexMap::new(),
        }
    }
}

fn default_quantumleap_base_url() -> String {
    "http://quantumleap:8668".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

/// Load settings from the file `DAZZLER_CONFIG` points to, if any, then
/// apply `DAZZLER_*` environment overrides.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut builder = config::Config::builder();
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV_VAR) {
        tracing::info!("Loading settings from {}", path);
        builder = builder.add_source(config::File::with_name(&path));
    }

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from_yaml(yaml: &str) -> anyhow::Result<Settings> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let settings = settings_from_yaml("bind_address: \"127.0.0.1:9000\"\n").unwrap();

        assert_eq!(settings.quantumleap_base_url, "http://quantumleap:8668");
        assert_eq!(settings.bind_address, "127.0.0.1:9000");
        assert!(settings.boards.is_empty());
    }

    #[test]
    fn test_quantumleap_url_only() {
        let settings = settings_from_yaml("quantumleap_base_url: http://ql/\n").unwrap();

        assert_eq!(settings.quantumleap_base_url, "http://ql/");
        assert_eq!(settings.boards, Settings::default().boards);
    }

    #[test]
    fn test_boards() {
        let yaml = r#"
boards:
  t1:
    - builder: roughnator
    - builder: inspection_demo
      board_path: b2
  t2:
    - builder: roughnator
      service_path: /sp
      board_path: /b1
"#;
        let settings = settings_from_yaml(yaml).unwrap();

        assert_eq!(settings.quantumleap_base_url, Settings::default().quantumleap_base_url);
        assert_eq!(settings.boards.len(), 2);

        let t1 = &settings.boards["t1"];
        assert_eq!(t1.len(), 2);
        assert_eq!(t1[0], BoardAssembly::new("roughnator"));
        assert_eq!(t1[1], BoardAssembly::new("inspection_demo").with_board_path("b2"));

        let t2 = &settings.boards["t2"];
        assert_eq!(
            t2,
            &vec![BoardAssembly::new("roughnator")
                .with_service_path("/sp")
                .with_board_path("/b1")]
        );
    }

    #[test]
    fn test_tenants_keep_file_order() {
        let yaml = r#"
boards:
  zeta:
    - builder: roughnator
  alpha:
    - builder: inspection_demo
      service_path: /a
  mid:
    - builder: raw_material
"#;
        let settings = settings_from_yaml(yaml).unwrap();

        let tenants: Vec<&str> = settings.boards.keys().map(String::as_str).collect();
        assert_eq!(tenants, vec!["zeta", "alpha", "mid"]);
        assert_eq!(settings.boards["alpha"][0].service_path.as_deref(), Some("/a"));
    }
}
