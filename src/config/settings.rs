use serde::Deserialize;

pub const DEFAULT_GRAPHS_DIR: &str = "Graphs";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_graphs_dir")]
    pub graphs_dir: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_echo")]
    pub echo: bool,
    #[serde(default)]
    pub strict: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            graphs_dir: default_graphs_dir(),
            format: default_format(),
            echo: default_echo(),
            strict: false,
        }
    }
}

fn default_graphs_dir() -> String {
    DEFAULT_GRAPHS_DIR.to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_echo() -> bool {
    true
}
