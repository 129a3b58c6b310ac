use hvac_client::Field;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub csv_path: PathBuf,
}

/// Thresholds for the temperature cleaning pass.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    pub min_temp_f: f64,
    pub max_temp_f: f64,
    pub max_daily_jump_f: f64,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        let temp = Field::Temp.descriptor();
        Self {
            min_temp_f: temp.min,
            max_temp_f: temp.max,
            max_daily_jump_f: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 70,
            right: 30,
            bottom: 40,
            left: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub transition_ms: u64,
    pub width: u32,
    pub height: u32,
    pub high_temp_f: f64,
    pub margin: Margin,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            transition_ms: 1250,
            width: 1200,
            height: 500,
            high_temp_f: 80.0,
            margin: Margin::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    pub http: Option<HttpConfig>,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("HVAC_CONFIG").unwrap_or_else(|_| "hvac-config.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let s = &self.sanitizer;
        if s.min_temp_f >= s.max_temp_f {
            anyhow::bail!("sanitizer.min_temp_f must be below sanitizer.max_temp_f");
        }
        if s.max_daily_jump_f <= 0.0 {
            anyhow::bail!("sanitizer.max_daily_jump_f must be positive");
        }

        let c = &self.chart;
        if c.margin.left + c.margin.right >= c.width || c.margin.top + c.margin.bottom >= c.height {
            anyhow::bail!("chart margins leave no content area");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [source]
            csv_path = "Sample_HVAC.csv"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.sanitizer, SanitizerConfig::default());
        assert_eq!(cfg.sanitizer.max_temp_f, 90.0);
        assert_eq!(cfg.sanitizer.max_daily_jump_f, 20.0);
        assert_eq!(cfg.chart.transition_ms, 1250);
        assert_eq!(cfg.chart.margin.left, 80);
        assert!(cfg.http.is_none());
        assert!(cfg.metrics.is_none());
    }

    #[test]
    fn thresholds_can_be_overridden() {
        let cfg = AppConfig::from_toml(
            r#"
            [source]
            csv_path = "data.csv"

            [sanitizer]
            max_temp_f = 94.0

            [chart.margin]
            top = 10

            [http]
            bind_addr = "127.0.0.1:8080"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.sanitizer.max_temp_f, 94.0);
        assert_eq!(cfg.sanitizer.min_temp_f, 1.0);
        assert_eq!(cfg.chart.margin.top, 10);
        assert_eq!(cfg.chart.margin.bottom, 40);
        assert_eq!(cfg.http.unwrap().bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn inverted_temperature_range_is_rejected() {
        let res = AppConfig::from_toml(
            r#"
            [source]
            csv_path = "data.csv"

            [sanitizer]
            min_temp_f = 95.0
            "#,
        );
        assert!(res.is_err());
    }
}
