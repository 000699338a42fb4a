//! 配置文件管理模块

use crate::core::models::AppConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// 配置管理器
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// 获取默认配置路径
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "screener", "Screener")
            .map(|d| d.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// 加载配置，文件不存在时返回默认配置
    pub fn load(&self) -> Result<AppConfig> {
        if self.config_path.exists() {
            let content = std::fs::read_to_string(&self.config_path)
                .with_context(|| format!("读取配置失败: {}", self.config_path.display()))?;
            let config = serde_json::from_str(&content)
                .with_context(|| format!("配置格式错误: {}", self.config_path.display()))?;
            Ok(config)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// 保存配置
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("写入配置失败: {}", self.config_path.display()))?;
        tracing::info!("配置已保存: {}", self.config_path.display());
        Ok(())
    }

    /// 重置为默认配置
    pub fn reset(&self) -> Result<()> {
        self.save(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.json");

        let manager = ConfigManager::new(config_path);

        let mut config = AppConfig::default();
        config.export_file_name = "review.json".to_string();
        config.default_rules = vec!["Only RCTs?".to_string()];
        config.last_directory = Some(dir.path().to_path_buf());

        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("absent.json"));
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.export_file_name, "screening_data.json");
        assert_eq!(loaded.default_rules.len(), 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"pretty_export": false}"#).unwrap();

        let loaded = ConfigManager::new(path).load().unwrap();
        assert!(!loaded.pretty_export);
        assert_eq!(loaded.export_file_name, "screening_data.json");
    }

    #[test]
    fn test_reset() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));
        manager
            .save(&AppConfig {
                pretty_export: false,
                ..Default::default()
            })
            .unwrap();
        manager.reset().unwrap();
        assert_eq!(manager.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(ConfigManager::new(path).load().is_err());
    }
}
