//! 설정 파일 관리.
//!
//! 플랫폼별 설정 디렉토리(또는 지정 경로)의 JSON 파일에서 설정을 로드한다.
//! 서비스 계정 키는 환경 변수로 덮어쓸 수 있다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 서비스 계정 키 JSON 환경 변수
pub const API_KEY_JSON_ENV: &str = "CLOUDMON_API_KEY_JSON";

/// 설정 관리자
///
/// 설정 파일의 로드/리로드를 관리한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 현재 설정 (스레드 안전)
    config: Arc<RwLock<AppConfig>>,
    /// 설정 파일 경로
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로로 설정 관리자 생성
    pub fn new() -> Result<Self, CoreError> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);
        Self::with_path(config_path)
    }

    /// 지정된 경로로 설정 관리자 생성
    ///
    /// 설정 파일이 없으면 기본 설정을 생성하고 저장한다.
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
                info!("설정 디렉토리 생성: {}", parent.display());
            }
        }

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = AppConfig::default_config();
            Self::save_to_file(&config_path, &default_config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            default_config
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        })
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// 설정 파일 경로 반환
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 설정 다시 로드
    pub fn reload(&self) -> Result<(), CoreError> {
        let mut config = Self::load_from_file(&self.config_path)?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        let mut current = match self.config.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = config;
        info!("설정 다시 로드 완료");
        Ok(())
    }

    /// 플랫폼별 설정 디렉토리 경로
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("net", "cloudmon", "cloudmon")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
    }

    /// 파일에서 설정 로드
    fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("설정 파일 파싱 실패: {}: {}", path.display(), e))
        })?;

        debug!("설정 파일 로드 완료: {}", path.display());
        Ok(config)
    }

    /// 파일에 설정 저장
    fn save_to_file(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(config)
            .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {}", e)))?;

        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("설정 파일 저장 실패: {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

/// 환경 변수 덮어쓰기 적용
fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key_json) = lookup(API_KEY_JSON_ENV).filter(|v| !v.trim().is_empty()) {
        debug!("{API_KEY_JSON_ENV} 환경 변수에서 서비스 계정 키 사용");
        config.secure.api_key_json = Some(key_json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_default_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.get().web.port, 3300);
        assert_eq!(manager.config_path(), config_path.as_path());
    }

    #[test]
    fn load_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"datasource":{"folderId":"b1gfolder","monitoringEndpoint":"monitoring.example"},"web":{"port":8080}}"#,
        )
        .unwrap();

        let config = ConfigManager::with_path(config_path).unwrap().get();
        assert_eq!(config.datasource.folder_id, "b1gfolder");
        assert_eq!(config.datasource.monitoring_endpoint, "monitoring.example");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.client.max_retries, 3);
    }

    #[test]
    fn reload_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::with_path(config_path.clone()).unwrap();

        let mut config = manager.get();
        config.datasource.folder_id = "reloaded".to_string();
        fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        manager.reload().unwrap();
        assert_eq!(manager.get().datasource.folder_id, "reloaded");
    }

    #[test]
    fn invalid_config_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, "not json").unwrap();

        let err = ConfigManager::with_path(config_path).unwrap_err();
        assert!(err.to_string().contains("설정 파일 파싱 실패"));
    }

    #[test]
    fn env_override_sets_key_json() {
        let mut config = AppConfig::default_config();
        apply_env_overrides(&mut config, |key| {
            (key == API_KEY_JSON_ENV).then(|| r#"{"id":"k"}"#.to_string())
        });
        assert_eq!(config.secure.api_key_json.as_deref(), Some(r#"{"id":"k"}"#));
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let mut config = AppConfig::default_config();
        config.secure.api_key_json = Some("from-file".to_string());
        apply_env_overrides(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.secure.api_key_json.as_deref(), Some("from-file"));
    }
}
