use crate::domain::model::UserData;
use crate::templates;
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sceptre 風格的堆疊設定檔：選擇樣板並提供 user data
///
/// ```toml
/// template = "simple-security-group"
/// stack_name = "database-access"
///
/// [user_data]
/// VpcId = "${VPC_ID}"
/// SecurityGroupDescription = "PostgreSQL from home"
/// SecurityGroupName = "PostgresAccess"
/// PostgreSQLPort = 5432
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConfig {
    pub template: String,
    pub stack_name: Option<String>,
    #[serde(default)]
    pub user_data: toml::Table,
}

impl StackConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DeployError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DeployError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VPC_ID})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;

        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DeployError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// TOML table 轉成樣板用的 JSON user data
    pub fn user_data(&self) -> Result<UserData> {
        let value = serde_json::to_value(&self.user_data)?;
        match value {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(DeployError::ConfigValidationError {
                field: "user_data".to_string(),
                message: "user_data must be a table".to_string(),
            }),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("template", &self.template)?;

        if templates::find(&self.template).is_none() {
            return Err(DeployError::InvalidConfigValueError {
                field: "template".to_string(),
                value: self.template.clone(),
                reason: format!(
                    "Unknown template. Available: {}",
                    templates::available().join(", ")
                ),
            });
        }

        if let Some(stack_name) = &self.stack_name {
            crate::utils::validation::validate_stack_identifier("stack_name", stack_name)?;
        }

        // 未替換的 ${VAR} 代表環境變數沒有設定
        for (key, value) in &self.user_data {
            if let Some(text) = value.as_str() {
                if text.starts_with("${") && text.ends_with('}') {
                    return Err(DeployError::MissingConfigError {
                        field: format!("user_data.{} ({})", key, text),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Validate for StackConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_stack_config() {
        let toml_content = r#"
template = "simple-security-group"
stack_name = "database-access"

[user_data]
VpcId = "vpc-1"
SecurityGroupDescription = "test"
SecurityGroupName = "PostgresAccess"
PostgreSQLPort = 5432
"#;

        let config = StackConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.template, "simple-security-group");
        assert_eq!(config.stack_name.as_deref(), Some("database-access"));
        assert!(config.validate().is_ok());

        let user_data = config.user_data().unwrap();
        assert_eq!(user_data["VpcId"], "vpc-1");
        assert_eq!(user_data["PostgreSQLPort"], 5432);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STACKSMITH_TEST_VPC_ID", "vpc-0abc");

        let toml_content = r#"
template = "simple-security-group"

[user_data]
VpcId = "${STACKSMITH_TEST_VPC_ID}"
"#;

        let config = StackConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.user_data["VpcId"].as_str(), Some("vpc-0abc"));

        std::env::remove_var("STACKSMITH_TEST_VPC_ID");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
template = "simple-security-group"

[user_data]
VpcId = "${STACKSMITH_TEST_UNSET_VARIABLE}"
"#;

        let config = StackConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(DeployError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unknown_template_rejected() {
        let config = StackConfig::from_toml_str("template = \"hbase-emr\"").unwrap();
        assert!(matches!(
            config.validate(),
            Err(DeployError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"template = \"simple-instance\"\n\n[user_data]\nSshCidr = \"203.0.113.10/32\"\n")
            .unwrap();

        let config = StackConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.template, "simple-instance");
        assert!(config.user_data().unwrap().contains_key("SshCidr"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            StackConfig::from_toml_str("template = "),
            Err(DeployError::ConfigValidationError { .. })
        ));
    }
}
