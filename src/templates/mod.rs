pub mod lambda_function;
pub mod simple_instance;
pub mod simple_security_group;

use crate::domain::model::UserData;
use crate::domain::ports::TemplateRenderer;
use crate::utils::error::{DeployError, Result};

pub use lambda_function::LambdaFunctionTemplate;
pub use simple_instance::SimpleInstanceTemplate;
pub use simple_security_group::SimpleSecurityGroupTemplate;

/// 依名稱取得樣板
pub fn find(name: &str) -> Option<Box<dyn TemplateRenderer>> {
    match name {
        SimpleSecurityGroupTemplate::NAME => Some(Box::new(SimpleSecurityGroupTemplate)),
        LambdaFunctionTemplate::NAME => Some(Box::new(LambdaFunctionTemplate::default())),
        SimpleInstanceTemplate::NAME => Some(Box::new(SimpleInstanceTemplate)),
        _ => None,
    }
}

pub fn available() -> &'static [&'static str] {
    &[
        LambdaFunctionTemplate::NAME,
        SimpleInstanceTemplate::NAME,
        SimpleSecurityGroupTemplate::NAME,
    ]
}

pub(crate) fn required_str(template: &str, user_data: Option<&UserData>, key: &str) -> Result<String> {
    match user_data.and_then(|data| data.get(key)) {
        Some(serde_json::Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(serde_json::Value::String(_)) | None => Err(DeployError::ConfigError {
            message: format!("{}: user data '{}' is required", template, key),
        }),
        Some(other) => Err(DeployError::TemplateError {
            template: template.to_string(),
            message: format!("user data '{}' must be a string, got {}", key, other),
        }),
    }
}

pub(crate) fn optional_str(
    template: &str,
    user_data: Option<&UserData>,
    key: &str,
) -> Result<Option<String>> {
    match user_data.and_then(|data| data.get(key)) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(_) => required_str(template, user_data, key).map(Some),
    }
}

pub(crate) fn optional_port(
    template: &str,
    user_data: Option<&UserData>,
    key: &str,
) -> Result<Option<i32>> {
    let value = match user_data.and_then(|data| data.get(key)) {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(value) => value,
    };

    // Sceptre 的設定檔常把數字寫成字串
    let port = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match port {
        Some(port) if (-1..=65535).contains(&port) => Ok(Some(port as i32)),
        _ => Err(DeployError::TemplateError {
            template: template.to_string(),
            message: format!("user data '{}' is not a valid port: {}", key, value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_data(value: serde_json::Value) -> UserData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_find_known_templates() {
        for name in available() {
            let template = find(name).unwrap();
            assert_eq!(template.name(), *name);
        }
        assert!(find("hbase-emr").is_none());
    }

    #[test]
    fn test_required_str() {
        let data = user_data(json!({"VpcId": "vpc-1", "Empty": " ", "Port": 5432}));
        assert_eq!(required_str("t", Some(&data), "VpcId").unwrap(), "vpc-1");
        assert!(matches!(
            required_str("t", Some(&data), "Empty"),
            Err(DeployError::ConfigError { .. })
        ));
        assert!(matches!(
            required_str("t", None, "VpcId"),
            Err(DeployError::ConfigError { .. })
        ));
        assert!(matches!(
            required_str("t", Some(&data), "Port"),
            Err(DeployError::TemplateError { .. })
        ));
    }

    #[test]
    fn test_optional_port_accepts_numbers_and_strings() {
        let data = user_data(json!({"A": 5432, "B": "22", "C": "http", "D": 70000}));
        assert_eq!(optional_port("t", Some(&data), "A").unwrap(), Some(5432));
        assert_eq!(optional_port("t", Some(&data), "B").unwrap(), Some(22));
        assert_eq!(optional_port("t", Some(&data), "Missing").unwrap(), None);
        assert!(optional_port("t", Some(&data), "C").is_err());
        assert!(optional_port("t", Some(&data), "D").is_err());
    }
}
