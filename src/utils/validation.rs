use crate::utils::error::{Result, TallyError};
use regex::Regex;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TallyError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TallyError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn matches(pattern: &str, value: &str) -> Result<bool> {
    let re = Regex::new(pattern).map_err(|e| TallyError::ConfigError {
        message: format!("invalid pattern {}: {}", pattern, e),
    })?;
    Ok(re.is_match(value))
}

/// 角色名稱與首領名稱只允許文字字元
pub fn validate_name(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if !matches(r"^\w+$", value)? {
        return Err(TallyError::ValidationError {
            message: format!("{} can only contain letters, got '{}'", field_name, value),
        });
    }
    Ok(())
}

/// 伺服器名稱：以單一空白或連字號分隔的單字
pub fn validate_realm(value: &str) -> Result<()> {
    validate_non_empty_string("realm", value)?;
    if !matches(r"^[A-Za-z0-9_']+([ -][A-Za-z0-9_']+)*$", value)? {
        return Err(TallyError::ValidationError {
            message: format!("Realm can only contain letters, got '{}'", value),
        });
    }
    Ok(())
}

pub fn validate_boss_id(value: &str) -> Result<u32> {
    if !matches(r"^\d+$", value)? {
        return Err(TallyError::ValidationError {
            message: format!("ID can only contain numbers, got '{}'", value),
        });
    }
    value.parse::<u32>().map_err(|e| TallyError::ValidationError {
        message: format!("ID '{}' is out of range: {}", value, e),
    })
}
