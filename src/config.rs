use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub data_file: PathBuf,
    pub reminder_chat_id: i64,
    pub reminder_after_days: Option<i64>,
    pub track_payments: bool,
}

#[derive(Debug)]
pub struct ConfigError {
    pub missing_vars: Vec<String>,
    pub invalid_vars: Vec<(String, String)>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.missing_vars.is_empty() {
            writeln!(f, "Missing required environment variables:")?;
            for var in &self.missing_vars {
                writeln!(f, "  - {}", var)?;
            }
        }
        if !self.invalid_vars.is_empty() {
            writeln!(f, "Invalid environment variables:")?;
            for (var, err) in &self.invalid_vars {
                writeln!(f, "  - {}: {}", var, err)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

fn get_required(name: &str, missing: &mut Vec<String>) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(name.to_string());
            None
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        let bot_token = get_required("DELIVERY_BOT_TOKEN", &mut missing);
        let reminder_chat_id_str = get_required("DELIVERY_REMINDER_CHAT_ID", &mut missing);

        let reminder_chat_id = reminder_chat_id_str
            .as_ref()
            .and_then(|s| {
                s.parse::<i64>()
                    .map_err(|e| {
                        invalid.push(("DELIVERY_REMINDER_CHAT_ID".into(), e.to_string()));
                    })
                    .ok()
            })
            .unwrap_or(0);

        let data_file = env::var("DELIVERY_DATA_FILE")
            .unwrap_or_else(|_| "customers_data.json".into())
            .into();

        let reminder_after_days = match env::var("REMINDER_AFTER_DAYS") {
            Ok(s) if !s.is_empty() => match s.parse::<i64>() {
                Ok(days) if days > 0 => Some(days),
                Ok(_) => {
                    invalid.push(("REMINDER_AFTER_DAYS".into(), "must be positive".into()));
                    None
                }
                Err(e) => {
                    invalid.push(("REMINDER_AFTER_DAYS".into(), e.to_string()));
                    None
                }
            },
            _ => None,
        };

        let track_payments = matches!(
            env::var("TRACK_PAYMENTS").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );

        if !missing.is_empty() || !invalid.is_empty() {
            return Err(ConfigError {
                missing_vars: missing,
                invalid_vars: invalid,
            });
        }

        Ok(Self {
            bot_token: bot_token.unwrap(),
            data_file,
            reminder_chat_id,
            reminder_after_days,
            track_payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_lists_every_problem() {
        let err = ConfigError {
            missing_vars: vec!["DELIVERY_BOT_TOKEN".into(), "DELIVERY_REMINDER_CHAT_ID".into()],
            invalid_vars: vec![("REMINDER_AFTER_DAYS".into(), "must be positive".into())],
        };

        let rendered = err.to_string();
        assert!(rendered.contains("DELIVERY_BOT_TOKEN"));
        assert!(rendered.contains("DELIVERY_REMINDER_CHAT_ID"));
        assert!(rendered.contains("REMINDER_AFTER_DAYS: must be positive"));
    }

    #[test]
    fn test_from_env_collects_missing_and_invalid_together() {
        env::remove_var("DELIVERY_BOT_TOKEN");
        env::set_var("DELIVERY_REMINDER_CHAT_ID", "not-a-number");
        env::set_var("REMINDER_AFTER_DAYS", "-3");

        let err = AppConfig::from_env().unwrap_err();

        assert_eq!(err.missing_vars, vec!["DELIVERY_BOT_TOKEN".to_string()]);
        assert!(err
            .invalid_vars
            .iter()
            .any(|(var, _)| var == "DELIVERY_REMINDER_CHAT_ID"));
        assert!(err
            .invalid_vars
            .iter()
            .any(|(var, msg)| var == "REMINDER_AFTER_DAYS" && msg == "must be positive"));

        env::remove_var("DELIVERY_REMINDER_CHAT_ID");
        env::remove_var("REMINDER_AFTER_DAYS");
    }
}
