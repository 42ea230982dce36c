use std::fmt::Display;

use anyhow::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Stage {
    #[default]
    Local,
    Development,
    Production,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            Stage::Local => "local",
            Stage::Development => "development",
            Stage::Production => "production",
        };
        write!(f, "{}", stage)
    }
}

impl Stage {
    pub fn try_from(stage: &str) -> Result<Self> {
        match stage {
            "local" => Ok(Stage::Local),
            "development" => Ok(Stage::Development),
            "production" => Ok(Stage::Production),
            _ => Err(anyhow::anyhow!("Invalid stage: {}", stage)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_stages() {
        assert_eq!(Stage::try_from("production").unwrap(), Stage::Production);
        assert_eq!(Stage::try_from("local").unwrap(), Stage::Local);
    }

    #[test]
    fn unknown_stage_falls_back_to_default() {
        assert!(Stage::try_from("staging").is_err());
        assert_eq!(Stage::try_from("").unwrap_or_default(), Stage::Local);
    }
}
