use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, io, path::PathBuf};
use validator::{Validate, ValidationError};

use crate::environment::Environment;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Validation errors: {0}")]
    ValidationError(String),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PlanFile {
    pub location: PathBuf,
}

/// One service to plan. Sizing and health-check defaults match the shared
/// Fargate pattern; entries only override what differs per service.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ServiceEntry {
    #[validate(required)]
    pub service_name: Option<String>,

    #[serde(default)]
    pub environment: Environment,

    #[validate(required)]
    pub hostname: Option<String>,

    pub arecord: Option<String>,

    #[validate(required)]
    pub image: Option<String>,

    #[serde(default = "default_container_name")]
    pub container_name: String,

    #[serde(default = "default_cpu")]
    pub cpu: u32,

    #[serde(default = "default_memory_limit_mib")]
    pub memory_limit_mib: u32,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_health_check_path")]
    pub health_check_path: String,

    #[serde(default = "default_health_check_grace_period")]
    pub health_check_grace_period: u32,

    #[serde(default = "default_deregistration_delay")]
    pub deregistration_delay: u32,

    #[serde(default = "default_desired_count")]
    pub desired_count: u32,

    #[serde(default)]
    pub container_environment: BTreeMap<String, String>,

    #[validate(custom = "validate_plan_file")]
    pub plan: PlanFile,
}

fn default_container_name() -> String {
    return String::from("app");
}

fn default_cpu() -> u32 {
    return 1024;
}

fn default_memory_limit_mib() -> u32 {
    return 2048;
}

fn default_port() -> u16 {
    return 80;
}

fn default_health_check_path() -> String {
    return String::from("/");
}

fn default_health_check_grace_period() -> u32 {
    return 240;
}

fn default_deregistration_delay() -> u32 {
    return 60;
}

fn default_desired_count() -> u32 {
    return 1;
}

type Config = Vec<ServiceEntry>;
pub fn parse(path: &PathBuf) -> Result<Config, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(raw_contents) => Ok(raw_contents),
        Err(error) => match error.kind() {
            io::ErrorKind::NotFound => Err(Error::FileNotFound(path.display().to_string())),
            _ => Err(Error::Unknown(error.to_string())),
        },
    }?;

    let config: Config = match serde_yaml::from_str(&contents) {
        Ok(data) => Ok(data),
        Err(error) => Err(Error::ParsingError(error.to_string())),
    }?;

    for service_entry in &config {
        match service_entry.validate() {
            Ok(_) => (),
            Err(error) => return Err(Error::ValidationError(error.to_string())),
        }
    }

    return Ok(config);
}

fn validate_plan_file(plan_file: &PlanFile) -> Result<(), ValidationError> {
    let file_extension = match plan_file.location.extension() {
        Some(extension) => extension,
        None => {
            return Err(ValidationError::new(
                "Unable to parse the extension of the plan file location",
            ))
        }
    };
    if file_extension != "json" {
        return Err(ValidationError::new(
            "The plan file location has to end with `.json`",
        ));
    }

    return Ok(());
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use super::parse;
    use super::Error;
    use crate::environment::Environment;
    use tempfile::tempdir;

    const MINIMAL_ENTRY: &str = "
- service_name: adminer-gbq
  hostname: adminer-g
  image: ghcr.io/takemi-ohama/adminer-bigquery:master-3431413
  plan:
    location: ./adminer-gbq.plan.json
";

    #[test]
    fn file_does_not_exist() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let result = parse(&file_path);
        assert_eq!(true, result.is_err());
        match result.err().unwrap() {
            Error::FileNotFound(_) => {}
            _ => panic!("Expected `FileNotFound` error"),
        }
    }

    #[test]
    fn file_wrong_format() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "Not yaml").unwrap();

        let result = parse(&file_path);
        assert_eq!(true, result.is_err());
        match result.err().unwrap() {
            Error::ParsingError(_) => {}
            _ => panic!("Expected `ParsingError` error"),
        }
    }

    #[test]
    fn file_missing_service_name() {
        let contents = "
- hostname: adminer-g
  image: ghcr.io/takemi-ohama/adminer-bigquery:master-3431413
  plan:
    location: ./adminer-gbq.plan.json
";

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{}", contents).unwrap();

        let result = parse(&file_path);
        assert_eq!(true, result.is_err());
        match result.err().unwrap() {
            Error::ValidationError(_) => {}
            _ => panic!("Expected `ValidationError` error"),
        }
    }

    #[test]
    fn rejects_a_non_json_plan_location() {
        let contents = "
- service_name: adminer-gbq
  hostname: adminer-g
  image: ghcr.io/takemi-ohama/adminer-bigquery:master-3431413
  plan:
    location: ./adminer-gbq.plan.yaml
";

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{}", contents).unwrap();

        let result = parse(&file_path);
        assert_eq!(true, result.is_err());
        match result.err().unwrap() {
            Error::ValidationError(_) => {}
            _ => panic!("Expected `ValidationError` error"),
        }
    }

    #[test]
    fn parses_the_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{}", MINIMAL_ENTRY).unwrap();

        let result = parse(&file_path);
        assert_eq!(false, result.is_err());
    }

    #[test]
    fn fills_in_the_pattern_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{}", MINIMAL_ENTRY).unwrap();

        let config = parse(&file_path).unwrap();
        let service_entry = config.first().unwrap();

        assert_eq!(Environment::Dev, service_entry.environment);
        assert_eq!("app", service_entry.container_name);
        assert_eq!(1024, service_entry.cpu);
        assert_eq!(2048, service_entry.memory_limit_mib);
        assert_eq!(80, service_entry.port);
        assert_eq!("/", service_entry.health_check_path);
        assert_eq!(240, service_entry.health_check_grace_period);
        assert_eq!(60, service_entry.deregistration_delay);
        assert_eq!(1, service_entry.desired_count);
        assert_eq!(true, service_entry.container_environment.is_empty());
        assert_eq!(None, service_entry.arecord);
    }
}
