use aws_sdk_ssm::types::SdkError;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Parameter {0} has no value")]
    MissingValue(String),

    #[error("Service error occurred: {0}.")]
    ServiceError(String),

    #[error("Unknown error occurred: {0}.")]
    UnknownError(String),
}

pub struct ParameterStore {
    client: aws_sdk_ssm::Client,
}

impl ParameterStore {
    pub fn new(sdk_config: &aws_types::SdkConfig) -> Self {
        let client = aws_sdk_ssm::Client::new(sdk_config);

        return Self { client };
    }

    /// Resolves a shared-resource ARN stored under a well-known parameter
    /// name. A parameter that does not exist yet resolves to the
    /// `dummy-value-for-<name>` placeholder, so a bootstrap run can plan the
    /// first rule before the listener has been provisioned.
    pub async fn resolve(&self, name: &str) -> Result<String, Error> {
        let result = self.client.get_parameter().name(name).send().await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError { err, .. }) => {
                if err.is_parameter_not_found() {
                    tracing::warn!(parameter = name, "parameter not found, using placeholder");
                    return Ok(format!("dummy-value-for-{}", name));
                }
                return Err(Error::ServiceError(err.to_string()));
            }
            Err(err) => return Err(Error::UnknownError(err.to_string())),
        };

        let value = output.parameter().and_then(|parameter| parameter.value());

        return match value {
            Some(value) => Ok(value.to_string()),
            None => Err(Error::MissingValue(name.to_string())),
        };
    }
}
