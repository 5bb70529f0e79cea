use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Environment {0} has no resource definitions")]
    Unconfigured(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        return Environment::Dev;
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let site = match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };

        return write!(f, "{}", site);
    }
}

/// Pre-existing shared resources of one deployment environment. Everything
/// here is provisioned outside this tool; the planner only reads it.
#[derive(Debug, PartialEq)]
pub struct EnvResources {
    pub site: &'static str,
    pub account: &'static str,
    pub region: &'static str,
    pub vpc_id: &'static str,
    pub private_subnet_ids: &'static [&'static str],
    pub sg_default: &'static str,
    pub cluster_name: &'static str,
    pub execution_role_arn: &'static str,
    pub task_role_arn: &'static str,
    pub zone_name: &'static str,
    pub listener_param: &'static str,
    pub load_balancer_param: &'static str,
}

static DEV: EnvResources = EnvResources {
    site: "dev",
    account: "422746423551",
    region: "ap-northeast-1",
    vpc_id: "vpc-03365ffdf742e6bbb",
    private_subnet_ids: &["subnet-01475de3064a44ca9", "subnet-0ab6f6bcfac7c33e2"],
    sg_default: "sg-0ab24e2d8fe967682",
    cluster_name: "development-ecs",
    execution_role_arn: "arn:aws:iam::422746423551:role/ecsTaskExecutionRole",
    task_role_arn: "arn:aws:iam::422746423551:role/ecsTaskRole",
    zone_name: "dev.car-mo.jp",
    listener_param: "dev-common-listener-arn",
    load_balancer_param: "dev-common-lb-arn",
};

pub fn resources(environment: Environment) -> Result<&'static EnvResources, Error> {
    return match environment {
        Environment::Dev => Ok(&DEV),
        Environment::Staging | Environment::Production => {
            Err(Error::Unconfigured(environment.to_string()))
        }
    };
}
