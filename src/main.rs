use std::env;
use std::path::PathBuf;

use aws_sdk_elasticloadbalancingv2::Region;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod elb;
pub mod environment;
pub mod params;
pub mod plan;
pub mod rules;
pub mod writer;

#[derive(thiserror::Error, Debug)]
enum PlanError {
    #[error(transparent)]
    Config(#[from] config::Error),

    #[error(transparent)]
    Environment(#[from] environment::Error),

    #[error(transparent)]
    Parameter(#[from] params::Error),

    #[error(transparent)]
    Allocate(#[from] rules::AllocateError),

    #[error(transparent)]
    Write(#[from] writer::Error),
}

#[tokio::main]
async fn main() -> Result<(), PlanError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alb_service_planner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./config.yaml"));
    let config = config::parse(&config_path)?;

    for service_entry in config {
        let resources = environment::resources(service_entry.environment)?;

        let sdk_config = aws_config::from_env()
            .region(Region::new(resources.region))
            .load()
            .await;

        let parameters = params::ParameterStore::new(&sdk_config);
        let (listener_arn, load_balancer_arn) = futures::try_join!(
            parameters.resolve(resources.listener_param),
            parameters.resolve(resources.load_balancer_param),
        )?;

        let host_headers = plan::host_headers(&service_entry, resources);
        let lister = elb::ListenerRules::new(&sdk_config);
        let priority = rules::allocate_priority(&lister, &listener_arn, &host_headers).await?;

        let deployment_plan = plan::build(
            resources,
            &service_entry,
            &host_headers,
            &listener_arn,
            &load_balancer_arn,
            priority,
        );
        writer::write(&service_entry.plan.location, &deployment_plan)?;

        tracing::info!(
            service = deployment_plan.service_name.as_str(),
            priority,
            plan = %service_entry.plan.location.display(),
            "wrote deployment plan"
        );
    }

    return Ok(());
}
