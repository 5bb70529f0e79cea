use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ServiceEntry;
use crate::environment::EnvResources;

#[derive(Debug, Serialize, PartialEq)]
pub struct DeploymentPlan {
    pub service_name: String,
    pub site: String,
    pub task_definition: TaskDefinitionPlan,
    pub service: ServicePlan,
    pub target_group: TargetGroupPlan,
    pub listener_rule: ListenerRulePlan,
    pub dns_record: DnsRecordPlan,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TaskDefinitionPlan {
    pub family: String,
    pub cpu: u32,
    pub memory_limit_mib: u32,
    pub execution_role_arn: String,
    pub task_role_arn: String,
    pub container: ContainerPlan,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ContainerPlan {
    pub name: String,
    pub image: String,
    pub container_port: u16,
    pub host_port: u16,
    pub environment: BTreeMap<String, String>,
    pub log_stream_prefix: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ServicePlan {
    pub name: String,
    pub cluster_name: String,
    pub desired_count: u32,
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
    pub health_check_grace_period_seconds: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TargetGroupPlan {
    pub name: String,
    pub vpc_id: String,
    pub port: u16,
    pub protocol: String,
    pub health_check_path: String,
    pub healthy_http_codes: String,
    pub deregistration_delay_seconds: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ListenerRulePlan {
    pub listener_arn: String,
    pub priority: u32,
    pub host_headers: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DnsRecordPlan {
    pub zone_name: String,
    pub record_name: String,
    pub ttl_seconds: u32,
    pub alias_target_arn: String,
}

/// The host headers the service's listener rule matches. The first one is
/// also the allocation key for the rule priority.
pub fn host_headers(service_entry: &ServiceEntry, resources: &EnvResources) -> Vec<String> {
    let hostname = service_entry.hostname.as_ref().unwrap();

    return vec![format!("{}.{}", hostname, resources.zone_name)];
}

pub fn build(
    resources: &EnvResources,
    service_entry: &ServiceEntry,
    host_headers: &[String],
    listener_arn: &str,
    load_balancer_arn: &str,
    priority: u32,
) -> DeploymentPlan {
    let id = service_entry.service_name.as_ref().unwrap().clone();
    let image = service_entry.image.as_ref().unwrap().clone();

    let fqdn = host_headers.first().unwrap().clone();
    let record_name = match &service_entry.arecord {
        Some(arecord) => arecord.clone(),
        None => fqdn,
    };

    return DeploymentPlan {
        service_name: id.clone(),
        site: resources.site.to_string(),
        task_definition: TaskDefinitionPlan {
            family: format!("{}-def", id),
            cpu: service_entry.cpu,
            memory_limit_mib: service_entry.memory_limit_mib,
            execution_role_arn: resources.execution_role_arn.to_string(),
            task_role_arn: resources.task_role_arn.to_string(),
            container: ContainerPlan {
                name: service_entry.container_name.clone(),
                image,
                container_port: service_entry.port,
                host_port: service_entry.port,
                environment: service_entry.container_environment.clone(),
                log_stream_prefix: format!("{}-container-{}", id, service_entry.container_name),
            },
        },
        service: ServicePlan {
            name: format!("{}-service", id),
            cluster_name: resources.cluster_name.to_string(),
            desired_count: service_entry.desired_count,
            subnet_ids: resources
                .private_subnet_ids
                .iter()
                .map(|subnet_id| subnet_id.to_string())
                .collect(),
            security_group_ids: vec![resources.sg_default.to_string()],
            health_check_grace_period_seconds: service_entry.health_check_grace_period,
        },
        target_group: TargetGroupPlan {
            name: format!("{}-target", id),
            vpc_id: resources.vpc_id.to_string(),
            port: service_entry.port,
            protocol: String::from("HTTP"),
            health_check_path: service_entry.health_check_path.clone(),
            healthy_http_codes: String::from("200,302"),
            deregistration_delay_seconds: service_entry.deregistration_delay,
        },
        listener_rule: ListenerRulePlan {
            listener_arn: listener_arn.to_string(),
            priority,
            host_headers: host_headers.to_vec(),
        },
        dns_record: DnsRecordPlan {
            zone_name: resources.zone_name.to_string(),
            record_name,
            ttl_seconds: 60,
            alias_target_arn: load_balancer_arn.to_string(),
        },
    };
}
