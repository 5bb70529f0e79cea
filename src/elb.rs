use async_trait::async_trait;
use aws_sdk_elasticloadbalancingv2::model::Rule;
use aws_sdk_elasticloadbalancingv2::types::SdkError;

use crate::rules::ListError;
use crate::rules::ListenerRule;
use crate::rules::RuleLister;

pub struct ListenerRules {
    client: aws_sdk_elasticloadbalancingv2::Client,
}

impl ListenerRules {
    pub fn new(sdk_config: &aws_types::SdkConfig) -> Self {
        let client = aws_sdk_elasticloadbalancingv2::Client::new(sdk_config);

        return Self { client };
    }
}

#[async_trait]
impl RuleLister for ListenerRules {
    async fn list_rules(&self, listener_arn: &str) -> Result<Vec<ListenerRule>, ListError> {
        let result = self
            .client
            .describe_rules()
            .listener_arn(listener_arn)
            .send()
            .await;

        let result = match result {
            Ok(data) => data,
            Err(SdkError::ServiceError { err, .. }) => {
                if err.is_listener_not_found_exception() {
                    return Err(ListError::ListenerNotFound(listener_arn.to_string()));
                }
                return Err(ListError::ServiceError(err.to_string()));
            }
            Err(err) => return Err(ListError::UnknownError(err.to_string())),
        };

        let rules = result.rules().unwrap_or_else(|| &[]);

        return rules.iter().map(decode_rule).collect();
    }
}

fn decode_rule(rule: &Rule) -> Result<ListenerRule, ListError> {
    let raw_priority = match rule.priority() {
        Some(raw_priority) => raw_priority,
        None => {
            return Err(ListError::MalformedRule(String::from(
                "rule carries no priority",
            )))
        }
    };

    if raw_priority == "default" {
        return Ok(ListenerRule::Default);
    }

    let priority = match raw_priority.parse::<u32>() {
        Ok(priority) => priority,
        Err(_) => {
            return Err(ListError::MalformedRule(format!(
                "priority {} is not numeric",
                raw_priority
            )))
        }
    };

    let host_headers = rule
        .conditions()
        .unwrap_or_else(|| &[])
        .iter()
        .filter(|condition| condition.field() == Some("host-header"))
        .find_map(|condition| {
            condition
                .host_header_config()
                .and_then(|config| config.values())
                .or_else(|| condition.values())
        })
        .map(|values| values.to_vec())
        .unwrap_or_else(Vec::new);

    return Ok(ListenerRule::Numbered {
        priority,
        host_headers,
    });
}

#[cfg(test)]
mod tests {
    use aws_sdk_elasticloadbalancingv2::model::HostHeaderConditionConfig;
    use aws_sdk_elasticloadbalancingv2::model::Rule;
    use aws_sdk_elasticloadbalancingv2::model::RuleCondition;

    use super::decode_rule;
    use super::ListError;
    use super::ListenerRule;

    #[test]
    fn decodes_the_default_rule() {
        let rule = Rule::builder().priority("default").build();

        assert_eq!(Ok(ListenerRule::Default), decode_rule(&rule));
    }

    #[test]
    fn decodes_a_numbered_host_rule() {
        let condition = RuleCondition::builder()
            .field("host-header")
            .host_header_config(
                HostHeaderConditionConfig::builder()
                    .values("a.example.com")
                    .values("a-alias.example.com")
                    .build(),
            )
            .build();
        let rule = Rule::builder().priority("3").conditions(condition).build();

        assert_eq!(
            Ok(ListenerRule::Numbered {
                priority: 3,
                host_headers: vec![
                    String::from("a.example.com"),
                    String::from("a-alias.example.com"),
                ],
            }),
            decode_rule(&rule)
        );
    }

    #[test]
    fn falls_back_to_the_legacy_condition_values() {
        let condition = RuleCondition::builder()
            .field("host-header")
            .values("b.example.com")
            .build();
        let rule = Rule::builder().priority("7").conditions(condition).build();

        assert_eq!(
            Ok(ListenerRule::Numbered {
                priority: 7,
                host_headers: vec![String::from("b.example.com")],
            }),
            decode_rule(&rule)
        );
    }

    #[test]
    fn decodes_a_rule_without_host_conditions() {
        let condition = RuleCondition::builder()
            .field("path-pattern")
            .values("/api/*")
            .build();
        let rule = Rule::builder().priority("12").conditions(condition).build();

        assert_eq!(
            Ok(ListenerRule::Numbered {
                priority: 12,
                host_headers: vec![],
            }),
            decode_rule(&rule)
        );
    }

    #[test]
    fn rejects_a_rule_without_a_priority() {
        let rule = Rule::builder().build();

        match decode_rule(&rule).err().unwrap() {
            ListError::MalformedRule(_) => {}
            _ => panic!("Expected `MalformedRule` error"),
        }
    }

    #[test]
    fn rejects_a_non_numeric_priority() {
        let rule = Rule::builder().priority("not-a-number").build();

        match decode_rule(&rule).err().unwrap() {
            ListError::MalformedRule(_) => {}
            _ => panic!("Expected `MalformedRule` error"),
        }
    }
}
