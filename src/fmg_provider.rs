// This file is part of the terraform-provider-fmgdevice project
//
// Copyright (C) the terraform-provider-fmgdevice authors, 2024-2026. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty, ValueList, ValueNumber, ValueString};
use tf_provider::{map, Provider};

use crate::client::{Config, FortiClient, WorkspaceMode};
use crate::endpoint_control::EndpointControlSettings;
use crate::object::{ClientHandle, FmgDataSource, FmgResource};
use crate::report::ReportLayout;
use crate::router::{RouterIsis, RouterMulticast};
use crate::rpc::{JsonGenericResource, JsonRpcDataSource};
use crate::system::{SystemAutomationAction, SystemIke, SystemSdwanHealthCheck};
use crate::utils::validate_choice;

#[derive(Debug, Default, Clone)]
pub struct FmgdeviceProvider {
    handle: ClientHandle,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FmgProviderConfig<'a> {
    pub hostname: ValueString<'a>,
    pub username: ValueString<'a>,
    pub password: ValueString<'a>,
    pub access_token: ValueString<'a>,
    pub adom: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub device_vdom: ValueString<'a>,
    pub insecure: Value<bool>,
    pub timeout: ValueNumber,
    pub retries: ValueNumber,
    pub workspace_mode: ValueString<'a>,
    pub import_options: ValueList<ValueString<'a>>,
}

/// Configured value if set and non empty, environment fallback
/// otherwise.
fn setting(value: &ValueString<'_>, env: &str) -> Option<String> {
    match value.as_deref_option() {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => std::env::var(env).ok().filter(|value| !value.is_empty()),
    }
}

fn env_flag(env: &str) -> bool {
    matches!(
        std::env::var(env).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

#[async_trait]
impl Provider for FmgdeviceProvider {
    type Config<'a> = FmgProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut tf_provider::Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "hostname" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "Hostname or URL of the FortiManager, `FMGDEVICE_HOSTNAME` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "username" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "User used to open the API session, `FMGDEVICE_USERNAME` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "password" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "Password of the API user, `FMGDEVICE_PASSWORD` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "access_token" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "API token used instead of a session, `FMGDEVICE_ACCESS_TOKEN` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "adom" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "Administrative domain holding the devices, `root` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "device_name" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "Device targeted when a resource does not set one",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "device_vdom" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "Vdom targeted when a resource does not set one, `root` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "insecure" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain(
                            "Skip the TLS certificate verification, `FMGDEVICE_INSECURE` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "timeout" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain(
                            "Request timeout in seconds, 60 by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "retries" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain(
                            "Attempts per request on transport failures, 1 by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "workspace_mode" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(
                            "`normal` wraps every change in a workspace lock/commit/unlock, `disabled` by default",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "import_options" => Attribute {
                        attr_type: AttributeType::List(Box::new(AttributeType::String)),
                        description: Description::plain(
                            "`key=value` pairs merged into import IDs that omit them, e.g. `device_name=FGT1`",
                        ),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain(
                    "Manage the configuration of FortiGate devices through a FortiManager",
                ),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(
        &self,
        diags: &mut tf_provider::Diagnostics,
        config: Self::Config<'a>,
    ) -> Option<()> {
        validate_choice(
            diags,
            Default::default(),
            "workspace_mode",
            &config.workspace_mode,
            &["disabled", "normal"],
        );
        if let Value::Value(timeout) = &config.timeout {
            if *timeout <= 0 {
                diags.error(
                    "Invalid value for `timeout`",
                    "The timeout must be at least one second.",
                    tf_provider::AttributePath::new("timeout"),
                );
            }
        }
        if let Value::Value(retries) = &config.retries {
            if *retries < 1 {
                diags.error(
                    "Invalid value for `retries`",
                    "`retries` counts attempts, it must be at least 1.",
                    tf_provider::AttributePath::new("retries"),
                );
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut tf_provider::Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        debug!(version = %terraform_version, "configuring provider");

        let Some(hostname) = setting(&config.hostname, "FMGDEVICE_HOSTNAME") else {
            diags.root_error(
                "Missing FortiManager hostname",
                "Set `hostname` on the provider block or export `FMGDEVICE_HOSTNAME`.",
            );
            return None;
        };
        let username = setting(&config.username, "FMGDEVICE_USERNAME");
        let password = setting(&config.password, "FMGDEVICE_PASSWORD");
        let access_token = setting(&config.access_token, "FMGDEVICE_ACCESS_TOKEN");
        if access_token.is_none() && (username.is_none() || password.is_none()) {
            diags.root_error(
                "Missing FortiManager credentials",
                "Provide `access_token`, or both `username` and `password`, either on the \
                 provider block or through the FMGDEVICE_* environment variables.",
            );
            return None;
        }

        let cfg = Config {
            hostname,
            username,
            password,
            access_token,
            adom: setting(&config.adom, "FMGDEVICE_ADOM").unwrap_or_else(|| "root".to_string()),
            device_name: setting(&config.device_name, "FMGDEVICE_DEVICE_NAME"),
            device_vdom: setting(&config.device_vdom, "FMGDEVICE_DEVICE_VDOM"),
            insecure: match config.insecure {
                Value::Value(insecure) => insecure,
                _ => env_flag("FMGDEVICE_INSECURE"),
            },
            timeout: Duration::from_secs(config.timeout.unwrap_or(60).max(1) as u64),
            retries: config.retries.unwrap_or(1).max(1) as u32,
            workspace_mode: match config.workspace_mode.as_deref_option() {
                Some("normal") => WorkspaceMode::Normal,
                _ => WorkspaceMode::Disabled,
            },
            import_options: config
                .import_options
                .iter()
                .flatten()
                .filter_map(|option| option.as_deref_option())
                .map(str::to_string)
                .collect(),
        };

        match FortiClient::new(cfg) {
            Ok(client) => {
                if !self.handle.configure(client) {
                    debug!("provider already configured, keeping the existing connection");
                }
                Some(())
            }
            Err(err) => {
                diags.root_error("Failed to set up the FortiManager client", err.to_string());
                None
            }
        }
    }

    fn get_resources(
        &self,
        _diags: &mut tf_provider::Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::DynamicResource>>> {
        Some(map! {
            "router_isis"               => FmgResource::<RouterIsis>::new(self.handle.clone()),
            "router_multicast"          => FmgResource::<RouterMulticast>::new(self.handle.clone()),
            "system_ike"                => FmgResource::<SystemIke>::new(self.handle.clone()),
            "system_automation_action"  => FmgResource::<SystemAutomationAction>::new(self.handle.clone()),
            "system_sdwan_health_check" => FmgResource::<SystemSdwanHealthCheck>::new(self.handle.clone()),
            "report_layout"             => FmgResource::<ReportLayout>::new(self.handle.clone()),
            "endpoint_control_settings" => FmgResource::<EndpointControlSettings>::new(self.handle.clone()),
            "json_generic"              => JsonGenericResource::new(self.handle.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut tf_provider::Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::DynamicDataSource>>> {
        Some(map! {
            "router_isis"               => FmgDataSource::<RouterIsis>::new(self.handle.clone()),
            "router_multicast"          => FmgDataSource::<RouterMulticast>::new(self.handle.clone()),
            "system_ike"                => FmgDataSource::<SystemIke>::new(self.handle.clone()),
            "system_automation_action"  => FmgDataSource::<SystemAutomationAction>::new(self.handle.clone()),
            "system_sdwan_health_check" => FmgDataSource::<SystemSdwanHealthCheck>::new(self.handle.clone()),
            "report_layout"             => FmgDataSource::<ReportLayout>::new(self.handle.clone()),
            "endpoint_control_settings" => FmgDataSource::<EndpointControlSettings>::new(self.handle.clone()),
            "json_rpc"                  => JsonRpcDataSource::new(self.handle.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn settings_prefer_explicit_values() {
        std::env::set_var("FMGDEVICE_TEST_SETTING", "from-env");
        assert_eq!(
            setting(
                &Value::Value(Cow::from("explicit")),
                "FMGDEVICE_TEST_SETTING",
            )
            .as_deref(),
            Some("explicit"),
        );
        assert_eq!(
            setting(&Value::Null, "FMGDEVICE_TEST_SETTING").as_deref(),
            Some("from-env"),
        );
        assert_eq!(
            setting(&Value::Value(Cow::from("")), "FMGDEVICE_TEST_SETTING").as_deref(),
            Some("from-env"),
        );
        std::env::remove_var("FMGDEVICE_TEST_SETTING");
        assert_eq!(setting(&Value::Null, "FMGDEVICE_TEST_SETTING"), None);
    }

    #[test]
    fn flags_only_accept_affirmative_values() {
        assert!(!env_flag("FMGDEVICE_TEST_FLAG"));
        std::env::set_var("FMGDEVICE_TEST_FLAG", "true");
        assert!(env_flag("FMGDEVICE_TEST_FLAG"));
        std::env::set_var("FMGDEVICE_TEST_FLAG", "0");
        assert!(!env_flag("FMGDEVICE_TEST_FLAG"));
        std::env::remove_var("FMGDEVICE_TEST_FLAG");
    }
}
