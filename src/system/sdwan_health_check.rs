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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock, Schema,
};
use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::object::{FmgObject, ObjectScope, ObjectState};
use crate::utils::{
    get_i64, get_i64_list, get_joined, get_str, get_table, set_i64, set_i64_list, set_str,
    set_table, validate_choice, JsonObject, WithExpand, WithFlatten, WithNormalize, WithSchema,
    WithValidate,
};

/// SD-WAN link health monitor, `system/sdwan/health-check`. Vdom scoped,
/// keyed by `name`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemSdwanHealthCheck;

impl FmgObject for SystemSdwanHealthCheck {
    const NAME: &'static str = "system_sdwan_health_check";
    const PATH: &'static str = "system/sdwan/health-check";
    const SCOPE: ObjectScope = ObjectScope::Vdom;
    const MKEY: Option<&'static str> = Some("name");

    type State<'a> = SystemSdwanHealthCheckState<'a>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SystemSdwanHealthCheckState<'a> {
    pub id: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub device_vdom: ValueString<'a>,
    pub name: ValueString<'a>,
    pub server: ValueString<'a>,
    pub protocol: ValueString<'a>,
    pub port: ValueNumber,
    pub interval: ValueNumber,
    pub probe_timeout: ValueNumber,
    pub failtime: ValueNumber,
    pub recoverytime: ValueNumber,
    pub probe_count: ValueNumber,
    pub http_get: ValueString<'a>,
    pub http_match: ValueString<'a>,
    pub members: ValueList<ValueNumber>,
    pub source: ValueString<'a>,
    pub update_cascade_interface: ValueString<'a>,
    pub update_static_route: ValueString<'a>,
    pub sla: ValueList<Value<HealthCheckSla<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct HealthCheckSla<'a> {
    pub id: ValueNumber,
    pub link_cost_factor: ValueString<'a>,
    pub latency_threshold: ValueNumber,
    pub jitter_threshold: ValueNumber,
    pub packetloss_threshold: ValueNumber,
}

impl<'a> ObjectState<'a> for SystemSdwanHealthCheckState<'a> {
    fn id(&self) -> ValueString<'a> {
        self.id.clone()
    }
    fn set_id(&mut self, id: ValueString<'a>) {
        self.id = id;
    }
    fn device_name(&self) -> ValueString<'a> {
        self.device_name.clone()
    }
    fn set_device_name(&mut self, name: ValueString<'a>) {
        self.device_name = name;
    }
    fn device_vdom(&self) -> ValueString<'a> {
        self.device_vdom.clone()
    }
    fn set_device_vdom(&mut self, vdom: ValueString<'a>) {
        self.device_vdom = vdom;
    }
    fn mkey(&self) -> ValueString<'a> {
        self.name.clone()
    }
    fn set_mkey(&mut self, mkey: ValueString<'a>) {
        self.name = mkey;
    }
}

impl<'a> WithSchema for SystemSdwanHealthCheckState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Resource identifier"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "device_name" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Target device, provider default if unset"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "device_vdom" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Target vdom, provider default if unset"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "name" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Health check name"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "server" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Probed server address, space separated if more than one"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "protocol" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Probe protocol, for example `ping` or `http`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "port" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Probe port for TCP based protocols"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "interval" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Milliseconds between probes"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "probe_timeout" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Milliseconds before a probe is lost"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "failtime" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Lost probes before the link is dead"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "recoverytime" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Successful probes before the link is alive"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "probe_count" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Probes kept for the quality measurement"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "http_get" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("URL path used by the `http` protocol"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "http_match" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("String expected in the HTTP answer"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "members" => Attribute {
                        attr_type: AttributeType::List(AttributeType::Number.into()),
                        description: Description::plain("SD-WAN member sequence numbers, empty for all"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "source" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Source IP of the probes"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "update_cascade_interface" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Bring down cascade interfaces with the link"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "update_static_route" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Withdraw static routes of a dead link"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                blocks: map! {
                    "sla" => NestedBlock::List(Block {
                        attributes: map! {
                            "id" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("SLA entry ID"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "link_cost_factor" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Measured factors, space separated flags"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "latency_threshold" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Latency threshold in milliseconds"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "jitter_threshold" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Jitter threshold in milliseconds"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "packetloss_threshold" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Packet loss threshold in percent"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                        },
                        description: Description::plain("SLA targets evaluated against the probes"),
                        ..Default::default()
                    }),
                },
                description: Description::plain("SD-WAN link health monitor of the vdom"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for SystemSdwanHealthCheckState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_choice(
            diags,
            attr_path.clone(),
            "protocol",
            &self.protocol,
            &["ping", "tcp-echo", "udp-echo", "http", "twamp", "dns"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "update_cascade_interface",
            &self.update_cascade_interface,
            &["enable", "disable"],
        );
        validate_choice(
            diags,
            attr_path,
            "update_static_route",
            &self.update_static_route,
            &["enable", "disable"],
        );
    }
}

impl<'a> WithNormalize for SystemSdwanHealthCheckState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.id.is_null() {
            self.id = Value::Unknown;
        }
    }
}

impl<'a> WithExpand for SystemSdwanHealthCheckState<'a> {
    fn expand(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        set_str(&mut obj, "name", &self.name);
        set_str(&mut obj, "server", &self.server);
        set_str(&mut obj, "protocol", &self.protocol);
        set_i64(&mut obj, "port", &self.port);
        set_i64(&mut obj, "interval", &self.interval);
        set_i64(&mut obj, "probe-timeout", &self.probe_timeout);
        set_i64(&mut obj, "failtime", &self.failtime);
        set_i64(&mut obj, "recoverytime", &self.recoverytime);
        set_i64(&mut obj, "probe-count", &self.probe_count);
        set_str(&mut obj, "http-get", &self.http_get);
        set_str(&mut obj, "http-match", &self.http_match);
        set_i64_list(&mut obj, "members", &self.members);
        set_str(&mut obj, "source", &self.source);
        set_str(&mut obj, "update-cascade-interface", &self.update_cascade_interface);
        set_str(&mut obj, "update-static-route", &self.update_static_route);
        set_table(&mut obj, "sla", &self.sla, |sla| {
            let mut row = JsonObject::new();
            set_i64(&mut row, "id", &sla.id);
            set_str(&mut row, "link-cost-factor", &sla.link_cost_factor);
            set_i64(&mut row, "latency-threshold", &sla.latency_threshold);
            set_i64(&mut row, "jitter-threshold", &sla.jitter_threshold);
            set_i64(&mut row, "packetloss-threshold", &sla.packetloss_threshold);
            JsonValue::Object(row)
        });
        JsonValue::Object(obj)
    }
}

impl<'a> WithFlatten for SystemSdwanHealthCheckState<'a> {
    fn flatten(&mut self, obj: &JsonValue) {
        self.name = get_str(obj, "name");
        // some firmware builds answer with an array of servers
        self.server = get_joined(obj, "server");
        self.protocol = get_str(obj, "protocol");
        self.port = get_i64(obj, "port");
        self.interval = get_i64(obj, "interval");
        self.probe_timeout = get_i64(obj, "probe-timeout");
        self.failtime = get_i64(obj, "failtime");
        self.recoverytime = get_i64(obj, "recoverytime");
        self.probe_count = get_i64(obj, "probe-count");
        self.http_get = get_str(obj, "http-get");
        self.http_match = get_str(obj, "http-match");
        self.members = get_i64_list(obj, "members");
        self.source = get_str(obj, "source");
        self.update_cascade_interface = get_str(obj, "update-cascade-interface");
        self.update_static_route = get_str(obj, "update-static-route");
        self.sla = get_table(obj, "sla", |row| HealthCheckSla {
            id: get_i64(row, "id"),
            link_cost_factor: get_joined(row, "link-cost-factor"),
            latency_threshold: get_i64(row, "latency-threshold"),
            jitter_threshold: get_i64(row, "jitter-threshold"),
            packetloss_threshold: get_i64(row, "packetloss-threshold"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn probes_expand_with_member_and_sla_tables() {
        let state = SystemSdwanHealthCheckState {
            name: Value::Value(Cow::from("wan-quality")),
            server: Value::Value(Cow::from("96.45.45.45")),
            protocol: Value::Value(Cow::from("ping")),
            interval: Value::Value(500),
            members: Value::Value(vec![Value::Value(1), Value::Value(2)]),
            sla: Value::Value(vec![Value::Value(HealthCheckSla {
                id: Value::Value(1),
                link_cost_factor: Value::Value(Cow::from("latency packet-loss")),
                latency_threshold: Value::Value(250),
                jitter_threshold: ValueNumber::Null,
                packetloss_threshold: Value::Value(2),
            })]),
            ..Default::default()
        };
        assert_eq!(
            state.expand(),
            json!({
                "name": "wan-quality",
                "server": "96.45.45.45",
                "protocol": "ping",
                "interval": 500,
                "members": [1, 2],
                "sla": [{
                    "id": 1,
                    "link-cost-factor": "latency packet-loss",
                    "latency-threshold": 250,
                    "packetloss-threshold": 2,
                }],
            }),
        );
    }

    #[test]
    fn flatten_tolerates_list_shaped_answers() {
        let mut state = SystemSdwanHealthCheckState::default();
        state.flatten(&json!({
            "name": "wan-quality",
            "server": ["96.45.45.45", "96.45.46.46"],
            "members": "1 2",
            "sla": [{"id": 1, "link-cost-factor": ["latency", "jitter"]}],
        }));
        assert_eq!(
            state.server,
            Value::Value(Cow::from("96.45.45.45 96.45.46.46")),
        );
        assert_eq!(
            state.members,
            Value::Value(vec![Value::Value(1), Value::Value(2)]),
        );
        let first = state.sla.as_ref_option().and_then(|rows| rows.first());
        let Some(Value::Value(first)) = first else {
            panic!("sla row missing");
        };
        assert_eq!(
            first.link_cost_factor,
            Value::Value(Cow::from("latency jitter")),
        );
    }
}
