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
    get_i64, get_secret, get_str, get_table, set_i64, set_str, set_table, validate_choice,
    JsonObject, WithExpand, WithFlatten, WithNormalize, WithSchema, WithValidate,
};

/// IS-IS routing process of a vdom, `router/isis`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RouterIsis;

impl FmgObject for RouterIsis {
    const NAME: &'static str = "router_isis";
    const PATH: &'static str = "router/isis";
    const SCOPE: ObjectScope = ObjectScope::Vdom;
    const MKEY: Option<&'static str> = None;

    type State<'a> = RouterIsisState<'a>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RouterIsisState<'a> {
    pub id: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub device_vdom: ValueString<'a>,
    pub adjacency_check: ValueString<'a>,
    pub adv_passive_only: ValueString<'a>,
    pub auth_mode_l1: ValueString<'a>,
    pub auth_mode_l2: ValueString<'a>,
    pub auth_password_l1: ValueString<'a>,
    pub auth_password_l2: ValueString<'a>,
    pub default_originate: ValueString<'a>,
    pub dynamic_hostname: ValueString<'a>,
    pub is_type: ValueString<'a>,
    pub metric_style: ValueString<'a>,
    pub overload_bit: ValueString<'a>,
    pub spf_interval_exp_l1: ValueString<'a>,
    pub spf_interval_exp_l2: ValueString<'a>,
    pub isis_net: ValueList<Value<IsisNet<'a>>>,
    pub redistribute: ValueList<Value<IsisRedistribute<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct IsisNet<'a> {
    pub id: ValueNumber,
    pub net: ValueString<'a>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct IsisRedistribute<'a> {
    pub protocol: ValueString<'a>,
    pub status: ValueString<'a>,
    pub metric: ValueNumber,
    pub metric_type: ValueString<'a>,
    pub level: ValueString<'a>,
}

impl<'a> ObjectState<'a> for RouterIsisState<'a> {
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
}

impl<'a> WithSchema for RouterIsisState<'a> {
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
                    "adjacency_check" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable adjacency check"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "adv_passive_only" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Advertise prefixes of passive interfaces only"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "auth_mode_l1" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Level 1 authentication mode, `password` or `md5`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "auth_mode_l2" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Level 2 authentication mode, `password` or `md5`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "auth_password_l1" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Level 1 authentication password"),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "auth_password_l2" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Level 2 authentication password"),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "default_originate" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable distribution of the default route"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "dynamic_hostname" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable dynamic hostname"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "is_type" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("IS level, `level-1-2`, `level-1`, or `level-2-only`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "metric_style" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("TLV metric style, `narrow`, `wide`, or `transition`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "overload_bit" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Signal other routers not to use us for transit"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "spf_interval_exp_l1" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Level 1 SPF delay, `min max` in milliseconds"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "spf_interval_exp_l2" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Level 2 SPF delay, `min max` in milliseconds"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                blocks: map! {
                    "isis_net" => NestedBlock::List(Block {
                        attributes: map! {
                            "id" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Network entry ID"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "net" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Network entity title"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                        },
                        description: Description::plain("IS-IS network entity titles"),
                        ..Default::default()
                    }),
                    "redistribute" => NestedBlock::List(Block {
                        attributes: map! {
                            "protocol" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Source protocol"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "status" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Enable/disable this redistribution"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "metric" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Metric advertised with the routes"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "metric_type" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Metric type, `internal` or `external`"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "level" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Levels the routes are injected into"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                        },
                        description: Description::plain("Route redistribution per source protocol"),
                        ..Default::default()
                    }),
                },
                description: Description::plain("IS-IS routing process of the vdom"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for RouterIsisState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_choice(
            diags,
            attr_path.clone(),
            "auth_mode_l1",
            &self.auth_mode_l1,
            &["password", "md5"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "auth_mode_l2",
            &self.auth_mode_l2,
            &["password", "md5"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "is_type",
            &self.is_type,
            &["level-1-2", "level-1", "level-2-only"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "metric_style",
            &self.metric_style,
            &["narrow", "wide", "transition"],
        );
        for (i, entry) in self.redistribute.iter().flatten().enumerate() {
            let Value::Value(entry) = entry else { continue };
            let entry_path = attr_path.clone().attribute("redistribute").index(i as i64);
            validate_choice(
                diags,
                entry_path.clone(),
                "protocol",
                &entry.protocol,
                &["connected", "rip", "ospf", "bgp", "static"],
            );
            validate_choice(
                diags,
                entry_path.clone(),
                "status",
                &entry.status,
                &["enable", "disable"],
            );
            validate_choice(
                diags,
                entry_path,
                "level",
                &entry.level,
                &["level-1", "level-1-2", "level-2"],
            );
        }
    }
}

impl<'a> WithNormalize for RouterIsisState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.id.is_null() {
            self.id = Value::Unknown;
        }
    }
}

impl<'a> WithExpand for RouterIsisState<'a> {
    fn expand(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        set_str(&mut obj, "adjacency-check", &self.adjacency_check);
        set_str(&mut obj, "adv-passive-only", &self.adv_passive_only);
        set_str(&mut obj, "auth-mode-l1", &self.auth_mode_l1);
        set_str(&mut obj, "auth-mode-l2", &self.auth_mode_l2);
        set_str(&mut obj, "auth-password-l1", &self.auth_password_l1);
        set_str(&mut obj, "auth-password-l2", &self.auth_password_l2);
        set_str(&mut obj, "default-originate", &self.default_originate);
        set_str(&mut obj, "dynamic-hostname", &self.dynamic_hostname);
        set_str(&mut obj, "is-type", &self.is_type);
        set_str(&mut obj, "metric-style", &self.metric_style);
        set_str(&mut obj, "overload-bit", &self.overload_bit);
        set_str(&mut obj, "spf-interval-exp-l1", &self.spf_interval_exp_l1);
        set_str(&mut obj, "spf-interval-exp-l2", &self.spf_interval_exp_l2);
        set_table(&mut obj, "net", &self.isis_net, |net| {
            let mut row = JsonObject::new();
            set_i64(&mut row, "id", &net.id);
            set_str(&mut row, "net", &net.net);
            JsonValue::Object(row)
        });
        set_table(&mut obj, "redistribute", &self.redistribute, |entry| {
            let mut row = JsonObject::new();
            set_str(&mut row, "protocol", &entry.protocol);
            set_str(&mut row, "status", &entry.status);
            set_i64(&mut row, "metric", &entry.metric);
            set_str(&mut row, "metric-type", &entry.metric_type);
            set_str(&mut row, "level", &entry.level);
            JsonValue::Object(row)
        });
        JsonValue::Object(obj)
    }
}

impl<'a> WithFlatten for RouterIsisState<'a> {
    fn flatten(&mut self, obj: &JsonValue) {
        self.adjacency_check = get_str(obj, "adjacency-check");
        self.adv_passive_only = get_str(obj, "adv-passive-only");
        self.auth_mode_l1 = get_str(obj, "auth-mode-l1");
        self.auth_mode_l2 = get_str(obj, "auth-mode-l2");
        self.auth_password_l1 =
            get_secret(obj, "auth-password-l1", std::mem::take(&mut self.auth_password_l1));
        self.auth_password_l2 =
            get_secret(obj, "auth-password-l2", std::mem::take(&mut self.auth_password_l2));
        self.default_originate = get_str(obj, "default-originate");
        self.dynamic_hostname = get_str(obj, "dynamic-hostname");
        self.is_type = get_str(obj, "is-type");
        self.metric_style = get_str(obj, "metric-style");
        self.overload_bit = get_str(obj, "overload-bit");
        self.spf_interval_exp_l1 = get_str(obj, "spf-interval-exp-l1");
        self.spf_interval_exp_l2 = get_str(obj, "spf-interval-exp-l2");
        self.isis_net = get_table(obj, "net", |row| IsisNet {
            id: get_i64(row, "id"),
            net: get_str(row, "net"),
        });
        self.redistribute = get_table(obj, "redistribute", |row| IsisRedistribute {
            protocol: get_str(row, "protocol"),
            status: get_str(row, "status"),
            metric: get_i64(row, "metric"),
            metric_type: get_str(row, "metric-type"),
            level: get_str(row, "level"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn expand_maps_to_hyphenated_api_names() {
        let state = RouterIsisState {
            adjacency_check: Value::Value(Cow::from("enable")),
            is_type: Value::Value(Cow::from("level-1-2")),
            isis_net: Value::Value(vec![Value::Value(IsisNet {
                id: Value::Value(1),
                net: Value::Value(Cow::from("49.0001.1921.6800.1001.00")),
            })]),
            ..Default::default()
        };
        assert_eq!(
            state.expand(),
            json!({
                "adjacency-check": "enable",
                "is-type": "level-1-2",
                "net": [{"id": 1, "net": "49.0001.1921.6800.1001.00"}],
            }),
        );
    }

    #[test]
    fn flatten_keeps_masked_passwords() {
        let mut state = RouterIsisState {
            auth_password_l1: Value::Value(Cow::from("hunter2")),
            ..Default::default()
        };
        state.flatten(&json!({
            "auth-mode-l1": "md5",
            "auth-password-l1": "ENC AAAABBBB",
            "redistribute": [{"protocol": "bgp", "status": "enable", "metric": 20}],
        }));
        assert_eq!(state.auth_mode_l1, Value::Value(Cow::from("md5")));
        assert_eq!(state.auth_password_l1, Value::Value(Cow::from("hunter2")));
        let rows = state.redistribute.as_ref_option().map(Vec::len);
        assert_eq!(rows, Some(1));
    }

    #[tokio::test]
    async fn validation_flags_unknown_enum_values() {
        let state = RouterIsisState {
            is_type: Value::Value(Cow::from("level-3")),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, Default::default()).await;
        assert!(!diags.errors.is_empty());
    }
}
