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
    get_i64, get_str, get_table, set_i64, set_str, set_table, validate_choice, JsonObject,
    WithExpand, WithFlatten, WithNormalize, WithSchema, WithValidate,
};

/// Multicast routing (PIM) of a vdom, `router/multicast`.
///
/// The two PIM sparse mode options are flat attributes on the Terraform
/// side but live under the `pim-sm-global` subtree on the wire.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RouterMulticast;

impl FmgObject for RouterMulticast {
    const NAME: &'static str = "router_multicast";
    const PATH: &'static str = "router/multicast";
    const SCOPE: ObjectScope = ObjectScope::Vdom;
    const MKEY: Option<&'static str> = None;

    type State<'a> = RouterMulticastState<'a>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RouterMulticastState<'a> {
    pub id: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub device_vdom: ValueString<'a>,
    pub multicast_routing: ValueString<'a>,
    pub route_limit: ValueNumber,
    pub route_threshold: ValueNumber,
    pub register_rate_limit: ValueNumber,
    pub accept_register_list: ValueString<'a>,
    pub interface: ValueList<Value<MulticastInterface<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MulticastInterface<'a> {
    pub name: ValueString<'a>,
    pub pim_mode: ValueString<'a>,
    pub passive: ValueString<'a>,
    pub dr_priority: ValueNumber,
    pub hello_interval: ValueNumber,
    pub cisco_exclude_genid: ValueString<'a>,
}

impl<'a> ObjectState<'a> for RouterMulticastState<'a> {
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

impl<'a> WithSchema for RouterMulticastState<'a> {
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
                    "multicast_routing" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable multicast routing"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "route_limit" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Maximum number of multicast routes"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "route_threshold" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Route count that triggers a warning"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "register_rate_limit" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("PIM register packets per second, 0 disables the limit"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "accept_register_list" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Access list of sources allowed to register"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                blocks: map! {
                    "interface" => NestedBlock::List(Block {
                        attributes: map! {
                            "name" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Interface name"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "pim_mode" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("PIM mode, `sparse-mode` or `dense-mode`"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "passive" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Listen without participating in PIM"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "dr_priority" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Designated router election priority"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "hello_interval" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Seconds between PIM hello messages"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "cisco_exclude_genid" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Omit the generation ID for old Cisco neighbors"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                        },
                        description: Description::plain("PIM interfaces"),
                        ..Default::default()
                    }),
                },
                description: Description::plain("Multicast routing of the vdom"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for RouterMulticastState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_choice(
            diags,
            attr_path.clone(),
            "multicast_routing",
            &self.multicast_routing,
            &["enable", "disable"],
        );
        for (i, entry) in self.interface.iter().flatten().enumerate() {
            let Value::Value(entry) = entry else { continue };
            let entry_path = attr_path.clone().attribute("interface").index(i as i64);
            validate_choice(
                diags,
                entry_path.clone(),
                "pim_mode",
                &entry.pim_mode,
                &["sparse-mode", "dense-mode"],
            );
            validate_choice(
                diags,
                entry_path,
                "passive",
                &entry.passive,
                &["enable", "disable"],
            );
        }
    }
}

impl<'a> WithNormalize for RouterMulticastState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.id.is_null() {
            self.id = Value::Unknown;
        }
    }
}

impl<'a> WithExpand for RouterMulticastState<'a> {
    fn expand(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        set_str(&mut obj, "multicast-routing", &self.multicast_routing);
        set_i64(&mut obj, "route-limit", &self.route_limit);
        set_i64(&mut obj, "route-threshold", &self.route_threshold);
        let mut pim = JsonObject::new();
        set_i64(&mut pim, "register-rate-limit", &self.register_rate_limit);
        set_str(&mut pim, "accept-register-list", &self.accept_register_list);
        if !pim.is_empty() {
            obj.insert("pim-sm-global".into(), JsonValue::Object(pim));
        }
        set_table(&mut obj, "interface", &self.interface, |entry| {
            let mut row = JsonObject::new();
            set_str(&mut row, "name", &entry.name);
            set_str(&mut row, "pim-mode", &entry.pim_mode);
            set_str(&mut row, "passive", &entry.passive);
            set_i64(&mut row, "dr-priority", &entry.dr_priority);
            set_i64(&mut row, "hello-interval", &entry.hello_interval);
            set_str(&mut row, "cisco-exclude-genid", &entry.cisco_exclude_genid);
            JsonValue::Object(row)
        });
        JsonValue::Object(obj)
    }
}

impl<'a> WithFlatten for RouterMulticastState<'a> {
    fn flatten(&mut self, obj: &JsonValue) {
        self.multicast_routing = get_str(obj, "multicast-routing");
        self.route_limit = get_i64(obj, "route-limit");
        self.route_threshold = get_i64(obj, "route-threshold");
        let null = JsonValue::Null;
        let pim = obj.get("pim-sm-global").unwrap_or(&null);
        self.register_rate_limit = get_i64(pim, "register-rate-limit");
        self.accept_register_list = get_str(pim, "accept-register-list");
        self.interface = get_table(obj, "interface", |row| MulticastInterface {
            name: get_str(row, "name"),
            pim_mode: get_str(row, "pim-mode"),
            passive: get_str(row, "passive"),
            dr_priority: get_i64(row, "dr-priority"),
            hello_interval: get_i64(row, "hello-interval"),
            cisco_exclude_genid: get_str(row, "cisco-exclude-genid"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn pim_options_nest_under_pim_sm_global() {
        let state = RouterMulticastState {
            multicast_routing: Value::Value(Cow::from("enable")),
            register_rate_limit: Value::Value(250),
            accept_register_list: Value::Value(Cow::from("mcast-sources")),
            ..Default::default()
        };
        assert_eq!(
            state.expand(),
            json!({
                "multicast-routing": "enable",
                "pim-sm-global": {
                    "register-rate-limit": 250,
                    "accept-register-list": "mcast-sources",
                },
            }),
        );
    }

    #[test]
    fn flatten_reads_the_nested_pim_subtree() {
        let mut state = RouterMulticastState::default();
        state.flatten(&json!({
            "multicast-routing": "enable",
            "route-limit": 2147483647,
            "pim-sm-global": {"register-rate-limit": 100},
            "interface": [
                {"name": "port1", "pim-mode": "sparse-mode", "dr-priority": 5},
            ],
        }));
        assert_eq!(state.register_rate_limit, Value::Value(100));
        assert_eq!(state.route_limit, Value::Value(2147483647));
        assert_eq!(state.accept_register_list, ValueString::Null);
        let first = state.interface.as_ref_option().and_then(|rows| rows.first());
        let Some(Value::Value(first)) = first else {
            panic!("interface row missing");
        };
        assert_eq!(first.name, Value::Value(Cow::from("port1")));
        assert_eq!(first.dr_priority, Value::Value(5));
    }
}
