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

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::object::{FmgObject, ObjectScope, ObjectState};
use crate::utils::{
    get_i64, get_str, set_i64, set_str, validate_choice, JsonObject, WithExpand, WithFlatten,
    WithNormalize, WithSchema, WithValidate,
};

/// IKE daemon tuning of a vdom, `system/ike`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemIke;

impl FmgObject for SystemIke {
    const NAME: &'static str = "system_ike";
    const PATH: &'static str = "system/ike";
    const SCOPE: ObjectScope = ObjectScope::Vdom;
    const MKEY: Option<&'static str> = None;

    type State<'a> = SystemIkeState<'a>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SystemIkeState<'a> {
    pub id: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub device_vdom: ValueString<'a>,
    pub embryonic_limit: ValueNumber,
    pub dh_multiprocess: ValueString<'a>,
    pub dh_worker_count: ValueNumber,
    pub dh_mode: ValueString<'a>,
    pub dh_keypair_cache: ValueString<'a>,
    pub dh_keypair_count: ValueNumber,
    pub dh_keypair_throttle: ValueString<'a>,
}

impl<'a> ObjectState<'a> for SystemIkeState<'a> {
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

impl<'a> WithSchema for SystemIkeState<'a> {
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
                    "embryonic_limit" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Maximum number of half-open IKE SAs"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "dh_multiprocess" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable multiprocess Diffie-Hellman"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "dh_worker_count" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Number of Diffie-Hellman workers"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "dh_mode" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Diffie-Hellman exponentiation, `software` or `hardware`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "dh_keypair_cache" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable the Diffie-Hellman key pair cache"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "dh_keypair_count" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Key pairs to pre-generate per Diffie-Hellman group"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "dh_keypair_throttle" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable key pair cache refill throttling"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("IKE daemon tuning of the vdom"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for SystemIkeState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_choice(
            diags,
            attr_path.clone(),
            "dh_multiprocess",
            &self.dh_multiprocess,
            &["enable", "disable"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "dh_mode",
            &self.dh_mode,
            &["software", "hardware"],
        );
        validate_choice(
            diags,
            attr_path,
            "dh_keypair_cache",
            &self.dh_keypair_cache,
            &["enable", "disable"],
        );
    }
}

impl<'a> WithNormalize for SystemIkeState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.id.is_null() {
            self.id = Value::Unknown;
        }
    }
}

impl<'a> WithExpand for SystemIkeState<'a> {
    fn expand(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        set_i64(&mut obj, "embryonic-limit", &self.embryonic_limit);
        set_str(&mut obj, "dh-multiprocess", &self.dh_multiprocess);
        set_i64(&mut obj, "dh-worker-count", &self.dh_worker_count);
        set_str(&mut obj, "dh-mode", &self.dh_mode);
        set_str(&mut obj, "dh-keypair-cache", &self.dh_keypair_cache);
        set_i64(&mut obj, "dh-keypair-count", &self.dh_keypair_count);
        set_str(&mut obj, "dh-keypair-throttle", &self.dh_keypair_throttle);
        JsonValue::Object(obj)
    }
}

impl<'a> WithFlatten for SystemIkeState<'a> {
    fn flatten(&mut self, obj: &JsonValue) {
        self.embryonic_limit = get_i64(obj, "embryonic-limit");
        self.dh_multiprocess = get_str(obj, "dh-multiprocess");
        self.dh_worker_count = get_i64(obj, "dh-worker-count");
        self.dh_mode = get_str(obj, "dh-mode");
        self.dh_keypair_cache = get_str(obj, "dh-keypair-cache");
        self.dh_keypair_count = get_i64(obj, "dh-keypair-count");
        self.dh_keypair_throttle = get_str(obj, "dh-keypair-throttle");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn expand_and_flatten_are_inverse() {
        let state = SystemIkeState {
            embryonic_limit: Value::Value(10000),
            dh_mode: Value::Value(Cow::from("hardware")),
            dh_keypair_cache: Value::Value(Cow::from("enable")),
            dh_keypair_count: Value::Value(50000),
            ..Default::default()
        };
        let wire = state.expand();
        assert_eq!(
            wire,
            json!({
                "embryonic-limit": 10000,
                "dh-mode": "hardware",
                "dh-keypair-cache": "enable",
                "dh-keypair-count": 50000,
            }),
        );

        let mut refreshed = SystemIkeState::default();
        refreshed.flatten(&wire);
        assert_eq!(refreshed.embryonic_limit, state.embryonic_limit);
        assert_eq!(refreshed.dh_mode, state.dh_mode);
        assert_eq!(refreshed.dh_keypair_count, state.dh_keypair_count);
    }
}
