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

/// FortiClient endpoint control knobs, `endpoint-control/settings`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct EndpointControlSettings;

impl FmgObject for EndpointControlSettings {
    const NAME: &'static str = "endpoint_control_settings";
    const PATH: &'static str = "endpoint-control/settings";
    const SCOPE: ObjectScope = ObjectScope::Vdom;
    const MKEY: Option<&'static str> = None;

    type State<'a> = EndpointControlSettingsState<'a>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EndpointControlSettingsState<'a> {
    pub id: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub device_vdom: ValueString<'a>,
    pub r#override: ValueString<'a>,
    pub forticlient_keepalive_interval: ValueNumber,
    pub forticlient_sys_update_interval: ValueNumber,
    pub forticlient_user_avatar: ValueString<'a>,
    pub forticlient_disconnect_unsupported_ver: ValueString<'a>,
}

impl<'a> ObjectState<'a> for EndpointControlSettingsState<'a> {
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

impl<'a> WithSchema for EndpointControlSettingsState<'a> {
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
                    "override" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Override the global endpoint control settings"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "forticlient_keepalive_interval" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Seconds between FortiClient keepalives"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "forticlient_sys_update_interval" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Minutes between system information updates"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "forticlient_user_avatar" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Enable/disable uploading user avatars"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "forticlient_disconnect_unsupported_ver" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Disconnect FortiClient versions that are too old"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("FortiClient endpoint control settings of the vdom"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for EndpointControlSettingsState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_choice(
            diags,
            attr_path.clone(),
            "override",
            &self.r#override,
            &["enable", "disable"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "forticlient_user_avatar",
            &self.forticlient_user_avatar,
            &["enable", "disable"],
        );
        validate_choice(
            diags,
            attr_path,
            "forticlient_disconnect_unsupported_ver",
            &self.forticlient_disconnect_unsupported_ver,
            &["enable", "disable"],
        );
    }
}

impl<'a> WithNormalize for EndpointControlSettingsState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.id.is_null() {
            self.id = Value::Unknown;
        }
    }
}

impl<'a> WithExpand for EndpointControlSettingsState<'a> {
    fn expand(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        set_str(&mut obj, "override", &self.r#override);
        set_i64(
            &mut obj,
            "forticlient-keepalive-interval",
            &self.forticlient_keepalive_interval,
        );
        set_i64(
            &mut obj,
            "forticlient-sys-update-interval",
            &self.forticlient_sys_update_interval,
        );
        set_str(&mut obj, "forticlient-user-avatar", &self.forticlient_user_avatar);
        set_str(
            &mut obj,
            "forticlient-disconnect-unsupported-ver",
            &self.forticlient_disconnect_unsupported_ver,
        );
        JsonValue::Object(obj)
    }
}

impl<'a> WithFlatten for EndpointControlSettingsState<'a> {
    fn flatten(&mut self, obj: &JsonValue) {
        self.r#override = get_str(obj, "override");
        self.forticlient_keepalive_interval = get_i64(obj, "forticlient-keepalive-interval");
        self.forticlient_sys_update_interval = get_i64(obj, "forticlient-sys-update-interval");
        self.forticlient_user_avatar = get_str(obj, "forticlient-user-avatar");
        self.forticlient_disconnect_unsupported_ver =
            get_str(obj, "forticlient-disconnect-unsupported-ver");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn the_override_keyword_expands_cleanly() {
        let state = EndpointControlSettingsState {
            r#override: Value::Value(Cow::from("enable")),
            forticlient_keepalive_interval: Value::Value(60),
            ..Default::default()
        };
        assert_eq!(
            state.expand(),
            json!({"override": "enable", "forticlient-keepalive-interval": 60}),
        );

        let mut refreshed = EndpointControlSettingsState::default();
        refreshed.flatten(&json!({"override": "enable", "forticlient-user-avatar": "disable"}));
        assert_eq!(refreshed.r#override, Value::Value(Cow::from("enable")));
        assert_eq!(
            refreshed.forticlient_user_avatar,
            Value::Value(Cow::from("disable")),
        );
    }
}
