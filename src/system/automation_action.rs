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
    get_i64, get_str, get_str_list, get_table, set_i64, set_str, set_str_list, set_table,
    validate_choice, JsonObject, WithExpand, WithFlatten, WithNormalize, WithSchema, WithValidate,
};

/// Automation stitch action, `system/automation-action`. Device global,
/// keyed by `name`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemAutomationAction;

impl FmgObject for SystemAutomationAction {
    const NAME: &'static str = "system_automation_action";
    const PATH: &'static str = "system/automation-action";
    const SCOPE: ObjectScope = ObjectScope::Global;
    const MKEY: Option<&'static str> = Some("name");

    type State<'a> = SystemAutomationActionState<'a>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SystemAutomationActionState<'a> {
    pub id: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub name: ValueString<'a>,
    pub description: ValueString<'a>,
    pub action_type: ValueString<'a>,
    pub system_action: ValueString<'a>,
    pub protocol: ValueString<'a>,
    pub uri: ValueString<'a>,
    pub http_body: ValueString<'a>,
    pub port: ValueNumber,
    pub verify_host_cert: ValueString<'a>,
    pub script: ValueString<'a>,
    pub output_size: ValueNumber,
    pub timeout: ValueNumber,
    pub execute_security_fabric: ValueString<'a>,
    pub accprofile: ValueString<'a>,
    pub email_to: ValueList<ValueString<'a>>,
    pub email_from: ValueString<'a>,
    pub email_subject: ValueString<'a>,
    pub http_headers: ValueList<Value<AutomationHttpHeader<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AutomationHttpHeader<'a> {
    pub id: ValueNumber,
    pub key: ValueString<'a>,
    pub value: ValueString<'a>,
}

impl<'a> ObjectState<'a> for SystemAutomationActionState<'a> {
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
    fn mkey(&self) -> ValueString<'a> {
        self.name.clone()
    }
    fn set_mkey(&mut self, mkey: ValueString<'a>) {
        self.name = mkey;
    }
}

impl<'a> WithSchema for SystemAutomationActionState<'a> {
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
                    "name" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Action name"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "description" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Free form description"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "action_type" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("What the action does, for example `webhook` or `cli-script`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "system_action" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("System operation for `system-actions` type"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "protocol" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Webhook protocol, `http` or `https`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "uri" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Webhook request URI"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "http_body" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Webhook request body"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "port" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Webhook port"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "verify_host_cert" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Verify the webhook server certificate"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "script" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("CLI script for `cli-script` type"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "output_size" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Maximum script output in megabytes"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "timeout" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Execution timeout in seconds, 0 for none"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "execute_security_fabric" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Run the action on every Security Fabric member"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "accprofile" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Access profile the script runs under"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "email_to" => Attribute {
                        attr_type: AttributeType::List(AttributeType::String.into()),
                        description: Description::plain("Email recipients"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "email_from" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Email sender"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "email_subject" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Email subject"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                blocks: map! {
                    "http_headers" => NestedBlock::List(Block {
                        attributes: map! {
                            "id" => Attribute {
                                attr_type: AttributeType::Number,
                                description: Description::plain("Header entry ID"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "key" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Header name"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                            "value" => Attribute {
                                attr_type: AttributeType::String,
                                description: Description::plain("Header value"),
                                constraint: AttributeConstraint::Optional,
                                ..Default::default()
                            },
                        },
                        description: Description::plain("Extra webhook request headers"),
                        ..Default::default()
                    }),
                },
                description: Description::plain("Automation stitch action of the device"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for SystemAutomationActionState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_choice(
            diags,
            attr_path.clone(),
            "action_type",
            &self.action_type,
            &["email", "system-actions", "webhook", "cli-script"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "system_action",
            &self.system_action,
            &["reboot", "shutdown", "backup-config"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "protocol",
            &self.protocol,
            &["http", "https"],
        );
        validate_choice(
            diags,
            attr_path,
            "verify_host_cert",
            &self.verify_host_cert,
            &["enable", "disable"],
        );
    }
}

impl<'a> WithNormalize for SystemAutomationActionState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.id.is_null() {
            self.id = Value::Unknown;
        }
    }
}

impl<'a> WithExpand for SystemAutomationActionState<'a> {
    fn expand(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        set_str(&mut obj, "name", &self.name);
        set_str(&mut obj, "description", &self.description);
        set_str(&mut obj, "action-type", &self.action_type);
        set_str(&mut obj, "system-action", &self.system_action);
        set_str(&mut obj, "protocol", &self.protocol);
        set_str(&mut obj, "uri", &self.uri);
        set_str(&mut obj, "http-body", &self.http_body);
        set_i64(&mut obj, "port", &self.port);
        set_str(&mut obj, "verify-host-cert", &self.verify_host_cert);
        set_str(&mut obj, "script", &self.script);
        set_i64(&mut obj, "output-size", &self.output_size);
        set_i64(&mut obj, "timeout", &self.timeout);
        set_str(&mut obj, "execute-security-fabric", &self.execute_security_fabric);
        set_str(&mut obj, "accprofile", &self.accprofile);
        set_str_list(&mut obj, "email-to", &self.email_to);
        set_str(&mut obj, "email-from", &self.email_from);
        set_str(&mut obj, "email-subject", &self.email_subject);
        set_table(&mut obj, "http-headers", &self.http_headers, |header| {
            let mut row = JsonObject::new();
            set_i64(&mut row, "id", &header.id);
            set_str(&mut row, "key", &header.key);
            set_str(&mut row, "value", &header.value);
            JsonValue::Object(row)
        });
        JsonValue::Object(obj)
    }
}

impl<'a> WithFlatten for SystemAutomationActionState<'a> {
    fn flatten(&mut self, obj: &JsonValue) {
        self.name = get_str(obj, "name");
        self.description = get_str(obj, "description");
        self.action_type = get_str(obj, "action-type");
        self.system_action = get_str(obj, "system-action");
        self.protocol = get_str(obj, "protocol");
        self.uri = get_str(obj, "uri");
        self.http_body = get_str(obj, "http-body");
        self.port = get_i64(obj, "port");
        self.verify_host_cert = get_str(obj, "verify-host-cert");
        self.script = get_str(obj, "script");
        self.output_size = get_i64(obj, "output-size");
        self.timeout = get_i64(obj, "timeout");
        self.execute_security_fabric = get_str(obj, "execute-security-fabric");
        self.accprofile = get_str(obj, "accprofile");
        self.email_to = get_str_list(obj, "email-to");
        self.email_from = get_str(obj, "email-from");
        self.email_subject = get_str(obj, "email-subject");
        self.http_headers = get_table(obj, "http-headers", |row| AutomationHttpHeader {
            id: get_i64(row, "id"),
            key: get_str(row, "key"),
            value: get_str(row, "value"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn webhook_actions_expand_with_headers() {
        let state = SystemAutomationActionState {
            name: Value::Value(Cow::from("notify-ops")),
            action_type: Value::Value(Cow::from("webhook")),
            protocol: Value::Value(Cow::from("https")),
            uri: Value::Value(Cow::from("hooks.example.com/fabric")),
            port: Value::Value(443),
            http_headers: Value::Value(vec![Value::Value(AutomationHttpHeader {
                id: Value::Value(1),
                key: Value::Value(Cow::from("Authorization")),
                value: Value::Value(Cow::from("Bearer abc")),
            })]),
            ..Default::default()
        };
        assert_eq!(
            state.expand(),
            json!({
                "name": "notify-ops",
                "action-type": "webhook",
                "protocol": "https",
                "uri": "hooks.example.com/fabric",
                "port": 443,
                "http-headers": [
                    {"id": 1, "key": "Authorization", "value": "Bearer abc"},
                ],
            }),
        );
    }

    #[test]
    fn email_recipients_survive_scalar_answers() {
        let mut state = SystemAutomationActionState::default();
        state.flatten(&json!({
            "name": "mail-admins",
            "action-type": "email",
            "email-to": "noc@example.com ops@example.com",
        }));
        assert_eq!(
            state.email_to,
            Value::Value(vec![
                Value::Value(Cow::from("noc@example.com")),
                Value::Value(Cow::from("ops@example.com")),
            ]),
        );
        assert_eq!(state.mkey(), Value::Value(Cow::from("mail-admins")));
    }

    #[tokio::test]
    async fn action_type_is_checked() {
        let state = SystemAutomationActionState {
            action_type: Value::Value(Cow::from("carrier-pigeon")),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, Default::default()).await;
        assert!(!diags.errors.is_empty());
    }
}
