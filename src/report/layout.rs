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
    get_i64, get_joined, get_str, set_i64, set_str, validate_choice, JsonObject, WithExpand,
    WithFlatten, WithNormalize, WithSchema, WithValidate,
};

/// Scheduled report layout, `report/layout`. Vdom scoped, keyed by `name`.
///
/// `options` and `format` are flag sets, space joined in the state the
/// way the CLI prints them.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ReportLayout;

impl FmgObject for ReportLayout {
    const NAME: &'static str = "report_layout";
    const PATH: &'static str = "report/layout";
    const SCOPE: ObjectScope = ObjectScope::Vdom;
    const MKEY: Option<&'static str> = Some("name");

    type State<'a> = ReportLayoutState<'a>;
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ReportLayoutState<'a> {
    pub id: ValueString<'a>,
    pub device_name: ValueString<'a>,
    pub device_vdom: ValueString<'a>,
    pub name: ValueString<'a>,
    pub title: ValueString<'a>,
    pub subtitle: ValueString<'a>,
    pub description: ValueString<'a>,
    pub style_theme: ValueString<'a>,
    pub options: ValueString<'a>,
    pub format: ValueString<'a>,
    pub schedule_type: ValueString<'a>,
    pub day: ValueString<'a>,
    pub time: ValueString<'a>,
    pub cutoff_option: ValueString<'a>,
    pub cutoff_time: ValueString<'a>,
    pub email_send: ValueString<'a>,
    pub email_recipients: ValueString<'a>,
    pub max_pdf_report: ValueNumber,
}

impl<'a> ObjectState<'a> for ReportLayoutState<'a> {
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

impl<'a> WithSchema for ReportLayoutState<'a> {
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
                        description: Description::plain("Layout name"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "title" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Report title"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "subtitle" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Report subtitle"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "description" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Free form description"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "style_theme" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Style theme of the report"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "options" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Layout flags, for example `include-table-of-content`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "format" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Output formats, space separated"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "schedule_type" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("When the report runs, `demand`, `daily`, or `weekly`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "day" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Weekday of a weekly schedule"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "time" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Schedule time, `hh:mm`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "cutoff_option" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Data cutoff, `run-time` or `custom`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "cutoff_time" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Custom cutoff time, `hh:mm`"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "email_send" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Email the finished report"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "email_recipients" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Report recipients"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "max_pdf_report" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("PDF reports kept on disk"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("Scheduled report layout of the vdom"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for ReportLayoutState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        validate_choice(
            diags,
            attr_path.clone(),
            "schedule_type",
            &self.schedule_type,
            &["demand", "daily", "weekly"],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "day",
            &self.day,
            &[
                "sunday",
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
            ],
        );
        validate_choice(
            diags,
            attr_path.clone(),
            "cutoff_option",
            &self.cutoff_option,
            &["run-time", "custom"],
        );
        validate_choice(
            diags,
            attr_path,
            "email_send",
            &self.email_send,
            &["enable", "disable"],
        );
    }
}

impl<'a> WithNormalize for ReportLayoutState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.id.is_null() {
            self.id = Value::Unknown;
        }
    }
}

impl<'a> WithExpand for ReportLayoutState<'a> {
    fn expand(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        set_str(&mut obj, "name", &self.name);
        set_str(&mut obj, "title", &self.title);
        set_str(&mut obj, "subtitle", &self.subtitle);
        set_str(&mut obj, "description", &self.description);
        set_str(&mut obj, "style-theme", &self.style_theme);
        set_str(&mut obj, "options", &self.options);
        set_str(&mut obj, "format", &self.format);
        set_str(&mut obj, "schedule-type", &self.schedule_type);
        set_str(&mut obj, "day", &self.day);
        set_str(&mut obj, "time", &self.time);
        set_str(&mut obj, "cutoff-option", &self.cutoff_option);
        set_str(&mut obj, "cutoff-time", &self.cutoff_time);
        set_str(&mut obj, "email-send", &self.email_send);
        set_str(&mut obj, "email-recipients", &self.email_recipients);
        set_i64(&mut obj, "max-pdf-report", &self.max_pdf_report);
        JsonValue::Object(obj)
    }
}

impl<'a> WithFlatten for ReportLayoutState<'a> {
    fn flatten(&mut self, obj: &JsonValue) {
        self.name = get_str(obj, "name");
        self.title = get_str(obj, "title");
        self.subtitle = get_str(obj, "subtitle");
        self.description = get_str(obj, "description");
        self.style_theme = get_str(obj, "style-theme");
        // flag sets come back as arrays
        self.options = get_joined(obj, "options");
        self.format = get_joined(obj, "format");
        self.schedule_type = get_str(obj, "schedule-type");
        self.day = get_str(obj, "day");
        self.time = get_str(obj, "time");
        self.cutoff_option = get_str(obj, "cutoff-option");
        self.cutoff_time = get_str(obj, "cutoff-time");
        self.email_send = get_str(obj, "email-send");
        self.email_recipients = get_str(obj, "email-recipients");
        self.max_pdf_report = get_i64(obj, "max-pdf-report");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn flag_sets_flatten_to_joined_strings() {
        let mut state = ReportLayoutState::default();
        state.flatten(&json!({
            "name": "weekly-summary",
            "options": ["include-table-of-content", "view-chart-as-heading"],
            "format": ["pdf"],
            "schedule-type": "weekly",
            "day": "monday",
            "max-pdf-report": 31,
        }));
        assert_eq!(
            state.options,
            Value::Value(Cow::from("include-table-of-content view-chart-as-heading")),
        );
        assert_eq!(state.format, Value::Value(Cow::from("pdf")));
        assert_eq!(state.max_pdf_report, Value::Value(31));
    }

    #[tokio::test]
    async fn weekday_names_are_checked() {
        let state = ReportLayoutState {
            day: Value::Value(Cow::from("caturday")),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, Default::default()).await;
        assert!(!diags.errors.is_empty());
    }
}
