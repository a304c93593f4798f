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

use std::borrow::Cow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, Resource};

use crate::client::{FortiClient, Verb};
use crate::object::ClientHandle;

use super::parse_content;

/// Raw JSON-RPC escape hatch. Runs one API call on create and again on
/// every change, keeps the last answer in `response`, and never
/// refreshes. For the object types the provider does not model.
#[derive(Debug, Clone)]
pub(crate) struct JsonGenericResource {
    handle: ClientHandle,
}

impl JsonGenericResource {
    pub(crate) fn new(handle: ClientHandle) -> Self {
        Self { handle }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct JsonGenericState<'a> {
    pub id: ValueString<'a>,
    pub path: ValueString<'a>,
    pub method: ValueString<'a>,
    pub json_content: ValueString<'a>,
    pub response: ValueString<'a>,
    pub force_recreate: ValueString<'a>,
}

impl JsonGenericState<'_> {
    fn verb(&self, diags: &mut Diagnostics) -> Option<Verb> {
        let name = self.method.as_deref_option().unwrap_or("set");
        match name.parse() {
            Ok(verb) => Some(verb),
            Err(err) => {
                diags.error(
                    "Invalid value for `method`",
                    err.to_string(),
                    AttributePath::new("method"),
                );
                None
            }
        }
    }

    async fn execute<'a>(
        &self,
        diags: &mut Diagnostics,
        client: &FortiClient,
    ) -> Option<ValueString<'a>> {
        let verb = self.verb(diags)?;
        let Some(path) = self.path.as_deref_option() else {
            diags.root_error(
                "`path` is missing",
                "A raw API call needs the url of the object to touch.",
            );
            return None;
        };
        let data = parse_content(diags, &self.json_content).ok()?;

        match client.run(verb, path, data).await {
            Ok(answer) => Some(Value::Value(Cow::Owned(answer.to_string()))),
            Err(err) => {
                diags.root_error(
                    format!("Failed to {verb} {path}"),
                    err.to_string(),
                );
                None
            }
        }
    }
}

#[async_trait]
impl Resource for JsonGenericResource {
    type State<'a> = JsonGenericState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Resource identifier"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "path" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("API url of the call, for example `/pm/config/device/{device}/vdom/{vdom}/system/interface`"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "method" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("JSON-RPC method, `get`, `add`, `set`, `update`, `delete`, or `exec`, `set` if unset"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "json_content" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Request data as JSON text"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "response" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Answer of the last call as JSON text"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "force_recreate" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Changing this value re-runs the call through destroy and create"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("Raw JSON-RPC call against the FortiManager"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if !config.method.is_null() && !config.method.is_unknown() {
            config.verb(diags);
        }
        _ = parse_content(diags, &config.json_content);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        _diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        // a raw call has nothing to refresh against
        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state.clone();
        state.id = ValueString::Unknown;
        state.response = ValueString::Unknown;

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let mut state = proposed_state.clone();
        state.id = prior_state.id.clone();
        state.response = ValueString::Unknown;

        let mut trigger_replace = Vec::new();
        if state.force_recreate != prior_state.force_recreate {
            trigger_replace.push(AttributePath::new("force_recreate"));
            state.id = ValueString::Unknown;
        }

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.handle.client(diags)?;
        let mut state = planned_state.clone();

        state.response = state.execute(diags, client).await?;
        state.id = state.path.clone();

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.handle.client(diags)?;
        let mut state = planned_state.clone();

        state.response = state.execute(diags, client).await?;
        state.id = prior_state.id.clone();

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        // nothing to undo, the call already happened
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = JsonGenericState {
            id: Value::Value(Cow::Owned(id.clone())),
            path: Value::Value(Cow::Owned(id)),
            response: ValueString::Unknown,
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_default_method_is_set() {
        let mut diags = Diagnostics::default();
        let state = JsonGenericState::default();
        assert_eq!(state.verb(&mut diags), Some(Verb::Set));

        let state = JsonGenericState {
            method: Value::Value(Cow::from("exec")),
            ..Default::default()
        };
        assert_eq!(state.verb(&mut diags), Some(Verb::Exec));
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn unknown_methods_are_rejected() {
        let mut diags = Diagnostics::default();
        let state = JsonGenericState {
            method: Value::Value(Cow::from("patch")),
            ..Default::default()
        };
        assert_eq!(state.verb(&mut diags), None);
        assert!(!diags.errors.is_empty());
    }
}
