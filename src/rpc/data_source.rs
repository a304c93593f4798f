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
use tf_provider::{map, DataSource, Diagnostics};

use crate::object::ClientHandle;

use super::parse_content;

/// Raw JSON-RPC `get`, the read only side of the escape hatch.
#[derive(Debug, Clone)]
pub(crate) struct JsonRpcDataSource {
    handle: ClientHandle,
}

impl JsonRpcDataSource {
    pub(crate) fn new(handle: ClientHandle) -> Self {
        Self { handle }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct JsonRpcState<'a> {
    pub path: ValueString<'a>,
    pub json_content: ValueString<'a>,
    pub response: ValueString<'a>,
}

#[async_trait]
impl DataSource for JsonRpcDataSource {
    type State<'a> = JsonRpcState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "path" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("API url to fetch"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "json_content" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Request data as JSON text, filters for example"),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "response" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Answer as JSON text"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("Raw JSON-RPC fetch from the FortiManager"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        _ = parse_content(diags, &config.json_content);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.handle.client(diags)?;
        let Some(path) = config.path.as_deref_option() else {
            diags.root_error(
                "`path` is missing",
                "A raw API fetch needs the url of the object to read.",
            );
            return None;
        };
        let data = parse_content(diags, &config.json_content).ok()?;

        match client.run(crate::client::Verb::Get, path, data).await {
            Ok(answer) => {
                let mut state = config.clone();
                state.response = Value::Value(Cow::Owned(answer.to_string()));
                Some(state)
            }
            Err(err) => {
                diags.root_error(format!("Failed to get {path}"), err.to_string());
                None
            }
        }
    }
}
