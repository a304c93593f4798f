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

use std::marker::PhantomData;

use async_trait::async_trait;

use tf_provider::schema::{AttributeConstraint, Schema};
use tf_provider::value::ValueEmpty;
use tf_provider::{DataSource, Diagnostics};

use crate::utils::{WithFlatten, WithSchema, WithValidate};

use super::{read_url, resolve_target, resolved_id, ClientHandle, FmgObject, ObjectState};

/// Read-only view on one FortiManager object type.
///
/// Shares the state type with the resource. Every attribute turns
/// computed except the member key and the device targeting.
pub(crate) struct FmgDataSource<T: FmgObject> {
    handle: ClientHandle,
    object: PhantomData<fn() -> T>,
}

impl<T: FmgObject> FmgDataSource<T> {
    pub(crate) fn new(handle: ClientHandle) -> Self {
        Self {
            handle,
            object: PhantomData,
        }
    }
}

impl<T: FmgObject> Clone for FmgDataSource<T> {
    fn clone(&self) -> Self {
        Self::new(self.handle.clone())
    }
}

impl<T: FmgObject> std::fmt::Debug for FmgDataSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmgDataSource")
            .field("object", &T::NAME)
            .field("handle", &self.handle)
            .finish()
    }
}

#[async_trait]
impl<T: FmgObject> DataSource for FmgDataSource<T> {
    type State<'a> = T::State<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        let mut schema = <T::State<'static> as WithSchema>::schema();
        for (name, attribute) in schema.block.attributes.iter_mut() {
            attribute.constraint = if Some(name.as_str()) == T::MKEY {
                AttributeConstraint::Required
            } else if name == "device_name" || name == "device_vdom" {
                AttributeConstraint::Optional
            } else {
                AttributeConstraint::Computed
            };
        }
        Some(schema)
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, Default::default()).await;

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
        let target = resolve_target::<T>(diags, &config, client.config())?;
        let url = read_url::<T>(diags, &target, &config)?;

        match client.get(&url).await {
            Ok(Some(obj)) => {
                let mut state = config;
                state.flatten(&obj);
                let id = resolved_id::<T>(&state);
                state.set_id(id);
                Some(state)
            }
            Ok(None) => {
                diags.root_error(
                    format!("{} was not found", T::NAME),
                    format!("No object exists at {url}."),
                );
                None
            }
            Err(err) => {
                diags.root_error(
                    format!("Failed to read {} data source", T::NAME),
                    err.to_string(),
                );
                None
            }
        }
    }
}
