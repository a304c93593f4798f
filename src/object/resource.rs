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
use std::marker::PhantomData;

use async_trait::async_trait;

use tf_provider::value::{Value, ValueEmpty, ValueString};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::client::Error;
use crate::utils::{WithExpand, WithFlatten, WithNormalize, WithSchema, WithValidate};

use super::{
    merge_import_options, object_url, parse_import_id, read_url, resolve_target, resolved_id,
    ClientHandle, FmgObject, ObjectScope, ObjectState,
};

/// Terraform resource for one FortiManager object type.
///
/// Create maps to `add` for tables and `set` for singletons, update to
/// `update` and `set` respectively, destroy to `delete`. Applied states
/// are kept exactly as planned, only the `id` is filled in, so the
/// device answer never fights with the plan.
pub(crate) struct FmgResource<T: FmgObject> {
    handle: ClientHandle,
    object: PhantomData<fn() -> T>,
}

impl<T: FmgObject> FmgResource<T> {
    pub(crate) fn new(handle: ClientHandle) -> Self {
        Self {
            handle,
            object: PhantomData,
        }
    }
}

impl<T: FmgObject> Clone for FmgResource<T> {
    fn clone(&self) -> Self {
        Self::new(self.handle.clone())
    }
}

impl<T: FmgObject> std::fmt::Debug for FmgResource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmgResource")
            .field("object", &T::NAME)
            .field("handle", &self.handle)
            .finish()
    }
}

#[async_trait]
impl<T: FmgObject> Resource for FmgResource<T> {
    type State<'a> = T::State<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(<T::State<'static> as WithSchema>::schema())
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
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.handle.client(diags)?;
        let target = resolve_target::<T>(diags, &state, client.config())?;
        let url = read_url::<T>(diags, &target, &state)?;

        match client.get(&url).await {
            Ok(Some(obj)) => {
                let mut state = state;
                state.flatten(&obj);
                if state.id().is_null() {
                    let id = resolved_id::<T>(&state);
                    state.set_id(id);
                }
                Some((state, private_state))
            }
            Ok(None) => {
                // gone outside of Terraform, drop it from the state
                diags.root_warning(
                    format!("{} no longer exists", T::NAME),
                    format!("The object at {url} is gone and is removed from the state."),
                );
                None
            }
            Err(err) => {
                diags.root_error(
                    format!("Failed to read {} resource", T::NAME),
                    err.to_string(),
                );
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state.clone();
        state.set_id(ValueString::Unknown);
        state.normalize(diags);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
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
        state.set_id(prior_state.id());
        state.normalize(diags);

        // moving the object to another device, vdom, or key recreates it
        let mut trigger_replace = Vec::new();
        if state.device_name() != prior_state.device_name() {
            trigger_replace.push(AttributePath::new("device_name"));
        }
        if T::SCOPE == ObjectScope::Vdom && state.device_vdom() != prior_state.device_vdom() {
            trigger_replace.push(AttributePath::new("device_vdom"));
        }
        if let Some(attr) = T::MKEY {
            if state.mkey() != prior_state.mkey() {
                trigger_replace.push(AttributePath::new(attr));
            }
        }
        if !trigger_replace.is_empty() {
            state.set_id(ValueString::Unknown);
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
        state.normalize(diags);

        let target = resolve_target::<T>(diags, &state, client.config())?;
        let url = object_url(&target, T::PATH);
        let data = state.expand();

        let result = if T::MKEY.is_some() {
            client.add(&url, data).await
        } else {
            // singletons always exist, creating one takes it over
            client.set(&url, data).await
        };
        if let Err(err) = result {
            diags.root_error(
                format!("Failed to create {} resource", T::NAME),
                err.to_string(),
            );
            return None;
        }

        let id = resolved_id::<T>(&state);
        state.set_id(id);

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
        state.set_id(prior_state.id());
        state.normalize(diags);

        let target = resolve_target::<T>(diags, &state, client.config())?;
        let url = read_url::<T>(diags, &target, &state)?;
        let data = state.expand();

        let result = if T::MKEY.is_some() {
            client.update(&url, data).await
        } else {
            client.set(&url, data).await
        };
        if let Err(err) = result {
            diags.root_error(
                format!("Failed to update {} resource", T::NAME),
                err.to_string(),
            );
            return None;
        }

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.handle.client(diags)?;
        let target = resolve_target::<T>(diags, &state, client.config())?;
        let url = read_url::<T>(diags, &target, &state)?;

        // deleting a singleton resets it to the firmware defaults
        match client.delete(&url).await {
            Ok(()) | Err(Error::NotFound(_)) => Some(()),
            Err(err) => {
                diags.root_error(
                    format!("Failed to delete {} resource", T::NAME),
                    err.to_string(),
                );
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.handle.client(diags)?;
        let (mkey, mut options) = parse_import_id(&id);
        merge_import_options(&mut options, &client.config().import_options);

        let mut state: Self::State<'a> = Default::default();
        if let Some(device) = options.remove("device_name") {
            state.set_device_name(Value::Value(Cow::Owned(device)));
        }
        if let Some(vdom) = options.remove("device_vdom") {
            if T::SCOPE == ObjectScope::Vdom {
                state.set_device_vdom(Value::Value(Cow::Owned(vdom)));
            }
        }
        if let Some(attr) = T::MKEY {
            let mkey = mkey.or_else(|| options.remove(attr));
            match mkey {
                Some(key) if !key.is_empty() => state.set_mkey(Value::Value(Cow::Owned(key))),
                _ => {
                    diags.root_error(
                        format!("Invalid import ID for {}", T::NAME),
                        format!(
                            "The import ID must carry the object `{attr}`, \
                             e.g. `<{attr}>,device_name=<device>`."
                        ),
                    );
                    return None;
                }
            }
        }
        if !options.is_empty() {
            let keys: Vec<String> = options.into_keys().collect();
            diags.root_warning(
                "Ignored import options",
                format!("Unknown keys: {}.", keys.join(", ")),
            );
        }

        let id = resolved_id::<T>(&state);
        state.set_id(id);
        state.normalize(diags);

        Some((state, Default::default()))
    }
}
