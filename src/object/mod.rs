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
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tf_provider::value::{Value, ValueString};
use tf_provider::Diagnostics;

use crate::client::{Config, FortiClient};
use crate::utils::{WithExpand, WithFlatten, WithNormalize, WithSchema, WithValidate};

mod data_source;
mod resource;

pub(crate) use data_source::FmgDataSource;
pub(crate) use resource::FmgResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectScope {
    /// Lives under `/pm/config/device/<device>/vdom/<vdom>/...`
    Vdom,
    /// Lives under `/pm/config/device/<device>/global/...`
    Global,
}

/// One device-level configuration object of the FortiManager API.
///
/// Implementors are zero sized markers. The whole CRUD behavior is
/// derived from the constants here and from the trait impls carried by
/// the associated state type.
pub(crate) trait FmgObject: Send + Sync + 'static {
    /// Resource name as exposed to Terraform, without provider prefix.
    const NAME: &'static str;
    /// API path relative to the device or vdom root.
    const PATH: &'static str;
    const SCOPE: ObjectScope;
    /// Attribute holding the member key for table objects, `None` for
    /// singletons such as `router/isis`.
    const MKEY: Option<&'static str>;

    type State<'a>: Send
        + Sync
        + Clone
        + std::fmt::Debug
        + Default
        + PartialEq
        + Serialize
        + Deserialize<'a>
        + ObjectState<'a>
        + WithSchema
        + WithValidate
        + WithNormalize
        + WithExpand
        + WithFlatten;
}

/// Field access shared by all object states.
///
/// The getters clone, the values are cheap tri-state wrappers.
pub(crate) trait ObjectState<'a> {
    fn id(&self) -> ValueString<'a>;
    fn set_id(&mut self, id: ValueString<'a>);
    fn device_name(&self) -> ValueString<'a>;
    fn set_device_name(&mut self, name: ValueString<'a>);
    fn device_vdom(&self) -> ValueString<'a> {
        Value::Null
    }
    fn set_device_vdom(&mut self, _vdom: ValueString<'a>) {}
    fn mkey(&self) -> ValueString<'a> {
        Value::Null
    }
    fn set_mkey(&mut self, _mkey: ValueString<'a>) {}
}

/// Connection slot shared between the provider and every resource.
///
/// Resources are handed out before `configure` runs, so the client
/// appears behind this handle only once the provider block has been
/// processed.
#[derive(Clone, Default)]
pub(crate) struct ClientHandle(Arc<OnceLock<FortiClient>>);

impl ClientHandle {
    pub(crate) fn configure(&self, client: FortiClient) -> bool {
        self.0.set(client).is_ok()
    }

    pub(crate) fn client(&self, diags: &mut Diagnostics) -> Option<&FortiClient> {
        let client = self.0.get();
        if client.is_none() {
            diags.root_error(
                "Provider is not configured",
                "The fmgdevice provider must be configured before its resources can be used.",
            );
        }
        client
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("configured", &self.0.get().is_some())
            .finish()
    }
}

/// Device (and vdom) a request is routed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Target {
    pub(crate) device: String,
    pub(crate) vdom: Option<String>,
}

/// Pick the target device out of the state, falling back to the
/// provider defaults.
pub(crate) fn resolve_target<T: FmgObject>(
    diags: &mut Diagnostics,
    state: &T::State<'_>,
    cfg: &Config,
) -> Option<Target> {
    let device_name = state.device_name();
    let device = match device_name.as_deref_option() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => match &cfg.device_name {
            Some(name) => name.clone(),
            None => {
                diags.root_error(
                    format!("`device_name` is missing for {}", T::NAME),
                    "Set `device_name` on the resource or give the provider a default device.",
                );
                return None;
            }
        },
    };
    let vdom = match T::SCOPE {
        ObjectScope::Global => None,
        ObjectScope::Vdom => {
            let device_vdom = state.device_vdom();
            Some(match device_vdom.as_deref_option() {
                Some(vdom) if !vdom.is_empty() => vdom.to_string(),
                _ => cfg.device_vdom.clone().unwrap_or_else(|| "root".to_string()),
            })
        }
    };
    Some(Target { device, vdom })
}

pub(crate) fn object_url(target: &Target, path: &str) -> String {
    match &target.vdom {
        Some(vdom) => format!(
            "/pm/config/device/{}/vdom/{}/{}",
            target.device, vdom, path
        ),
        None => format!("/pm/config/device/{}/global/{}", target.device, path),
    }
}

pub(crate) fn item_url(target: &Target, path: &str, mkey: &str) -> String {
    format!("{}/{}", object_url(target, path), mkey)
}

/// URL of the one object addressed by the state. Table objects need
/// their member key for that.
pub(crate) fn read_url<T: FmgObject>(
    diags: &mut Diagnostics,
    target: &Target,
    state: &T::State<'_>,
) -> Option<String> {
    match T::MKEY {
        Some(attr) => {
            let mkey = state.mkey();
            match mkey.as_deref_option() {
                Some(key) if !key.is_empty() => Some(item_url(target, T::PATH, key)),
                _ => {
                    diags.root_error(
                        format!("`{attr}` is missing for {}", T::NAME),
                        format!("The `{attr}` attribute identifies the object and must be set."),
                    );
                    None
                }
            }
        }
        None => Some(object_url(target, T::PATH)),
    }
}

/// Value stored as the Terraform ID once the object exists: the member
/// key for tables, the resource name for singletons.
pub(crate) fn resolved_id<'a, T: FmgObject>(state: &T::State<'a>) -> ValueString<'a> {
    if T::MKEY.is_some() {
        state.mkey()
    } else {
        Value::Value(Cow::Borrowed(T::NAME))
    }
}

/// Split an import ID into its bare member key and its `key=value`
/// options.
pub(crate) fn parse_import_id(id: &str) -> (Option<String>, BTreeMap<String, String>) {
    let mut mkey = None;
    let mut options = BTreeMap::new();
    for part in id.split(',') {
        if part.is_empty() {
            continue;
        }
        match part.split_once('=') {
            Some((key, value)) => {
                options.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => mkey = Some(part.trim().to_string()),
        }
    }
    (mkey, options)
}

/// Fill holes in the parsed import options with the provider wide
/// `import_options` entries.
pub(crate) fn merge_import_options(options: &mut BTreeMap<String, String>, defaults: &[String]) {
    for entry in defaults {
        if let Some((key, value)) = entry.split_once('=') {
            options
                .entry(key.trim().to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_follow_the_device_tree() {
        let vdom = Target {
            device: "FGT1".to_string(),
            vdom: Some("root".to_string()),
        };
        let global = Target {
            device: "FGT1".to_string(),
            vdom: None,
        };
        assert_eq!(
            object_url(&vdom, "router/isis"),
            "/pm/config/device/FGT1/vdom/root/router/isis",
        );
        assert_eq!(
            object_url(&global, "system/automation-action"),
            "/pm/config/device/FGT1/global/system/automation-action",
        );
        assert_eq!(
            item_url(&vdom, "system/sdwan/health-check", "hc1"),
            "/pm/config/device/FGT1/vdom/root/system/sdwan/health-check/hc1",
        );
    }

    #[test]
    fn import_ids_split_into_key_and_options() {
        let (mkey, options) = parse_import_id("hc1,device_name=FGT1,device_vdom=root");
        assert_eq!(mkey.as_deref(), Some("hc1"));
        assert_eq!(options.get("device_name").map(String::as_str), Some("FGT1"));
        assert_eq!(options.get("device_vdom").map(String::as_str), Some("root"));

        let (mkey, options) = parse_import_id("device_name=FGT1");
        assert_eq!(mkey, None);
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn provider_options_only_fill_missing_keys() {
        let (_, mut options) = parse_import_id("hc1,device_name=FGT1");
        merge_import_options(
            &mut options,
            &[
                "device_name=OTHER".to_string(),
                "device_vdom=root".to_string(),
            ],
        );
        assert_eq!(options.get("device_name").map(String::as_str), Some("FGT1"));
        assert_eq!(options.get("device_vdom").map(String::as_str), Some("root"));
    }
}
