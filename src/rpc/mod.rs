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

use serde_json::Value as JsonValue;

use tf_provider::value::ValueString;
use tf_provider::{AttributePath, Diagnostics};

mod data_source;
mod resource;

pub(crate) use data_source::JsonRpcDataSource;
pub(crate) use resource::JsonGenericResource;

/// Parse the optional request body of a raw API call.
fn parse_content(
    diags: &mut Diagnostics,
    content: &ValueString<'_>,
) -> Result<Option<JsonValue>, ()> {
    let Some(text) = content.as_deref_option() else {
        return Ok(None);
    };
    match serde_json::from_str(text) {
        Ok(data) => Ok(Some(data)),
        Err(err) => {
            diags.error(
                "`json_content` is not valid JSON",
                err.to_string(),
                AttributePath::new("json_content"),
            );
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use tf_provider::value::Value;

    #[test]
    fn absent_content_is_no_body() {
        let mut diags = Diagnostics::default();
        assert_eq!(parse_content(&mut diags, &ValueString::Null), Ok(None));
        assert_eq!(parse_content(&mut diags, &ValueString::Unknown), Ok(None));
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn malformed_content_is_reported() {
        let mut diags = Diagnostics::default();
        let content: ValueString = Value::Value(Cow::from("{not json"));
        assert_eq!(parse_content(&mut diags, &content), Err(()));
        assert!(!diags.errors.is_empty());
    }
}
