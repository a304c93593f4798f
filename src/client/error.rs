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

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid hostname: {0}")]
    InvalidHost(#[from] url::ParseError),

    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("connection failed: {0}")]
    Connect(reqwest::Error),

    #[error("request failed: {0}")]
    Http(reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed JSON-RPC envelope: {0}")]
    Envelope(String),

    #[error("login failed: {0}")]
    Auth(String),

    #[error("object does not exist at {0}")]
    NotFound(String),

    #[error("API error {code} on {url}: {message}")]
    Api {
        code: i64,
        message: String,
        url: String,
    },

    #[error("unsupported method `{0}`")]
    Method(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err)
        } else if err.is_connect() {
            Error::Connect(err)
        } else if err.is_decode() {
            Error::Envelope(err.to_string())
        } else {
            Error::Http(err)
        }
    }
}

impl Error {
    /// Worth a replay: the request may never have reached the device.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout(_) | Error::Connect(_) | Error::Http(_) => true,
            Error::Status(status) => status.is_server_error(),
            _ => false,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
