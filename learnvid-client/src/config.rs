/* This file is part of the learnvid project
*
*  Copyright (C) 2026 the learnvid contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use std::{fs::File, io::{self, Read, Write}, path::Path, time::Duration};

use cloneable_errors::{bail, ErrorContext, ResContext};
use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BACKEND_URL, DEFAULT_CACHE_FRESHNESS, DEFAULT_REQWEST_TIMEOUT};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the backend API, endpoint paths are appended to it
    pub backend_url: String,
    /// Sent as a bearer token, obtaining one is up to the identity provider
    pub auth_token: Option<String>,
    /// Opaque id of the signed in user, needed for per-user status lookups
    pub principal: Option<String>,
    pub reqwest_timeout_secs: f64,
    /// How long fetched data is served from the cache before being refetched
    pub cache_freshness_secs: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            auth_token: None,
            principal: None,
            reqwest_timeout_secs: DEFAULT_REQWEST_TIMEOUT.as_secs_f64(),
            cache_freshness_secs: DEFAULT_CACHE_FRESHNESS.as_secs_f64(),
        }
    }
}

impl ClientConfig {
    /// Reads the config from `path`, writing out the defaults if the file doesn't exist yet
    pub fn load_or_create(path: &Path) -> Result<ClientConfig, ErrorContext> {
        let path_str = path.display();
        let cfg = match File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).with_context(|| format!("Failed to read {path_str}"))?;
                toml::from_str::<ClientConfig>(&contents).with_context(|| format!("Failed to deserialize contents of {path_str}"))?
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let cfg = ClientConfig::default();
                let serialized = toml::to_string(&cfg).context("Failed to serialize default ClientConfig as TOML")?;
                let mut file = File::options().write(true).create_new(true).open(path).with_context(|| format!("Failed to create {path_str}"))?;
                write!(file, "{serialized}").with_context(|| format!("Failed to write serialized default ClientConfig to {path_str}"))?;
                info!("Wrote default configuration to {path_str}");
                cfg
            },
            Err(e) => return Err(e).with_context(|| format!("Failed to open {path_str}")),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ErrorContext> {
        if self.backend_url.trim().is_empty() {
            bail!("Invalid configuration - backend_url is empty");
        }
        self.reqwest_timeout()?;
        self.cache_freshness()?;
        Ok(())
    }

    pub fn reqwest_timeout(&self) -> Result<Duration, ErrorContext> {
        Duration::try_from_secs_f64(self.reqwest_timeout_secs).context("Invalid configuration - reqwest_timeout_secs must be a non-negative number")
    }

    pub fn cache_freshness(&self) -> Result<Duration, ErrorContext> {
        Duration::try_from_secs_f64(self.cache_freshness_secs).context("Invalid configuration - cache_freshness_secs must be a non-negative number")
    }
}
