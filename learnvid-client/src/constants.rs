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
use std::{sync::LazyLock, time::Duration};

pub const CONFIG_PATH: &str = "config.toml";

pub static USER_AGENT: LazyLock<&'static str> = LazyLock::new(|| format!("learnvid/{}", env!("CARGO_PKG_VERSION")).leak());

/// Shown instead of a thumbnail when none was provided or derived
pub const DEFAULT_THUMBNAIL: &str = "/assets/generated/app-logo.dim_256x256.png";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:9292/api";
pub const DEFAULT_REQWEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_CACHE_FRESHNESS: Duration = Duration::from_secs(30);

// Query cache key roots

pub const VIDEOS_KEY: &str          = "videos";
pub const VIDEO_STATUS_KEY: &str    = "videoStatus";
pub const USER_ROLE_KEY: &str       = "userRole";
pub const ADMIN_DASHBOARD_KEY: &str = "adminDashboard";
pub const CALLER_PROFILE_KEY: &str  = "currentUserProfile";
