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

//! Types exchanged with the learnvid backend

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error stack returned in the body of failed backend responses
pub use cloneable_errors::SerializableError as ApiError;

pub type RcStr = Arc<str>;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[derive(strum::Display, strum::EnumString, strum::VariantNames)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum VideoStatus {
    Watched,
    #[default]
    NoResponse,
    NotInterested,
    WatchLater,
}

impl VideoStatus {
    /// Statuses a user can pick themselves, `NoResponse` is only ever the starting state
    pub const SELECTABLE: [VideoStatus; 3] = [VideoStatus::Watched, VideoStatus::WatchLater, VideoStatus::NotInterested];

    pub fn is_responded(self) -> bool {
        self != VideoStatus::NoResponse
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[derive(strum::Display, strum::EnumString, strum::VariantNames)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoleInfo {
    pub role: UserRole,
    pub is_admin: bool,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct NewVideo {
    pub url: RcStr,
    pub title: RcStr,
    pub thumbnail_url: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(default)]
pub struct AdminDashboard {
    pub videos: Vec<RcStr>,
    /// opaque engagement records, only counted by the frontend
    pub records: Vec<RcStr>,
}

impl AdminDashboard {
    pub fn video_count(&self) -> usize {
        self.videos.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct SetStatusRequest {
    pub video_id: RcStr,
    pub status: VideoStatus,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct AssignRoleRequest {
    pub user: RcStr,
    pub role: UserRole,
}
