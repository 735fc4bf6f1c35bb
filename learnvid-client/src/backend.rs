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

//! The remote data service the application is built around

use cloneable_errors::ErrorContext;
use futures::future::BoxFuture;
use learnvid_api::{AdminDashboard, NewVideo, RcStr, UserRole, VideoStatus};

pub type BackendResult<T> = Result<T, ErrorContext>;

/// Request/response operations exposed by the backend
///
/// All identifiers are opaque strings. Caller-scoped operations act on behalf of whoever the
/// backend authenticated the connection as.
pub trait RemoteDataService: Send + Sync {
    /// Returns the id assigned to the new video
    fn add_video(&self, video: NewVideo) -> BoxFuture<'_, BackendResult<RcStr>>;
    fn get_all_videos(&self) -> BoxFuture<'_, BackendResult<Vec<RcStr>>>;
    fn get_video(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<RcStr>>;

    fn get_user_video_status(&self, user: RcStr, video_id: RcStr) -> BoxFuture<'_, BackendResult<VideoStatus>>;
    fn set_user_video_status(&self, video_id: RcStr, status: VideoStatus) -> BoxFuture<'_, BackendResult<()>>;
    fn get_all_video_engagements(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<Vec<RcStr>>>;
    fn get_users_without_response(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<Vec<RcStr>>>;

    fn get_caller_user_role(&self) -> BoxFuture<'_, BackendResult<UserRole>>;
    fn is_caller_admin(&self) -> BoxFuture<'_, BackendResult<bool>>;
    fn assign_caller_user_role(&self, user: RcStr, role: UserRole) -> BoxFuture<'_, BackendResult<()>>;

    fn get_caller_user_profile(&self) -> BoxFuture<'_, BackendResult<Option<RcStr>>>;
    fn save_caller_user_profile(&self) -> BoxFuture<'_, BackendResult<()>>;
    fn get_user_profile(&self, user: RcStr) -> BoxFuture<'_, BackendResult<Option<RcStr>>>;

    fn get_admin_dashboard(&self) -> BoxFuture<'_, BackendResult<AdminDashboard>>;
}
