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
use std::sync::Arc;

use cloneable_errors::{bail, ErrorContext, ResContext};
use futures::{join, FutureExt};
use learnvid_api::{AdminDashboard, NewVideo, RcStr, RoleInfo, UserRole, VideoStatus};
use log::info;

use crate::{
    backend::RemoteDataService,
    cache::{CacheStats, QueryKey, QueryCache},
    config::ClientConfig,
    constants::{ADMIN_DASHBOARD_KEY, CALLER_PROFILE_KEY, USER_ROLE_KEY, VIDEOS_KEY, VIDEO_STATUS_KEY},
};

/// Cached queries and cache-invalidating mutations on top of a [`RemoteDataService`]
#[derive(Clone)]
pub struct VideoClient {
    backend: Arc<dyn RemoteDataService>,
    principal: Option<RcStr>,
    videos: QueryCache<Arc<[RcStr]>>,
    statuses: QueryCache<VideoStatus>,
    roles: QueryCache<RoleInfo>,
    dashboard: QueryCache<Arc<AdminDashboard>>,
    profile: QueryCache<Option<RcStr>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientCacheStats {
    pub videos: CacheStats,
    pub statuses: CacheStats,
    pub roles: CacheStats,
    pub dashboard: CacheStats,
    pub profile: CacheStats,
}

impl VideoClient {
    pub fn new(backend: Arc<dyn RemoteDataService>, config: &ClientConfig) -> Result<VideoClient, ErrorContext> {
        let freshness = config.cache_freshness()?;
        Ok(VideoClient {
            backend,
            principal: config.principal.as_deref().filter(|p| !p.is_empty()).map(Arc::from),
            videos: QueryCache::new(freshness),
            statuses: QueryCache::new(freshness),
            roles: QueryCache::new(freshness),
            dashboard: QueryCache::new(freshness),
            profile: QueryCache::new(freshness),
        })
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    // Videos

    pub async fn all_videos(&self) -> Result<Arc<[RcStr]>, ErrorContext> {
        let backend = self.backend.clone();
        self.videos.get_or_fetch(QueryKey::new([VIDEOS_KEY]), move || async move {
            backend.get_all_videos().await.map(Arc::<[RcStr]>::from)
        }.boxed()).await
    }

    /// Every video paired with the principal's status for it
    ///
    /// Statuses are left out entirely when no principal is configured.
    pub async fn video_overview(&self) -> Result<Vec<(RcStr, Option<VideoStatus>)>, ErrorContext> {
        let videos = self.all_videos().await?;
        let mut overview = Vec::with_capacity(videos.len());
        for id in videos.iter() {
            let status = match self.principal {
                Some(_) => Some(self.my_video_status(id).await?),
                None => None,
            };
            overview.push((id.clone(), status));
        }
        Ok(overview)
    }

    pub async fn video(&self, video_id: &str) -> Result<RcStr, ErrorContext> {
        self.backend.get_video(video_id.into()).await
    }

    /// Adds a video and drops the cached video list
    pub async fn add_video(&self, video: NewVideo) -> Result<RcStr, ErrorContext> {
        let title = video.title.clone();
        let id = self.backend.add_video(video).await?;
        info!("Added video '{title}' as {id}");
        self.videos.invalidate(&[VIDEOS_KEY]).await;
        self.dashboard.invalidate(&[ADMIN_DASHBOARD_KEY]).await;
        Ok(id)
    }

    // Per-user statuses

    /// Looks up the status `user` picked for a video
    ///
    /// Without a user or a video there is nothing to ask the backend, the answer is always `NoResponse`.
    pub async fn user_video_status(&self, user: &str, video_id: &str) -> Result<VideoStatus, ErrorContext> {
        if user.is_empty() || video_id.is_empty() {
            return Ok(VideoStatus::NoResponse);
        }
        let backend = self.backend.clone();
        let (user, video_id): (RcStr, RcStr) = (user.into(), video_id.into());
        let key = QueryKey::new([RcStr::from(VIDEO_STATUS_KEY), user.clone(), video_id.clone()]);
        self.statuses.get_or_fetch(key, move || async move {
            backend.get_user_video_status(user, video_id).await
        }.boxed()).await
    }

    /// [`Self::user_video_status`] for the configured principal
    pub async fn my_video_status(&self, video_id: &str) -> Result<VideoStatus, ErrorContext> {
        self.user_video_status(self.principal().unwrap_or_default(), video_id).await
    }

    /// Records the caller's status for a video and drops every cached status
    pub async fn set_video_status(&self, video_id: &str, status: VideoStatus) -> Result<(), ErrorContext> {
        if video_id.is_empty() {
            bail!("Cannot set a status without a video id");
        }
        self.backend.set_user_video_status(video_id.into(), status).await?;
        self.statuses.invalidate(&[VIDEO_STATUS_KEY]).await;
        self.dashboard.invalidate(&[ADMIN_DASHBOARD_KEY]).await;
        Ok(())
    }

    pub async fn video_engagements(&self, video_id: &str) -> Result<Vec<RcStr>, ErrorContext> {
        self.backend.get_all_video_engagements(video_id.into()).await
    }

    pub async fn users_without_response(&self, video_id: &str) -> Result<Vec<RcStr>, ErrorContext> {
        self.backend.get_users_without_response(video_id.into()).await
    }

    // Roles

    /// Fetches the caller's role and admin flag together
    pub async fn caller_role(&self) -> Result<RoleInfo, ErrorContext> {
        let backend = self.backend.clone();
        let key = QueryKey::new([USER_ROLE_KEY, self.principal().unwrap_or_default()]);
        self.roles.get_or_fetch(key, move || async move {
            let (role, is_admin) = join!(backend.get_caller_user_role(), backend.is_caller_admin());
            Ok::<_, ErrorContext>(RoleInfo {
                role: role?,
                is_admin: is_admin?,
            })
        }.boxed()).await
    }

    /// Fails unless the caller is an administrator
    pub async fn require_admin(&self) -> Result<(), ErrorContext> {
        let role = self.caller_role().await.context("Failed to check the caller's role")?;
        if !role.is_admin {
            bail!("Access denied: this requires the admin role (current role: {})", role.role);
        }
        Ok(())
    }

    pub async fn assign_role(&self, user: &str, role: UserRole) -> Result<(), ErrorContext> {
        self.backend.assign_caller_user_role(user.into(), role).await?;
        self.roles.invalidate(&[USER_ROLE_KEY]).await;
        Ok(())
    }

    // Profiles

    pub async fn caller_profile(&self) -> Result<Option<RcStr>, ErrorContext> {
        let backend = self.backend.clone();
        self.profile.get_or_fetch(QueryKey::new([CALLER_PROFILE_KEY]), move || async move {
            backend.get_caller_user_profile().await
        }.boxed()).await
    }

    pub async fn save_caller_profile(&self) -> Result<(), ErrorContext> {
        self.backend.save_caller_user_profile().await?;
        self.profile.invalidate(&[CALLER_PROFILE_KEY]).await;
        Ok(())
    }

    pub async fn user_profile(&self, user: &str) -> Result<Option<RcStr>, ErrorContext> {
        self.backend.get_user_profile(user.into()).await
    }

    // Dashboard

    pub async fn admin_dashboard(&self) -> Result<Arc<AdminDashboard>, ErrorContext> {
        let backend = self.backend.clone();
        self.dashboard.get_or_fetch(QueryKey::new([ADMIN_DASHBOARD_KEY]), move || async move {
            backend.get_admin_dashboard().await.map(Arc::new)
        }.boxed()).await
    }

    // Cache maintenance

    /// Drops every cached response, in-flight requests are left alone
    pub async fn clear_caches(&self) -> usize {
        self.videos.clear().await
            + self.statuses.clear().await
            + self.roles.clear().await
            + self.dashboard.clear().await
            + self.profile.clear().await
    }

    pub async fn cache_stats(&self) -> ClientCacheStats {
        ClientCacheStats {
            videos: self.videos.stats().await,
            statuses: self.statuses.stats().await,
            roles: self.roles.stats().await,
            dashboard: self.dashboard.stats().await,
            profile: self.profile.stats().await,
        }
    }
}
