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

use cloneable_errors::{anyhow, bail, ErrContext, ErrorContext, ResContext};
use futures::{future::BoxFuture, FutureExt};
use learnvid_api::{AdminDashboard, ApiError, AssignRoleRequest, NewVideo, RcStr, SetStatusRequest, UserRole, VideoStatus};
use log::warn;
use reqwest::{header::ACCEPT, Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::{backend::{BackendResult, RemoteDataService}, config::ClientConfig, constants::USER_AGENT};

/// Turns a non-2xx response into an error, attaching the backend's own error stack when the
/// body carries one
async fn check_status(response: Response) -> Result<Response, ErrorContext> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.with_context(|| format!("The backend returned a '{status}' status code"))?;
    match serde_json::from_str::<ApiError>(&body) {
        Ok(stack) => Err(stack.context("--- BACKEND ERROR STACK FOLLOWS ---").context(format!("The backend returned a '{status}' status code"))),
        Err(..) => bail!("The backend returned a '{status}' status code with the following body:\n{body}",),
    }
}

/// [`RemoteDataService`] spoken as JSON over HTTP
pub struct HttpBackend {
    client: Client,
    base: Url,
    auth_token: Option<Arc<str>>,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<HttpBackend, ErrorContext> {
        let base = Url::parse(config.backend_url.trim()).context("Failed to parse the backend URL")?;
        if base.cannot_be_a_base() {
            bail!("The backend URL '{base}' cannot be used as a base URL",);
        }
        let client = Client::builder()
            .user_agent(*USER_AGENT)
            .timeout(config.reqwest_timeout()?)
            .build()
            .context("Failed to construct the HTTP client")?;
        Ok(HttpBackend {
            client,
            base,
            auth_token: config.auth_token.as_deref().map(Arc::from),
        })
    }

    /// Appends `segments` to the base path, each one escaped as a single segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ErrorContext> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("The backend URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client
            .request(method, url)
            .header(ACCEPT, "application/json");
        match self.auth_token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<R>(&self, builder: RequestBuilder) -> Result<R, ErrorContext>
    where R: DeserializeOwned,
    {
        let response = builder.send().await.context("Failed to send the request")?;
        check_status(response).await?
            .json().await.context("Failed to deserialize response")
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ErrorContext> {
        let response = builder.send().await.context("Failed to send the request")?;
        check_status(response).await?;
        Ok(())
    }

    async fn get<R>(&self, segments: &[&str], what: &'static str) -> BackendResult<R>
    where R: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let result = self.send(self.request(Method::GET, url)).await;
        if let Err(ref err) = result {
            warn!("Failed to fetch {what}: {err}");
        }
        result.context(format!("Failed to fetch {what}"))
    }
}

impl RemoteDataService for HttpBackend {
    fn add_video(&self, video: NewVideo) -> BoxFuture<'_, BackendResult<RcStr>> {
        async move {
            let url = self.endpoint(&["videos"])?;
            self.send::<RcStr>(self.request(Method::POST, url).json(&video)).await.context("Failed to add the video")
        }.boxed()
    }

    fn get_all_videos(&self) -> BoxFuture<'_, BackendResult<Vec<RcStr>>> {
        self.get(&["videos"], "the video list").boxed()
    }

    fn get_video(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<RcStr>> {
        async move {
            self.get(&["videos", &*video_id], "the video").await
        }.boxed()
    }

    fn get_user_video_status(&self, user: RcStr, video_id: RcStr) -> BoxFuture<'_, BackendResult<VideoStatus>> {
        async move {
            self.get(&["videos", &*video_id, "status", &*user], "the video status").await
        }.boxed()
    }

    fn set_user_video_status(&self, video_id: RcStr, status: VideoStatus) -> BoxFuture<'_, BackendResult<()>> {
        async move {
            let url = self.endpoint(&["videos", &*video_id, "status"])?;
            let body = SetStatusRequest { video_id, status };
            self.send_empty(self.request(Method::PUT, url).json(&body)).await.context("Failed to update the video status")
        }.boxed()
    }

    fn get_all_video_engagements(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<Vec<RcStr>>> {
        async move {
            self.get(&["videos", &*video_id, "engagements"], "the video engagements").await
        }.boxed()
    }

    fn get_users_without_response(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<Vec<RcStr>>> {
        async move {
            self.get(&["videos", &*video_id, "pending"], "the users without a response").await
        }.boxed()
    }

    fn get_caller_user_role(&self) -> BoxFuture<'_, BackendResult<UserRole>> {
        self.get(&["me", "role"], "the caller's role").boxed()
    }

    fn is_caller_admin(&self) -> BoxFuture<'_, BackendResult<bool>> {
        self.get(&["me", "admin"], "the caller's admin flag").boxed()
    }

    fn assign_caller_user_role(&self, user: RcStr, role: UserRole) -> BoxFuture<'_, BackendResult<()>> {
        async move {
            let url = self.endpoint(&["users", &*user, "role"])?;
            let body = AssignRoleRequest { user, role };
            self.send_empty(self.request(Method::POST, url).json(&body)).await.context("Failed to assign the role")
        }.boxed()
    }

    fn get_caller_user_profile(&self) -> BoxFuture<'_, BackendResult<Option<RcStr>>> {
        self.get(&["me", "profile"], "the caller's profile").boxed()
    }

    fn save_caller_user_profile(&self) -> BoxFuture<'_, BackendResult<()>> {
        async move {
            let url = self.endpoint(&["me", "profile"])?;
            self.send_empty(self.request(Method::PUT, url)).await.context("Failed to save the profile")
        }.boxed()
    }

    fn get_user_profile(&self, user: RcStr) -> BoxFuture<'_, BackendResult<Option<RcStr>>> {
        async move {
            self.get(&["users", &*user, "profile"], "the user's profile").await
        }.boxed()
    }

    fn get_admin_dashboard(&self) -> BoxFuture<'_, BackendResult<AdminDashboard>> {
        self.get(&["admin", "dashboard"], "the admin dashboard").boxed()
    }
}
