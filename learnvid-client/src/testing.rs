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

//! In-process [`RemoteDataService`] for unit tests

use std::{collections::HashMap, sync::{Mutex, MutexGuard}};

use cloneable_errors::bail;
use futures::{future::BoxFuture, FutureExt};
use learnvid_api::{AdminDashboard, NewVideo, RcStr, UserRole, VideoStatus};

use crate::backend::{BackendResult, RemoteDataService};

#[derive(Default)]
pub struct ScriptState {
    pub caller: RcStr,
    pub role: Option<UserRole>,
    pub profiles: HashMap<RcStr, RcStr>,
    pub videos: Vec<(RcStr, NewVideo)>,
    pub statuses: HashMap<(RcStr, RcStr), VideoStatus>,
    pub records: Vec<RcStr>,
    /// every operation fails while set
    pub offline: bool,
    pub calls: HashMap<&'static str, usize>,
}

pub struct ScriptedBackend {
    state: Mutex<ScriptState>,
}

impl ScriptedBackend {
    pub fn new(caller: &str, role: UserRole) -> ScriptedBackend {
        ScriptedBackend {
            state: Mutex::new(ScriptState {
                caller: caller.into(),
                role: Some(role),
                ..ScriptState::default()
            }),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self, op: &str) -> usize {
        self.state().calls.get(op).copied().unwrap_or(0)
    }

    fn call<T, F>(&self, op: &'static str, f: F) -> BoxFuture<'_, BackendResult<T>>
    where T: Send + 'static,
          F: FnOnce(&mut ScriptState) -> BackendResult<T>,
    {
        let result = {
            let mut state = self.state();
            *state.calls.entry(op).or_default() += 1;
            if state.offline {
                Err(cloneable_errors::anyhow!("{op}: backend unreachable",))
            } else {
                f(&mut *state)
            }
        };
        async move { result }.boxed()
    }
}

fn require_admin(state: &ScriptState) -> BackendResult<()> {
    if state.role != Some(UserRole::Admin) {
        bail!("Unauthorized: only admins can do this");
    }
    Ok(())
}

impl RemoteDataService for ScriptedBackend {
    fn add_video(&self, video: NewVideo) -> BoxFuture<'_, BackendResult<RcStr>> {
        self.call("add_video", |s| {
            require_admin(s)?;
            let id: RcStr = format!("video-{}", s.videos.len() + 1).into();
            s.videos.push((id.clone(), video));
            Ok(id)
        })
    }

    fn get_all_videos(&self) -> BoxFuture<'_, BackendResult<Vec<RcStr>>> {
        self.call("get_all_videos", |s| Ok(s.videos.iter().map(|(id, _)| id.clone()).collect()))
    }

    fn get_video(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<RcStr>> {
        self.call("get_video", move |s| match s.videos.iter().find(|(id, _)| *id == video_id) {
            Some((_, video)) => Ok(video.title.clone()),
            None => bail!("Video not found"),
        })
    }

    fn get_user_video_status(&self, user: RcStr, video_id: RcStr) -> BoxFuture<'_, BackendResult<VideoStatus>> {
        self.call("get_user_video_status", move |s| Ok(s.statuses.get(&(user, video_id)).copied().unwrap_or_default()))
    }

    fn set_user_video_status(&self, video_id: RcStr, status: VideoStatus) -> BoxFuture<'_, BackendResult<()>> {
        self.call("set_user_video_status", move |s| {
            let caller = s.caller.clone();
            s.records.push(format!("{caller}:{video_id}:{status}").into());
            s.statuses.insert((caller, video_id), status);
            Ok(())
        })
    }

    fn get_all_video_engagements(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<Vec<RcStr>>> {
        self.call("get_all_video_engagements", move |s| {
            Ok(s.records.iter().filter(|r| r.split(':').nth(1) == Some(&*video_id)).cloned().collect())
        })
    }

    fn get_users_without_response(&self, video_id: RcStr) -> BoxFuture<'_, BackendResult<Vec<RcStr>>> {
        self.call("get_users_without_response", move |s| {
            Ok(s.profiles.keys()
                .filter(|user| !s.statuses.get(&((*user).clone(), video_id.clone())).is_some_and(|st| st.is_responded()))
                .cloned()
                .collect())
        })
    }

    fn get_caller_user_role(&self) -> BoxFuture<'_, BackendResult<UserRole>> {
        self.call("get_caller_user_role", |s| Ok(s.role.unwrap_or(UserRole::Guest)))
    }

    fn is_caller_admin(&self) -> BoxFuture<'_, BackendResult<bool>> {
        self.call("is_caller_admin", |s| Ok(s.role == Some(UserRole::Admin)))
    }

    fn assign_caller_user_role(&self, user: RcStr, role: UserRole) -> BoxFuture<'_, BackendResult<()>> {
        self.call("assign_caller_user_role", move |s| {
            require_admin(s)?;
            if user == s.caller {
                s.role = Some(role);
            }
            Ok(())
        })
    }

    fn get_caller_user_profile(&self) -> BoxFuture<'_, BackendResult<Option<RcStr>>> {
        self.call("get_caller_user_profile", |s| Ok(s.profiles.get(&s.caller).cloned()))
    }

    fn save_caller_user_profile(&self) -> BoxFuture<'_, BackendResult<()>> {
        self.call("save_caller_user_profile", |s| {
            let caller = s.caller.clone();
            s.profiles.insert(caller.clone(), caller);
            Ok(())
        })
    }

    fn get_user_profile(&self, user: RcStr) -> BoxFuture<'_, BackendResult<Option<RcStr>>> {
        self.call("get_user_profile", move |s| Ok(s.profiles.get(&user).cloned()))
    }

    fn get_admin_dashboard(&self) -> BoxFuture<'_, BackendResult<AdminDashboard>> {
        self.call("get_admin_dashboard", |s| {
            require_admin(s)?;
            Ok(AdminDashboard {
                videos: s.videos.iter().map(|(id, _)| id.clone()).collect(),
                records: s.records.clone(),
            })
        })
    }
}
