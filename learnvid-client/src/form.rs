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
use std::fmt::Display;

use cloneable_errors::{ErrorContext, ResContext};
use learnvid_api::{NewVideo, RcStr};
use learnvid_links::{is_valid_video_url, thumbnail_for, Platform};

use crate::{client::VideoClient, constants::DEFAULT_THUMBNAIL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingUrl,
    MissingTitle,
}

impl std::error::Error for FormError {}
impl Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::MissingUrl => write!(f, "Please enter the video URL"),
            FormError::MissingTitle => write!(f, "Please enter a title for the video"),
        }
    }
}

/// State of the "add new video" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddVideoForm {
    url: String,
    title: String,
    thumbnail_url: String,
}

impl AddVideoForm {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    /// Updates the URL, pre-filling the thumbnail when one can be derived from it
    ///
    /// A thumbnail typed in earlier is only replaced by a derived one, never cleared.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        if let Some(thumbnail) = thumbnail_for(&self.url) {
            self.thumbnail_url = thumbnail;
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_thumbnail_url(&mut self, thumbnail_url: impl Into<String>) {
        self.thumbnail_url = thumbnail_url.into();
    }

    pub fn looks_like_video_link(&self) -> bool {
        is_valid_video_url(&self.url)
    }

    /// Reels have no derivable thumbnail, so the user has to paste one
    pub fn needs_manual_thumbnail(&self) -> bool {
        Platform::detect(&self.url).is_some_and(|p| !p.has_derivable_thumbnail()) && self.thumbnail_url.trim().is_empty()
    }

    pub fn to_new_video(&self) -> Result<NewVideo, FormError> {
        let url = self.url.trim();
        let title = self.title.trim();
        if url.is_empty() {
            return Err(FormError::MissingUrl);
        }
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        let thumbnail_url = match self.thumbnail_url.trim() {
            "" => DEFAULT_THUMBNAIL,
            t => t,
        };
        Ok(NewVideo {
            url: url.into(),
            title: title.into(),
            thumbnail_url: thumbnail_url.into(),
        })
    }

    pub fn reset(&mut self) {
        *self = AddVideoForm::default();
    }

    /// Sends the form to the backend, clearing it on success
    ///
    /// The form is left untouched if anything fails.
    pub async fn submit(&mut self, client: &VideoClient) -> Result<RcStr, ErrorContext> {
        let video = self.to_new_video().context("The form is incomplete")?;
        let id = client.add_video(video).await.context("Failed to add video")?;
        self.reset();
        Ok(id)
    }
}
