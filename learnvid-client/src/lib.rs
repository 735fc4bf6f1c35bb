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

//! Client side of learnvid: backend access, request caching and form state

pub mod backend;
pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod form;
pub mod http;

#[cfg(test)]
mod testing;

pub use backend::{BackendResult, RemoteDataService};
pub use client::VideoClient;
pub use config::ClientConfig;
pub use form::AddVideoForm;
pub use http::HttpBackend;
