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
use std::{path::PathBuf, sync::Arc};

use cloneable_errors::{bail, ErrorContext, ResContext};
use env_logger::Env;
use learnvid_api::VideoStatus;
use learnvid_client::{constants::CONFIG_PATH, AddVideoForm, ClientConfig, HttpBackend, VideoClient};
use learnvid_links::{generate_thumbnail_url, is_valid_video_url, parse_video_link};
use log::info;
use strum::VariantNames;

const USAGE: &str = "\
usage: learnvid [--config PATH] <command>

commands:
    parse <url>                             show what a video link resolves to
    videos                                  list all videos
    add <url> <title> [--thumbnail URL]     add a video (admins only)
    status <video-id> [<status>]            show or set your status for a video
    role                                    show your role
    profile [--save]                        show or create your profile
    dashboard                               engagement overview (admins only)";

#[tokio::main]
async fn main() -> Result<(), ErrorContext> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let mut args = pico_args::Arguments::from_env();
    let config_path: PathBuf = args.opt_value_from_str("--config").context("Invalid --config value")?
        .unwrap_or_else(|| PathBuf::from(CONFIG_PATH));
    let Some(command) = args.subcommand().context("Invalid command")? else {
        println!("{USAGE}");
        return Ok(());
    };

    if command == "parse" {
        let url: String = args.free_from_str().context("Missing the link to parse")?;
        print_link(&url);
        return Ok(());
    }

    let config = ClientConfig::load_or_create(&config_path)?;
    let backend = HttpBackend::new(&config).context("Failed to set up the backend connection")?;
    let client = VideoClient::new(Arc::new(backend), &config)?;
    info!("Using backend at {}", config.backend_url);

    match command.as_str() {
        "videos" => {
            let overview = client.video_overview().await?;
            if overview.is_empty() {
                println!("No videos yet");
            }
            for (id, status) in &overview {
                match status {
                    Some(status) => println!("{id}\t{status}"),
                    None => println!("{id}"),
                }
            }
        },
        "add" => {
            let thumbnail: Option<String> = args.opt_value_from_str("--thumbnail").context("Invalid --thumbnail value")?;
            let url: String = args.free_from_str().context("Missing the video URL")?;
            let title: String = args.free_from_str().context("Missing the video title")?;
            client.require_admin().await?;

            let mut form = AddVideoForm::default();
            form.set_url(url);
            form.set_title(title);
            if let Some(thumbnail) = thumbnail {
                form.set_thumbnail_url(thumbnail);
            }
            if !form.looks_like_video_link() {
                bail!("'{}' doesn't look like a YouTube or Instagram Reel link", form.url());
            }
            if form.needs_manual_thumbnail() {
                info!("No thumbnail could be derived for this link, pass one with --thumbnail");
            }
            let id = form.submit(&client).await?;
            println!("Added video {id}");
        },
        "status" => {
            let video_id: String = args.free_from_str().context("Missing the video id")?;
            let new_status: Option<String> = args.opt_free_from_str().context("Invalid status")?;
            match new_status {
                None => {
                    if client.principal().is_none() {
                        bail!("Set `principal` in {} to look up your own statuses", config_path.display());
                    }
                    println!("{}", client.my_video_status(&video_id).await?);
                },
                Some(status) => {
                    let status: VideoStatus = status.parse().with_context(|| format!("Unknown status, expected one of: {}", VideoStatus::VARIANTS.join(", ")))?;
                    client.set_video_status(&video_id, status).await?;
                    println!("Marked {video_id} as {status}");
                },
            }
        },
        "role" => {
            let role = client.caller_role().await?;
            println!("role: {}\nadmin: {}", role.role, role.is_admin);
        },
        "profile" => {
            if args.contains("--save") {
                client.save_caller_profile().await?;
            }
            match client.caller_profile().await? {
                Some(profile) => println!("{profile}"),
                None => println!("No profile yet, create one with `learnvid profile --save`"),
            }
        },
        "dashboard" => {
            client.require_admin().await?;
            let dashboard = client.admin_dashboard().await?;
            println!("videos: {}\nengagement records: {}", dashboard.video_count(), dashboard.record_count());
            for record in &dashboard.records {
                println!("  {record}");
            }
        },
        other => bail!("Unknown command '{other}'\n\n{USAGE}",),
    }

    let leftover = args.finish();
    if !leftover.is_empty() {
        info!("Ignored extra arguments: {leftover:?}");
    }
    Ok(())
}

fn print_link(url: &str) {
    println!("valid: {}", is_valid_video_url(url));
    match parse_video_link(url) {
        Some(link) => {
            println!("platform: {}\nid: {}", link.platform, link.id);
            match generate_thumbnail_url(url, link.id) {
                Some(thumbnail) => println!("thumbnail: {thumbnail}"),
                None => println!("thumbnail: none"),
            }
        },
        None => println!("no video id found"),
    }
}
