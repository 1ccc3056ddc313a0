use std::process::Stdio;
use std::time::Duration;

use iced::Task;
use tokio::process::Command;

use crate::detail::DetailView;
use crate::media::{ListItem, Message};
use crate::tmdb::{image_url, video_embed_url, ImageSize};
use crate::Movieflix;

const OPENER_TIMEOUT: Duration = Duration::from_secs(8);

fn opener_command(url: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
        cmd
    }
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(not(any(windows, target_os = "macos")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Hands the trailer's embeddable player URL to the system browser.
pub async fn open_trailer(key: String) -> Result<(), String> {
    let url = video_embed_url(&key);
    tracing::info!(%url, "opening trailer");

    let mut cmd = opener_command(&url);
    cmd.stdout(Stdio::null()).stderr(Stdio::null());

    let status = tokio::time::timeout(OPENER_TIMEOUT, cmd.status())
        .await
        .map_err(|_| String::from("Timed out launching the browser"))?
        .map_err(|e| e.to_string())?;

    if status.success() {
        Ok(())
    } else {
        Err(format!("Browser launcher exited with {}", status))
    }
}

impl Movieflix {
    fn queue_image(&self, path: Option<&String>, size: ImageSize, tasks: &mut Vec<Task<Message>>) {
        let Some(path) = path else {
            return;
        };
        let url = image_url(path, size);
        if self.image_cache.needs_fetch(&url) {
            tasks.push(Task::done(Message::LoadImage(url)));
        }
    }

    pub fn load_poster_images(&self, items: &[ListItem]) -> Task<Message> {
        let mut tasks = Vec::new();
        for item in items {
            self.queue_image(item.poster_path.as_ref(), ImageSize::Poster, &mut tasks);
        }
        Task::batch(tasks)
    }

    pub fn load_home_images(&self) -> Task<Message> {
        let mut tasks = Vec::new();
        if let Some(hero) = self.hero_item() {
            self.queue_image(hero.backdrop_path.as_ref(), ImageSize::Backdrop, &mut tasks);
        }
        for row in &self.home_rows {
            for item in row.items.iter().take(10) {
                self.queue_image(item.poster_path.as_ref(), ImageSize::Poster, &mut tasks);
            }
        }
        Task::batch(tasks)
    }

    pub fn load_detail_images(&self, view: &DetailView) -> Task<Message> {
        let detail = &view.detail;
        let mut tasks = Vec::new();
        self.queue_image(detail.backdrop_path.as_ref(), ImageSize::Backdrop, &mut tasks);
        self.queue_image(detail.poster_path.as_ref(), ImageSize::Poster, &mut tasks);
        for member in &view.cast {
            self.queue_image(member.profile_path.as_ref(), ImageSize::Profile, &mut tasks);
        }
        for item in &view.recommendations {
            self.queue_image(item.poster_path.as_ref(), ImageSize::Poster, &mut tasks);
        }
        Task::batch(tasks)
    }

    pub fn load_episode_images(&self, season: &crate::media::SeasonDetail) -> Task<Message> {
        let mut tasks = Vec::new();
        for episode in &season.episodes {
            self.queue_image(episode.still_path.as_ref(), ImageSize::Still, &mut tasks);
        }
        Task::batch(tasks)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    #[test]
    fn opener_receives_the_embed_url_last() {
        let url = video_embed_url("dQw4w9WgXcQ");
        let cmd = opener_command(&url);
        let args: Vec<&OsStr> = cmd.as_std().get_args().collect();
        assert_eq!(args.last(), Some(&OsStr::new("https://www.youtube.com/embed/dQw4w9WgXcQ")));
    }
}
