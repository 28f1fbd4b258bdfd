use crate::messages::{UploadPhase, UploadState};
use crate::profile::UserProfile;
use crate::services::Video;
use anyhow::Result;

pub const UNAVAILABLE_MESSAGE: &str = "Video unavailable";

/// Only absolute http(s) URLs can be played
pub fn is_playable(video: &Video) -> bool {
    reqwest::Url::parse(&video.url)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Last fetched feed plus the card currently playing, if any
#[derive(Debug, Default)]
pub struct FeedView {
    videos: Vec<Video>,
    playing: Option<usize>,
}

impl FeedView {
    /// Replace the list; playback stops
    pub fn load(&mut self, videos: Vec<Video>) {
        self.videos = videos;
        self.playing = None;
    }

    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    pub fn playing(&self) -> Option<usize> {
        self.playing
    }

    pub fn render(&self) -> String {
        render_home(&self.videos, self.playing)
    }

    /// Play or pause card `position` (1-based), returning the line to show
    pub fn toggle_play(&mut self, position: usize) -> Result<String> {
        let video = position
            .checked_sub(1)
            .and_then(|index| self.videos.get(index))
            .ok_or_else(|| anyhow::anyhow!("No video #{}, try `refresh`", position))?;

        if !is_playable(video) {
            tracing::warn!("Cannot play {:?}: bad url {:?}", video.id, video.url);
            return Ok(format!("{}. {}
", position, UNAVAILABLE_MESSAGE));
        }

        if self.playing == Some(position) {
            self.playing = None;
            return Ok(format!("Paused {}
", video.title));
        }

        self.playing = Some(position);
        Ok(format!("▶ Playing {}
  {}
", video.title, video.url))
    }
}

pub fn render_home(videos: &[Video], playing: Option<usize>) -> String {
    let mut out = String::from("Your Videos\nManage and view your personal collection\n\n");

    if videos.is_empty() {
        out.push_str("No videos yet\n");
        out.push_str(
            "Start building your collection by adding your first video from your profile (`profile`, then `upload <path>`)\n",
        );
        return out;
    }

    for (index, video) in videos.iter().enumerate() {
        let position = index + 1;
        out.push_str(&render_card(position, video, playing == Some(position)));
        out.push('\n');
    }
    out.push_str("`play <n>` to play or pause a video\n");
    out
}

fn render_card(position: usize, video: &Video, playing: bool) -> String {
    let marker = if playing { "▶" } else { " " };
    let duration = video
        .duration
        .as_deref()
        .map(|d| format!(" [{}]", d))
        .unwrap_or_default();
    let source = if is_playable(video) {
        video.url.as_str()
    } else {
        UNAVAILABLE_MESSAGE
    };

    format!(
        "{}{:>2}. {}{}\n    Uploaded {}\n    {}\n",
        marker,
        position,
        video.title,
        duration,
        video.uploaded_at.format("%b %-d, %Y"),
        source
    )
}

pub fn render_feed_error(message: &str) -> String {
    format!("Something went wrong\n{}\n", message)
}

pub fn render_profile(profile: &UserProfile, editing: bool) -> String {
    let mode = if editing {
        "editing (`set <field> <value>`, `save`, `cancel`)"
    } else {
        "`edit` to change"
    };

    format!(
        "Profile  [{}]\n\nPersonal Information\n  Full Name      {}\n  Email Address  {}\n  Bio            {}\n\nAdd New Video\n  `upload <path>` to choose a video file\n",
        mode, profile.name, profile.email, profile.bio
    )
}

/// Status line for an upload in flight
///
/// A settled attempt keeps its "100%" line until the state resets; attempts
/// that ended before submission have none.
pub fn render_progress(state: &UploadState) -> Option<String> {
    let settled = matches!(state.phase, UploadPhase::Done | UploadPhase::Failed)
        && state.progress_percent >= 100.0;
    if state.phase != UploadPhase::Uploading && !settled {
        return None;
    }

    let percent = state.progress_percent.min(100.0);
    let label = if percent < 100.0 {
        "Uploading..."
    } else {
        "Processing..."
    };
    Some(format!("{:.0}% complete  {}", percent.round(), label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn video(duration: Option<&str>) -> Video {
        Video {
            id: "v1".to_string(),
            title: "Sunset timelapse".to_string(),
            url: "http://localhost:8000/media/v1.mp4".to_string(),
            thumbnail: None,
            uploaded_at: Utc.with_ymd_and_hms(2024, 3, 5, 18, 20, 0).unwrap(),
            duration: duration.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_home() {
        assert!(render_home(&[], None).contains("No videos yet"));
    }

    #[test]
    fn test_card_format() {
        let home = render_home(&[video(Some("0:42")), video(None)], None);
        assert!(home.contains("  1. Sunset timelapse [0:42]"));
        assert!(home.contains("  2. Sunset timelapse\n"));
        assert!(home.contains("Uploaded Mar 5, 2024"));
        assert!(home.contains("    http://localhost:8000/media/v1.mp4\n"));
    }

    #[test]
    fn test_bad_url_card_is_unavailable() {
        let mut broken = video(None);
        broken.url = "not a url".to_string();
        assert!(!is_playable(&broken));

        let mut ftp = video(None);
        ftp.url = "ftp://example.com/v.mp4".to_string();
        assert!(!is_playable(&ftp));

        let home = render_home(&[broken], None);
        assert!(home.contains("    Video unavailable\n"));
        assert!(!home.contains("not a url"));
    }

    #[test]
    fn test_play_toggles_and_marks_card() {
        let mut feed = FeedView::default();
        feed.load(vec![video(None), video(Some("1:05"))]);

        assert_eq!(
            feed.toggle_play(2).unwrap(),
            "▶ Playing Sunset timelapse\n  http://localhost:8000/media/v1.mp4\n"
        );
        assert_eq!(feed.playing(), Some(2));
        assert!(feed.render().contains("▶ 2. Sunset timelapse [1:05]"));

        feed.toggle_play(1).unwrap();
        assert_eq!(feed.playing(), Some(1));

        assert_eq!(feed.toggle_play(1).unwrap(), "Paused Sunset timelapse\n");
        assert_eq!(feed.playing(), None);
    }

    #[test]
    fn test_play_unavailable_or_missing_video() {
        let mut broken = video(None);
        broken.url = "/relative/only.mp4".to_string();
        let mut feed = FeedView::default();
        feed.load(vec![broken]);

        assert_eq!(feed.toggle_play(1).unwrap(), "1. Video unavailable\n");
        assert_eq!(feed.playing(), None);
        assert!(feed.toggle_play(0).is_err());
        assert!(feed.toggle_play(2).is_err());
    }

    #[test]
    fn test_reload_stops_playback() {
        let mut feed = FeedView::default();
        feed.load(vec![video(None)]);
        feed.toggle_play(1).unwrap();

        feed.load(vec![video(None)]);
        assert_eq!(feed.playing(), None);
    }

    #[test]
    fn test_progress_line() {
        let mut state = UploadState {
            phase: UploadPhase::Uploading,
            progress_percent: 41.6,
            asset: None,
        };
        assert_eq!(render_progress(&state).unwrap(), "42% complete  Uploading...");

        state.progress_percent = 100.0;
        assert_eq!(render_progress(&state).unwrap(), "100% complete  Processing...");

        state.phase = UploadPhase::Done;
        assert_eq!(render_progress(&state).unwrap(), "100% complete  Processing...");

        state.phase = UploadPhase::Failed;
        state.progress_percent = 0.0;
        assert!(render_progress(&state).is_none());

        assert!(render_progress(&UploadState::default()).is_none());
    }
}
