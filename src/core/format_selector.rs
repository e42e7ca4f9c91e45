// Picks the audio and video streams to fetch for an item whose extractor
// lists separate DASH streams: audio-only formats first (ascending quality),
// then a run of video-only formats, then combined fallbacks.

use crate::error::{DlError, DlResult};
use crate::models::media::{FormatDescriptor, FormatKind, MediaItem};

pub struct FormatSelector;

impl FormatSelector {
    pub fn select(item: &MediaItem) -> DlResult<(&FormatDescriptor, &FormatDescriptor)> {
        let formats = &item.formats;

        let audio_run = formats
            .iter()
            .take_while(|f| f.kind() == FormatKind::AudioOnly)
            .count();

        let audio = match audio_run.checked_sub(1).and_then(|i| formats.get(i)) {
            Some(f) => f,
            None => return Err(DlError::malformed(&item.id, "no audio-only formats")),
        };

        let video = Self::best_video(&formats[audio_run..])
            .ok_or_else(|| DlError::malformed(&item.id, "no video-only formats after audio"))?;

        Ok((audio, video))
    }

    /// Widest format of the leading video-only run; a strictly smaller file wins at equal width.
    fn best_video(formats: &[FormatDescriptor]) -> Option<&FormatDescriptor> {
        let mut best: Option<&FormatDescriptor> = None;

        for f in formats.iter().take_while(|f| f.kind() == FormatKind::VideoOnly) {
            best = match best {
                None => Some(f),
                Some(b) if f.width() > b.width() => Some(f),
                Some(b) if f.width() == b.width() && f.size_or_max() < b.size_or_max() => Some(f),
                keep => keep,
            };
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(ext: &str, size: u64, url: &str) -> FormatDescriptor {
        FormatDescriptor {
            ext: ext.into(),
            format_note: Some("DASH audio".into()),
            filesize: Some(size),
            url: url.into(),
            ..Default::default()
        }
    }

    fn video(width: u32, size: Option<u64>, url: &str) -> FormatDescriptor {
        FormatDescriptor {
            ext: "mp4".into(),
            format_note: Some("DASH video".into()),
            width: Some(width),
            filesize: size,
            url: url.into(),
            ..Default::default()
        }
    }

    fn progressive(url: &str) -> FormatDescriptor {
        FormatDescriptor {
            ext: "mp4".into(),
            format_note: Some("hd720".into()),
            vcodec: Some("avc1".into()),
            acodec: Some("mp4a".into()),
            width: Some(4096),
            filesize: Some(1),
            url: url.into(),
            ..Default::default()
        }
    }

    fn item(formats: Vec<FormatDescriptor>) -> MediaItem {
        MediaItem {
            id: "vid".into(),
            formats,
            ..Default::default()
        }
    }

    #[test]
    fn picks_last_audio_before_video() {
        let it = item(vec![
            audio("m4a", 10, "a-low"),
            audio("m4a", 20, "a-mid"),
            audio("webm", 30, "a-high"),
            video(640, Some(100), "v1"),
        ]);
        let (a, _) = FormatSelector::select(&it).unwrap();
        assert_eq!(a.url, "a-high");
    }

    #[test]
    fn picks_widest_video() {
        let it = item(vec![
            audio("m4a", 10, "a"),
            video(640, Some(100), "v640"),
            video(1920, Some(900), "v1920"),
            video(1280, Some(400), "v1280"),
            progressive("prog"),
        ]);
        let (_, v) = FormatSelector::select(&it).unwrap();
        assert_eq!(v.url, "v1920");
    }

    #[test]
    fn equal_width_prefers_smaller_file() {
        let it = item(vec![
            audio("m4a", 10, "a"),
            video(1920, Some(900), "big"),
            video(1920, Some(700), "small"),
            video(1920, Some(800), "mid"),
        ]);
        let (_, v) = FormatSelector::select(&it).unwrap();
        assert_eq!(v.url, "small");
    }

    #[test]
    fn unknown_size_never_wins_tie() {
        let it = item(vec![
            audio("m4a", 10, "a"),
            video(1920, Some(900), "known"),
            video(1920, None, "unknown"),
        ]);
        let (_, v) = FormatSelector::select(&it).unwrap();
        assert_eq!(v.url, "known");
    }

    #[test]
    fn stops_at_first_non_video_format() {
        let it = item(vec![
            audio("m4a", 10, "a"),
            video(640, Some(100), "v640"),
            progressive("prog"),
            video(3840, Some(100), "after-prog"),
        ]);
        let (_, v) = FormatSelector::select(&it).unwrap();
        assert_eq!(v.url, "v640");
    }

    #[test]
    fn missing_audio_prefix_is_malformed() {
        let it = item(vec![video(640, Some(100), "v")]);
        assert!(matches!(
            FormatSelector::select(&it),
            Err(DlError::MalformedFormatList { .. })
        ));
    }

    #[test]
    fn missing_video_run_is_malformed() {
        let it = item(vec![audio("m4a", 10, "a"), progressive("p")]);
        assert!(matches!(
            FormatSelector::select(&it),
            Err(DlError::MalformedFormatList { .. })
        ));
    }

    #[test]
    fn empty_format_list_is_malformed() {
        assert!(FormatSelector::select(&item(Vec::new())).is_err());
    }
}
