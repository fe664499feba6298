// media classification for preview mode

use super::files::split_extension;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "gif", "tiff"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Other,
}

/// classify a file name by extension only, case-insensitively.
/// audio is checked before video, so `.ogg` is audio.
pub fn media_kind(name: &str) -> MediaKind {
    let extension = split_extension(name).1.trim_start_matches('.').to_lowercase();
    if extension.is_empty() {
        return MediaKind::Other;
    }

    let ext = extension.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        MediaKind::Image
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MediaKind::Audio
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else {
        MediaKind::Other
    }
}
