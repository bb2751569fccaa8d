// ABOUTME: YouTube video id extraction and embed markup
// ABOUTME: Recognises `v=` query parameters and `youtu.be/` short links

/// Extract the video id from a YouTube URL.
///
/// Two shapes are recognised, checked in order:
/// - a `v=` parameter: the id runs up to the next `&`
/// - a `youtu.be/` path: the id runs up to the next `?`
///
/// The id itself is not validated; an empty id yields `None`.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let id = if let Some((_, rest)) = url.rsplit_once("v=") {
        rest.split_once('&').map_or(rest, |(id, _)| id)
    } else if let Some((_, rest)) = url.rsplit_once("youtu.be/") {
        rest.split_once('?').map_or(rest, |(id, _)| id)
    } else {
        return None;
    };

    (!id.is_empty()).then_some(id)
}

/// Embeddable player markup for `url`, or an empty string when there is no
/// recognisable video id.
pub fn youtube_embed(url: Option<&str>) -> String {
    match url.and_then(youtube_video_id) {
        Some(id) => format!(
            r#"<iframe width="100%" height="450" src="https://www.youtube.com/embed/{id}" frameborder="0" allowfullscreen></iframe>"#
        ),
        None => String::new(),
    }
}
