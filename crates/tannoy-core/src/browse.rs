// ── Media-browse filtering ──
//
// A browsing host hands over a tree of media nodes from arbitrary
// sources; the speaker can only play MP3s from the plain media and TTS
// sources. `retain_playable` prunes everything else, keeping a running
// count of hidden entries so the UI can say "n more not shown".

use serde::Serialize;

/// One node of a media-browse tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrowseNode {
    /// Content identifier, e.g. `media-source://tts/cloud`.
    pub id: String,
    pub title: String,
    /// Content type, e.g. `app`, `provider`, or a MIME type.
    pub content_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BrowseNode>,
    /// Children pruned from this node across all filter passes.
    pub not_shown: usize,
}

/// Whether a node can lead to something the speaker can play: it must be
/// a media-source id whose source is `media_source` or `tts`, and be a
/// container (`app`, `provider`) or an MP3 leaf.
fn is_playable_source(node: &BrowseNode) -> bool {
    if !node.id.starts_with("media-source://") {
        return false;
    }
    let source = node.id.split('/').nth(2).unwrap_or_default();
    matches!(source, "media_source" | "tts")
        && matches!(node.content_type.as_str(), "app" | "provider" | "audio/mpeg")
}

/// Prune unplayable children of `node`, adding the number removed to its
/// `not_shown` counter.
pub fn retain_playable(node: &mut BrowseNode) {
    let before = node.children.len();
    node.children.retain(is_playable_source);
    node.not_shown += before - node.children.len();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, content_type: &str) -> BrowseNode {
        BrowseNode {
            id: id.into(),
            title: id.into(),
            content_type: content_type.into(),
            children: Vec::new(),
            not_shown: 0,
        }
    }

    #[test]
    fn keeps_tts_and_media_source_audio() {
        let mut root = BrowseNode {
            children: vec![
                node("media-source://tts/cloud", "provider"),
                node("media-source://media_source/local", "app"),
                node("media-source://media_source/local/a.mp3", "audio/mpeg"),
            ],
            ..BrowseNode::default()
        };
        retain_playable(&mut root);
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.not_shown, 0);
    }

    #[test]
    fn prunes_foreign_sources_and_counts_them() {
        let mut root = BrowseNode {
            children: vec![
                node("media-source://tts/cloud", "provider"),
                node("media-source://camera/front_door", "provider"),
                node("media-source://media_source/local/video.mp4", "video/mp4"),
                node("spotify://playlist/123", "audio/mpeg"),
            ],
            ..BrowseNode::default()
        };
        retain_playable(&mut root);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.not_shown, 3);
    }

    #[test]
    fn not_shown_accumulates_across_passes() {
        let mut root = BrowseNode {
            not_shown: 2,
            children: vec![node("file:///x.mp3", "audio/mpeg")],
            ..BrowseNode::default()
        };
        retain_playable(&mut root);
        assert_eq!(root.not_shown, 3);
    }
}
