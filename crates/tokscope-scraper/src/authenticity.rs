use tokscope_core::VideoRecord;

/// `true` when at least one record has a non-zero view or like count.
///
/// Anti-bot interstitials render the video grid with zeroed metrics, so an
/// empty or all-zero list is treated as blocked.
#[must_use]
pub fn is_authentic(videos: &[VideoRecord]) -> bool {
    videos.iter().any(VideoRecord::has_engagement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(views: u64, likes: u64) -> VideoRecord {
        let mut v = VideoRecord::sparse("1".to_string(), "a".to_string(), views);
        v.like_count = likes;
        v
    }

    #[test]
    fn empty_is_inauthentic() {
        assert!(!is_authentic(&[]));
    }

    #[test]
    fn all_zero_is_inauthentic() {
        let mut zeroed = record(0, 0);
        zeroed.comment_count = 12;
        zeroed.share_count = 3;
        assert!(!is_authentic(&[record(0, 0), zeroed]));
    }

    #[test]
    fn single_like_is_authentic() {
        assert!(is_authentic(&[record(0, 0), record(0, 1)]));
        assert!(is_authentic(&[record(1, 0)]));
    }
}
