//! Icon classes picked from a link's domain when the user gives none.

use crate::api::models::DEFAULT_LINK_GLYPH;
use url::Url;

/// Well-known sites, matched as substrings of the host.
const SITE_ICONS: &[(&str, &str)] = &[
    ("baidu.com", "fab fa-baidu"),
    ("google.com", "fab fa-google"),
    ("github.com", "fab fa-github"),
    ("youtube.com", "fab fa-youtube"),
    ("twitter.com", "fab fa-twitter"),
    ("facebook.com", "fab fa-facebook"),
    ("instagram.com", "fab fa-instagram"),
    ("linkedin.com", "fab fa-linkedin"),
    ("weibo.com", "fab fa-weibo"),
    ("qq.com", "fab fa-qq"),
    ("wechat.com", "fab fa-weixin"),
    ("taobao.com", "fas fa-shopping-cart"),
    ("tmall.com", "fas fa-shopping-cart"),
    ("jd.com", "fas fa-shopping-cart"),
    ("amazon.com", "fab fa-amazon"),
    ("netflix.com", "fas fa-film"),
    ("spotify.com", "fab fa-spotify"),
    ("apple.com", "fab fa-apple"),
    ("microsoft.com", "fab fa-microsoft"),
    ("stackoverflow.com", "fab fa-stack-overflow"),
    ("reddit.com", "fab fa-reddit"),
    ("discord.com", "fab fa-discord"),
    ("slack.com", "fab fa-slack"),
    ("zhihu.com", "fas fa-question-circle"),
    ("bilibili.com", "fas fa-play-circle"),
    ("douyin.com", "fas fa-music"),
    ("tiktok.com", "fab fa-tiktok"),
];

/// Keyword fallbacks, checked in order after the site table.
const KEYWORD_ICONS: &[(&[&str], &str)] = &[
    (&["shop", "mall", "store"], "fas fa-shopping-cart"),
    (&["news", "media"], "fas fa-newspaper"),
    (&["video", "tv"], "fas fa-video"),
    (&["music", "audio"], "fas fa-music"),
    (&["game"], "fas fa-gamepad"),
    (&["edu", "school", "university"], "fas fa-graduation-cap"),
    (&["bank", "finance"], "fas fa-university"),
    (&["mail", "email"], "fas fa-envelope"),
    (&["cloud", "drive"], "fas fa-cloud"),
    (&["doc", "office"], "fas fa-file-alt"),
];

/// Icon class for `url`, or the generic globe when nothing matches or the
/// URL does not parse.
pub fn auto_icon(url: &str) -> &'static str {
    let host = match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_lowercase(),
            None => return DEFAULT_LINK_GLYPH,
        },
        Err(e) => {
            log::debug!("No auto icon for '{}': {}", url, e);
            return DEFAULT_LINK_GLYPH;
        }
    };

    if let Some((_, icon)) = SITE_ICONS.iter().find(|(site, _)| host.contains(site)) {
        return *icon;
    }
    KEYWORD_ICONS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| host.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_LINK_GLYPH)
}

/// Short label for an icon class, e.g. `"fab fa-github"` becomes `"github"`.
pub fn icon_label(icon: &str) -> Option<&str> {
    icon.split_whitespace()
        .last()
        .and_then(|class| class.strip_prefix("fa-"))
        .filter(|label| !label.is_empty())
}
