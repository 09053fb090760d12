use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Twitter,
    Linkedin,
    Youtube,
}

impl SocialPlatform {
    /// Stable identifier, `instagram`, `twitter`, ...
    pub fn id(&self) -> &'static str {
        self.into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Twitter => "X / Twitter",
            SocialPlatform::Linkedin => "LinkedIn",
            SocialPlatform::Youtube => "YouTube",
        }
    }

    pub fn url_prefix(&self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "https://instagram.com/",
            SocialPlatform::Twitter => "https://x.com/",
            SocialPlatform::Linkedin => "https://linkedin.com/in/",
            SocialPlatform::Youtube => "https://youtube.com/@",
        }
    }

    /// Prefix of the link that opens the platform's app directly
    pub fn deep_link_prefix(&self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "instagram://user?username=",
            SocialPlatform::Twitter => "twitter://user?screen_name=",
            SocialPlatform::Linkedin => "linkedin://profile/",
            SocialPlatform::Youtube => "vnd.youtube://user/",
        }
    }

    /// Profile link for `username`, the username is appended as is
    pub fn link(&self, username: &str, deep_link: bool) -> String {
        let prefix = if deep_link { self.deep_link_prefix() } else { self.url_prefix() };
        format!("{prefix}{username}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator as _;

    use super::*;
    use crate::content::TagContent;

    #[test]
    fn web_links() {
        assert_eq!(SocialPlatform::Instagram.link("bob", false), "https://instagram.com/bob");
        assert_eq!(SocialPlatform::Youtube.link("chan", false), "https://youtube.com/@chan");
    }

    #[test]
    fn deep_links() {
        assert_eq!(SocialPlatform::Twitter.link("bob", true), "twitter://user?screen_name=bob");
        assert_eq!(SocialPlatform::Linkedin.link("bob", true), "linkedin://profile/bob");
    }

    #[test]
    fn every_link_is_a_uri() {
        for platform in SocialPlatform::iter() {
            for deep_link in [false, true] {
                let content = TagContent::classify(platform.link("someone", deep_link));
                assert!(content.is_uri(), "{} deep_link={deep_link}", platform.id());
            }
        }
    }

    #[test]
    fn ids() {
        assert_eq!(SocialPlatform::Linkedin.id(), "linkedin");
        assert_eq!("youtube".parse::<SocialPlatform>().unwrap(), SocialPlatform::Youtube);
    }
}
