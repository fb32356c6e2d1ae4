use super::{or_na, report};
use crate::download::AudioQuality;
use crate::tidal::Session;

pub async fn handle_user_profile(session: &Session) -> String {
    let result = session.catalog().user(session.user_id).await.map(|user| {
        format!(
            "=== TIDAL USER PROFILE ===\n\n\
             User ID: {}\n\
             Username: {}\n\
             Name: {}\n\
             Email: {}\n\n\
             This profile information is retrieved from your TIDAL account.\n\
             For subscription details, use the get_subscription_info tool.",
            user.id,
            or_na(user.username.as_deref()),
            or_na(user.full_name()),
            or_na(user.email.as_deref())
        )
    });

    report("get user profile", result)
}

/// What a session quality says about the subscription behind it
struct Tier {
    name: &'static str,
    format: &'static str,
    bitrate: &'static str,
}

fn tier_for(quality: AudioQuality) -> Tier {
    match quality {
        AudioQuality::Low96k => Tier {
            name: "Free / Basic",
            format: "AAC",
            bitrate: "96 kbps",
        },
        AudioQuality::Low320k => Tier {
            name: "TIDAL Premium",
            format: "AAC",
            bitrate: "320 kbps",
        },
        AudioQuality::HighLossless => Tier {
            name: "TIDAL HiFi",
            format: "FLAC",
            bitrate: "1411 kbps (CD Quality)",
        },
        AudioQuality::HiResLossless => Tier {
            name: "TIDAL HiFi Plus",
            format: "FLAC",
            bitrate: "Up to 9216 kbps (Studio Master)",
        },
    }
}

const AVAILABLE_TIERS: &str = "=== Available Tiers ===

1. TIDAL Free/Basic
   - Quality: Up to 320 kbps AAC
   - Format: AAC (lossy)
   - Ads: Yes (Free tier)

2. TIDAL Premium (Not available in all regions)
   - Quality: Up to 320 kbps AAC
   - Format: AAC (lossy)
   - Ads: No

3. TIDAL HiFi
   - Quality: 16-bit/44.1kHz (CD Quality)
   - Format: FLAC (lossless)
   - Bitrate: 1411 kbps
   - Ads: No
   - Offline: Yes

4. TIDAL HiFi Plus
   - Quality: Up to 24-bit/192kHz (Studio Master)
   - Format: FLAC (lossless)
   - Bitrate: Up to 9216 kbps
   - Ads: No
   - Offline: Yes
   - Exclusive content: Yes";

pub fn handle_subscription_info(session: &Session) -> String {
    let tier = tier_for(session.audio_quality);

    format!(
        "=== TIDAL SUBSCRIPTION INFO ===\n\n\
         Subscription Tier: {}\n\
         Current Audio Quality: {}\n\
         Audio Format: {}\n\
         Bitrate: {}\n\n\
         {}\n\n\
         Your current tier is: {}\n\n\
         Note: To change your subscription, visit https://tidal.com/account",
        tier.name,
        session.audio_quality.description(),
        tier.format,
        tier.bitrate,
        AVAILABLE_TIERS,
        tier.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_follow_quality() {
        assert_eq!(tier_for(AudioQuality::HiResLossless).name, "TIDAL HiFi Plus");
        assert_eq!(tier_for(AudioQuality::HighLossless).format, "FLAC");
        assert_eq!(tier_for(AudioQuality::Low96k).bitrate, "96 kbps");
    }
}
