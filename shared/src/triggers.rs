use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SPIN_COMMAND;

/// Stream events that can ask the wheel for spins
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Donation { user: String, amount: f64 },
    Bits { user: String, amount: u32 },
    Subscription { user: String, tier: u32 },
    GiftSubs { user: String, count: u32 },
    Raid { user: String, viewers: u32 },
    Follow { user: String },
    ChatMessage { user: String, text: String },
}

impl StreamEvent {
    pub fn user(&self) -> &str {
        match self {
            Self::Donation { user, .. }
            | Self::Bits { user, .. }
            | Self::Subscription { user, .. }
            | Self::GiftSubs { user, .. }
            | Self::Raid { user, .. }
            | Self::Follow { user }
            | Self::ChatMessage { user, .. } => user,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Donation { .. } => "donation",
            Self::Bits { .. } => "bits",
            Self::Subscription { .. } => "sub",
            Self::GiftSubs { .. } => "giftsub",
            Self::Raid { .. } => "raid",
            Self::Follow { .. } => "follow",
            Self::ChatMessage { .. } => "chat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEventError(pub String);

impl fmt::Display for ParseEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid stream event: {}", self.0)
    }
}

impl std::error::Error for ParseEventError {}

/// Parses the compact `kind:value:user` form, e.g. `bits:150:alice` or `follow:bob`.
/// Chat messages are `chat:user:text`, with the text allowed to contain colons.
impl FromStr for StreamEvent {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| ParseEventError(s.to_string()))?;
        let invalid = || ParseEventError(s.to_string());

        match kind.to_ascii_lowercase().as_str() {
            "follow" => Ok(Self::Follow {
                user: rest.to_string(),
            }),
            "chat" => {
                let (user, text) = rest.split_once(':').ok_or_else(invalid)?;
                Ok(Self::ChatMessage {
                    user: user.to_string(),
                    text: text.to_string(),
                })
            }
            other => {
                let (value, user) = rest.split_once(':').ok_or_else(invalid)?;
                let user = user.to_string();
                let count = || value.parse::<u32>().map_err(|_| invalid());
                match other {
                    "donation" => Ok(Self::Donation {
                        user,
                        amount: value.parse::<f64>().map_err(|_| invalid())?,
                    }),
                    "bits" => Ok(Self::Bits { user, amount: count()? }),
                    "sub" => Ok(Self::Subscription { user, tier: count()? }),
                    "giftsub" => Ok(Self::GiftSubs { user, count: count()? }),
                    "raid" => Ok(Self::Raid { user, viewers: count()? }),
                    _ => Err(invalid()),
                }
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AmountTrigger {
    pub enabled: bool,
    pub min_amount: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountTrigger {
    pub enabled: bool,
    pub min_count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Toggle {
    pub enabled: bool,
}

/// Which events spin the wheel, and how many times.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerSettings {
    pub donation: AmountTrigger,
    pub bits: CountTrigger,
    pub subscription: Toggle,
    pub gift_subs: Toggle,
    pub raid: CountTrigger,
    pub follow: Toggle,
    pub chat_command: Toggle,
    pub spin_command: String,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            donation: AmountTrigger {
                enabled: true,
                min_amount: 5.0,
            },
            bits: CountTrigger {
                enabled: true,
                min_count: 100,
            },
            subscription: Toggle { enabled: true },
            gift_subs: Toggle { enabled: true },
            raid: CountTrigger {
                enabled: true,
                min_count: 10,
            },
            follow: Toggle { enabled: false },
            chat_command: Toggle { enabled: true },
            spin_command: DEFAULT_SPIN_COMMAND.to_string(),
        }
    }
}

impl TriggerSettings {
    /// Number of spins `event` earns. Zero when its trigger is off or below threshold.
    pub fn spins_for(&self, event: &StreamEvent) -> u32 {
        match event {
            StreamEvent::Donation { amount, .. } => {
                u32::from(self.donation.enabled && *amount >= self.donation.min_amount)
            }
            StreamEvent::Bits { amount, .. } => {
                u32::from(self.bits.enabled && *amount >= self.bits.min_count)
            }
            StreamEvent::Subscription { tier, .. } => {
                if self.subscription.enabled {
                    (*tier).clamp(1, 3)
                } else {
                    0
                }
            }
            StreamEvent::GiftSubs { count, .. } => {
                if self.gift_subs.enabled && *count > 0 {
                    count.div_ceil(5).min(3)
                } else {
                    0
                }
            }
            StreamEvent::Raid { viewers, .. } => {
                if !self.raid.enabled || *viewers < self.raid.min_count {
                    0
                } else if *viewers >= 100 {
                    3
                } else if *viewers >= 50 {
                    2
                } else {
                    1
                }
            }
            StreamEvent::Follow { .. } => u32::from(self.follow.enabled),
            StreamEvent::ChatMessage { text, .. } => {
                let command = self.spin_command.to_lowercase();
                u32::from(
                    self.chat_command.enabled
                        && !command.is_empty()
                        && text.to_lowercase().contains(&command),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raid(viewers: u32) -> StreamEvent {
        StreamEvent::Raid {
            user: "raider".to_string(),
            viewers,
        }
    }

    #[test]
    fn test_thresholds() {
        let settings = TriggerSettings::default();
        let bits = |amount| StreamEvent::Bits {
            user: "u".to_string(),
            amount,
        };
        assert_eq!(settings.spins_for(&bits(99)), 0);
        assert_eq!(settings.spins_for(&bits(100)), 1);

        let donation = |amount| StreamEvent::Donation {
            user: "u".to_string(),
            amount,
        };
        assert_eq!(settings.spins_for(&donation(4.99)), 0);
        assert_eq!(settings.spins_for(&donation(5.0)), 1);
    }

    #[test]
    fn test_raid_scaling() {
        let settings = TriggerSettings::default();
        assert_eq!(settings.spins_for(&raid(9)), 0);
        assert_eq!(settings.spins_for(&raid(10)), 1);
        assert_eq!(settings.spins_for(&raid(50)), 2);
        assert_eq!(settings.spins_for(&raid(100)), 3);
    }

    #[test]
    fn test_subscription_and_gift_subs() {
        let settings = TriggerSettings::default();
        let sub = |tier| StreamEvent::Subscription {
            user: "u".to_string(),
            tier,
        };
        assert_eq!(settings.spins_for(&sub(1)), 1);
        assert_eq!(settings.spins_for(&sub(3)), 3);

        let gifts = |count| StreamEvent::GiftSubs {
            user: "u".to_string(),
            count,
        };
        assert_eq!(settings.spins_for(&gifts(0)), 0);
        assert_eq!(settings.spins_for(&gifts(1)), 1);
        assert_eq!(settings.spins_for(&gifts(6)), 2);
        assert_eq!(settings.spins_for(&gifts(50)), 3);
    }

    #[test]
    fn test_disabled_triggers() {
        let mut settings = TriggerSettings::default();
        let follow = StreamEvent::Follow {
            user: "u".to_string(),
        };
        assert_eq!(settings.spins_for(&follow), 0);

        settings.raid.enabled = false;
        assert_eq!(settings.spins_for(&raid(500)), 0);
    }

    #[test]
    fn test_chat_command() {
        let settings = TriggerSettings::default();
        let chat = |text: &str| StreamEvent::ChatMessage {
            user: "viewer".to_string(),
            text: text.to_string(),
        };
        assert_eq!(settings.spins_for(&chat("please !SPIN it")), 1);
        assert_eq!(settings.spins_for(&chat("hello")), 0);
    }

    #[test]
    fn test_parse_events() {
        assert_eq!(
            "bits:150:alice".parse::<StreamEvent>(),
            Ok(StreamEvent::Bits {
                user: "alice".to_string(),
                amount: 150
            })
        );
        assert_eq!(
            "chat:bob:!spin: now".parse::<StreamEvent>(),
            Ok(StreamEvent::ChatMessage {
                user: "bob".to_string(),
                text: "!spin: now".to_string()
            })
        );
        assert_eq!(
            " follow:carol ".parse::<StreamEvent>().map(|e| e.user().to_string()),
            Ok("carol".to_string())
        );
        assert!("raid:lots:dave".parse::<StreamEvent>().is_err());
        assert!("teleport:1:eve".parse::<StreamEvent>().is_err());
        assert!("bits".parse::<StreamEvent>().is_err());
    }
}
