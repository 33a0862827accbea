//! Outbound HTTP collaborators.
//!
//! Thin reqwest wrappers over the third-party APIs the gateway coordinates:
//! the meeting-bot provider (Recall), the voice-agent provider (ElevenLabs
//! signed URLs), the company-lookup provider (Clearbit autocomplete), and
//! outbound automation webhooks (Make.com). Each client is constructed once
//! at bootstrap and reused; the bot API and the webhook sink sit behind
//! traits so orchestration tests can mock them.

pub mod automation;
pub mod lookup;
pub mod meeting_bot;
pub mod voice;

pub use automation::{AutomationClient, WebhookSink};
pub use lookup::LookupClient;
pub use meeting_bot::{MeetingBotApi, RecallClient};
pub use voice::VoiceClient;
