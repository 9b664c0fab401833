//! Client-side core of FocusFlow: the session state machine, the reward
//! notifier and the content generation gateway it drives.

pub mod config;
pub mod error;
pub mod gateway;
pub mod rewards;
pub mod session;

pub use config::{load_settings, Settings, SettingsError};
pub use error::{GatewayError, SessionError};
pub use gateway::{ContentGateway, GeminiGateway, GenerationInput};
pub use rewards::{RewardEvent, RewardNotifier, REWARD_DISPLAY_DURATION};
pub use session::{
    AnswerOutcome, GenerationOutcome, GenerationTicket, OptionState, RemixOutcome, RemixTicket,
    Session, SessionController, ViewMode, Viewport,
};
