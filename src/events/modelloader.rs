use bevy_ecs::message::Message;

use crate::components::charactermodel::CharacterModel;
use crate::resources::settings::QualityTier;

/// Commands sent *to* the loader thread.
#[derive(Debug, Clone)]
pub enum LoaderCmd {
    Load {
        reference: String,
        quality: QualityTier,
    },
    Shutdown,
}

/// Messages sent *back* from the loader thread.
#[derive(Message, Debug, Clone)]
pub enum LoaderMessage {
    Progress { percent: u8 },
    /// The final model; load failures resolve to the fallback box.
    Resolved(CharacterModel),
}
