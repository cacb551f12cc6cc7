//! Workflow domain: stages, conversation state and message intent.

pub mod intent;
pub mod message;
pub mod recommendation;
pub mod stage;
pub mod state;

pub use intent::MessageIntent;
pub use message::{Message, Role};
pub use recommendation::{Recommendation, Strategy};
pub use stage::WorkflowStage;
pub use state::ConversationState;
