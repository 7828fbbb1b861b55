//! Core business entities

pub mod budget;
pub mod category;
pub mod extraction;
pub mod movement;
pub mod receipt;
pub mod result;
pub mod savings;
pub mod shopping;
pub mod user;

pub use budget::{Budget, BudgetStatus};
pub use category::{Category, CategoryKind};
pub use extraction::{
    ExtractedItem, ExtractionPayload, ReconciledItem, ResolvedTotal, TotalSource, VoicePayload,
};
pub use movement::{Movement, MovementKind, Source, DEFAULT_CURRENCY};
pub use receipt::{Receipt, ReceiptItem};
pub use savings::{GoalProgress, SavingsGoal};
pub use shopping::{ShoppingItem, ShoppingList};
pub use user::User;
