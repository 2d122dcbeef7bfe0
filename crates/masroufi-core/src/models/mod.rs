pub mod budget;
pub mod category;
pub mod deal;
pub mod goal;
pub mod notification;
pub mod transaction;
pub mod user;

pub use budget::{Budget, BudgetPeriod};
pub use category::Category;
pub use deal::Deal;
pub use goal::Goal;
pub use notification::{Notification, NotificationKind};
pub use transaction::{Transaction, TransactionType};
pub use user::User;

/// Rounded `part / whole` as a percentage. Zero when `whole` is not positive.
pub(crate) fn percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0).round().max(0.0) as u32
}
