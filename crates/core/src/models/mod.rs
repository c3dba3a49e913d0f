//! Entity documents as the REST API returns them.
//!
//! Every field is optional and decoded leniently: the API is inconsistent
//! about key casing, id-vs-embedded references, and number-vs-string
//! scalars, and a record that is only partially understood is still shown.

pub mod amount;
pub mod asset;
pub mod lenient;
pub mod order;
pub mod project;
pub mod reference;
pub mod task;
pub mod user;

pub use amount::Amount;
pub use asset::{Asset, AssetSortField};
pub use order::{Order, OrderSortField};
pub use project::{Project, ProjectSortField};
pub use reference::Reference;
pub use task::{Attachment, Task, TaskPriority, TaskSortField, TaskStatus};
pub use user::{User, UserSortField};
