mod action_sheet;
mod alert;
mod toast;

pub use action_sheet::*;
pub use alert::*;
pub use toast::*;
