//! User directory interface and mock implementation

mod mock;
mod r#trait;

pub use mock::MockUserDirectory;
pub use r#trait::UserDirectory;
