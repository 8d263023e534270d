mod cursor;
pub use cursor::*;

mod notification;
pub use notification::*;

mod tweet;
pub use tweet::*;
