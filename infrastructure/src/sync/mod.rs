mod session;

pub use self::session::{SessionCounter, SessionGuard};
