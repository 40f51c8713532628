//! Sender-side test harness (§4.L). Compiled only behind the `testutil`
//! feature, which is enabled transitively by this crate's own
//! dev-dependency declaration — never by the production binary.

pub mod sender;
