
pub use mock_server::{MockBehavior, MockServer};
