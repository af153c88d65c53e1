mod session;
mod width;

// Mock core for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use session::MemorySession;
pub use width::*;

// Re-export mock for convenient access in tests
#[doc(hidden)]
pub use mock::{MockCoreMemory, MockMemoryBuilder};
