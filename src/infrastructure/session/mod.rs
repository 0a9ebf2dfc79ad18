pub mod middleware;
pub mod recordings;
pub mod registry;
pub mod request_id;

pub use middleware::{session_middleware, ClientSession, X_SESSION_ID};
pub use recordings::{RecordingVault, StoredRecording};
pub use registry::{ClientRegistry, ClientSettings, ClientState};
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
