use serde::{Deserialize, Serialize};

pub const NO_DEVICE_MESSAGE: &str =
    "Không tìm thấy micro. Vui lòng kiểm tra kết nối thiết bị âm thanh hoặc cài đặt hệ thống.";
pub const PERMISSION_DENIED_MESSAGE: &str = "Không thể truy cập micro. Vui lòng cấp quyền micro trong cài đặt trình duyệt và đảm bảo trang web chạy trên https.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Prompt,
    Denied,
}

/// What the Mini App observed while acquiring the microphone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicrophoneProbe {
    pub permission: PermissionState,
    #[serde(default)]
    pub audio_inputs: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MicrophoneError {
    #[error("{}", NO_DEVICE_MESSAGE)]
    NoDevice,
    #[error("{}", PERMISSION_DENIED_MESSAGE)]
    PermissionDenied,
    #[error("Lỗi khi truy cập micro: {0}")]
    Other(String),
}

/// Map a probe to the failure the user should see, if any
pub fn classify(probe: &MicrophoneProbe) -> Result<(), MicrophoneError> {
    if probe.permission == PermissionState::Denied {
        return Err(MicrophoneError::PermissionDenied);
    }

    if let Some(error) = probe.error.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        let lowered = error.to_lowercase();
        return Err(
            if lowered.contains("notfound") || lowered.contains("device") || error.contains("thiết bị") {
                MicrophoneError::NoDevice
            } else if lowered.contains("notallowed")
                || lowered.contains("permission")
                || error.contains("quyền")
            {
                MicrophoneError::PermissionDenied
            } else {
                MicrophoneError::Other(error.to_string())
            },
        );
    }

    if probe.audio_inputs == Some(0) {
        return Err(MicrophoneError::NoDevice);
    }

    if probe.permission == PermissionState::Prompt {
        tracing::debug!("Microphone permission will be requested by the browser");
    }
    Ok(())
}
