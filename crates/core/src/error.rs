//! 에러 타입 -- 워크스페이스 공통 에러 정의
//!
//! 스캔과 브로드캐스트 경로는 실패하지 않으므로, 에러 계층은
//! 설정 로딩과 HTTP 서버 기동 같은 시작 단계만 다룹니다.

/// apkwatch 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ApkwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP 서버 에러
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// TOML 문법 오류 또는 스키마 불일치
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 범위를 벗어나거나 형식이 잘못된 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// HTTP 서버 에러
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// 리스너 바인딩 실패
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    /// 서버 루프가 에러로 종료됨
    #[error("server terminated: {0}")]
    Serve(String),
}
